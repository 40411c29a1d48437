//! `<programme>` entries.
//!
//! Annotations are decided in a fixed order because each step reads the
//! categories left by the previous one: categories, then series numbering,
//! then credits.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::observer::GenerationObserver;
use crate::parser::{
    annotate_series, clean_title, derive_subtitle, extract_categories, extract_credits, sanitize,
};
use crate::time::TimeFormatter;
use crate::types::{Event as EpgEvent, Listing, Programme};

use super::{write_empty_element, write_text_element, LANG};

/// Build the programme entry of one event.
///
/// # Errors
/// `XmltvError::InvalidTimestamp` if the event times cannot be rendered.
pub fn build_programme(
    channel: &str,
    event: &EpgEvent,
    formatter: &TimeFormatter,
) -> Result<Programme> {
    let (start, stop) = formatter.format_span(event.begin_timestamp, event.duration_minutes)?;

    let (description, subtitle) = if event.long_description.is_empty() {
        (sanitize(&event.short_description), None)
    } else {
        (
            sanitize(&event.long_description),
            derive_subtitle(&event.short_description),
        )
    };

    let (title, is_new) = clean_title(&event.title);

    let mut categories = extract_categories(&event.short_description);
    let series = annotate_series(&categories, &event.short_description);
    categories.extend(series.inferred_category);
    let credits = extract_credits(
        categories.first().map(String::as_str),
        &event.long_description,
    );

    Ok(Programme {
        channel: channel.to_string(),
        start,
        stop,
        length_minutes: event.duration_minutes,
        description,
        subtitle,
        title,
        is_new,
        categories,
        episode_numbers: series.episode_numbers,
        credits,
    })
}

/// Build programmes for every event of every positioned service.
///
/// Output order mirrors the listing: bouquet, then service, then event.
pub fn build_programmes(
    listing: &Listing,
    formatter: &TimeFormatter,
    observer: &dyn GenerationObserver,
) -> Result<Vec<Programme>> {
    let mut programmes = Vec::new();

    for service in listing.channel_services() {
        for event in listing.events_for(&service.program_reference) {
            let programme = build_programme(&service.program_reference, event, formatter)?;
            observer.programme_emitted(&programme);
            programmes.push(programme);
        }
    }

    Ok(programmes)
}

pub(crate) fn write_programme<W: Write>(writer: &mut Writer<W>, programme: &Programme) -> Result<()> {
    let mut start = BytesStart::new("programme");
    start.push_attribute(("channel", programme.channel.as_str()));
    start.push_attribute(("start", programme.start.as_str()));
    start.push_attribute(("stop", programme.stop.as_str()));
    writer.write_event(Event::Start(start))?;

    write_text_element(writer, "title", &[("lang", LANG)], &programme.title)?;
    if let Some(subtitle) = &programme.subtitle {
        write_text_element(writer, "sub-title", &[("lang", LANG)], subtitle)?;
    }
    write_text_element(writer, "desc", &[("lang", LANG)], &programme.description)?;

    if let Some(credits) = &programme.credits {
        writer.write_event(Event::Start(BytesStart::new("credits")))?;
        write_text_element(writer, "director", &[], &credits.director)?;
        for actor in &credits.actors {
            write_text_element(writer, "actor", &[], actor)?;
        }
        writer.write_event(Event::End(BytesEnd::new("credits")))?;
    }

    for category in &programme.categories {
        write_text_element(writer, "category", &[("lang", LANG)], category)?;
    }

    write_text_element(
        writer,
        "length",
        &[("units", "minutes")],
        &programme.length_minutes.to_string(),
    )?;

    for number in &programme.episode_numbers {
        write_text_element(
            writer,
            "episode-num",
            &[("system", number.system.as_str())],
            &number.value,
        )?;
    }

    if programme.is_new {
        write_empty_element(writer, "new", &[])?;
    }

    writer.write_event(Event::End(BytesEnd::new("programme")))?;
    Ok(())
}
