//! `<channel>` entries.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::observer::GenerationObserver;
use crate::parser::sanitize;
use crate::types::{Channel, Event as EpgEvent, Listing, Service};

use super::{write_empty_element, write_text_element};

/// Build the channel entry of a service.
///
/// Returns `None` for services without a position. The icon comes from the
/// picon of the first event and is only set when the channel has events.
pub fn build_channel(service: &Service, events: &[EpgEvent], api_root: &str) -> Option<Channel> {
    let position = service.position?;

    Some(Channel {
        id: service.program_reference.clone(),
        display_names: vec![sanitize(&service.name), position.to_string()],
        icon_url: events
            .first()
            .map(|event| format!("{}{}", api_root, event.picon)),
    })
}

/// Build one channel per positioned service, in bouquet order.
pub fn build_channels(
    listing: &Listing,
    api_root: &str,
    observer: &dyn GenerationObserver,
) -> Vec<Channel> {
    let mut channels = Vec::new();

    for service in listing.channel_services() {
        let events = listing.events_for(&service.program_reference);
        if events.is_empty() {
            observer.epg_missing(&service.program_reference, &service.name);
        }
        if let Some(channel) = build_channel(service, events, api_root) {
            observer.channel_emitted(&channel);
            channels.push(channel);
        }
    }

    channels
}

pub(crate) fn write_channel<W: Write>(writer: &mut Writer<W>, channel: &Channel) -> Result<()> {
    let mut start = BytesStart::new("channel");
    start.push_attribute(("id", channel.id.as_str()));
    writer.write_event(Event::Start(start))?;

    for name in &channel.display_names {
        write_text_element(writer, "display-name", &[], name)?;
    }
    if let Some(icon_url) = &channel.icon_url {
        write_empty_element(writer, "icon", &[("src", icon_url.as_str())])?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    Ok(())
}
