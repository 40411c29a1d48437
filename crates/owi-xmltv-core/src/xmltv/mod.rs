//! XMLTV document assembly
//!
//! - `channel`: one `<channel>` per positioned service
//! - `programme`: one `<programme>` per event, with heuristic annotations
//! - `document`: the `<tv>` root, generator identity and serialization

pub mod channel;
pub mod document;
pub mod programme;

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;

pub use channel::{build_channel, build_channels};
pub use document::{GeneratorInfo, ScheduleDocument, ScheduleDocumentGenerator};
pub use programme::{build_programme, build_programmes};

/// Language tag of every localized element
pub const LANG: &str = "en";

/// Write `<name attrs...>text</name>`; the text is escaped by the writer.
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a childless `<name attrs.../>`.
fn write_empty_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<()> {
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    writer.write_event(Event::Empty(element))?;
    Ok(())
}
