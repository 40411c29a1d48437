//! The `<tv>` document: generator identity, channels, then programmes.

use std::io::Write;

use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::observer::{GenerationObserver, GenerationSummary, TracingObserver};
use crate::time::TimeFormatter;
use crate::types::{Channel, Listing, Programme};

use super::channel::{build_channels, write_channel};
use super::programme::{build_programmes, write_programme};

/// Default value of `generator-info-name`
pub const DEFAULT_GENERATOR_NAME: &str = "OpenWebIf 2 XMLTV";

/// Default value of `generator-info-url`
pub const DEFAULT_GENERATOR_URL: &str = env!("CARGO_PKG_REPOSITORY");

const DOCTYPE: &str = r#"tv SYSTEM "xmltv.dtd""#;

/// Identity written on the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorInfo {
    pub name: String,
    pub url: String,
}

impl Default for GeneratorInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_GENERATOR_NAME.to_string(),
            url: DEFAULT_GENERATOR_URL.to_string(),
        }
    }
}

/// A fully assembled schedule, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDocument {
    pub generator: GeneratorInfo,
    /// Generation date as `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    pub channels: Vec<Channel>,
    pub programmes: Vec<Programme>,
}

impl ScheduleDocument {
    /// Serialize as UTF-8 XML with two-space indentation.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;

        let mut root = BytesStart::new("tv");
        root.push_attribute(("generator-info-url", self.generator.url.as_str()));
        root.push_attribute(("generator-info-name", self.generator.name.as_str()));
        root.push_attribute(("date", self.date.as_str()));
        writer.write_event(Event::Start(root))?;

        for channel in &self.channels {
            write_channel(writer, channel)?;
        }
        for programme in &self.programmes {
            write_programme(writer, programme)?;
        }

        writer.write_event(Event::End(BytesEnd::new("tv")))?;
        Ok(())
    }
}

/// Turns a retrieved [`Listing`] into an XMLTV document.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use owi_xmltv_core::observer::NoopObserver;
/// use owi_xmltv_core::{Listing, ScheduleDocumentGenerator};
///
/// let generator = ScheduleDocumentGenerator::new("http://localhost:80").with_observer(NoopObserver);
/// let now = FixedOffset::east_opt(3600).unwrap().with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
/// let xml = generator.generate(&Listing::default(), &now).unwrap();
/// assert!(String::from_utf8(xml).unwrap().contains(r#"date="2024-01-01 12:00:00""#));
/// ```
pub struct ScheduleDocumentGenerator<O = TracingObserver> {
    info: GeneratorInfo,
    api_root: String,
    observer: O,
}

impl ScheduleDocumentGenerator {
    /// Create a generator that reports through `tracing`.
    ///
    /// # Arguments
    /// * `api_root` - Root URL of the receiver, prefixed to picon paths
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            info: GeneratorInfo::default(),
            api_root: api_root.into(),
            observer: TracingObserver,
        }
    }
}

impl<O: GenerationObserver> ScheduleDocumentGenerator<O> {
    /// Replace the observer receiving progress reports.
    pub fn with_observer<P: GenerationObserver>(self, observer: P) -> ScheduleDocumentGenerator<P> {
        ScheduleDocumentGenerator {
            info: self.info,
            api_root: self.api_root,
            observer,
        }
    }

    /// Replace the generator identity written on the root element.
    pub fn with_info(mut self, info: GeneratorInfo) -> Self {
        self.info = info;
        self
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Assemble channels and programmes without serializing them.
    ///
    /// The UTC offset of `generated_at` is used for every programme time.
    pub fn build(
        &self,
        listing: &Listing,
        generated_at: &DateTime<FixedOffset>,
    ) -> Result<ScheduleDocument> {
        let formatter = TimeFormatter::at(generated_at);
        self.observer.offset_selected(formatter.offset());

        let channels = build_channels(listing, &self.api_root, &self.observer);
        let programmes = build_programmes(listing, &formatter, &self.observer)?;

        Ok(ScheduleDocument {
            generator: self.info.clone(),
            date: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            channels,
            programmes,
        })
    }

    /// Assemble and serialize the document.
    pub fn generate(
        &self,
        listing: &Listing,
        generated_at: &DateTime<FixedOffset>,
    ) -> Result<Vec<u8>> {
        let document = self.build(listing, generated_at)?;
        let xml = document.to_xml()?;

        self.observer.finished(&GenerationSummary {
            channels: document.channels.len(),
            programmes: document.programmes.len(),
            bytes: xml.len(),
        });

        Ok(xml)
    }
}
