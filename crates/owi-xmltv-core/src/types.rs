//! Data types for the OpenWebif to XMLTV converter
//!
//! Input records (`Service`, `Event`, `Bouquet`) deserialize straight from the
//! OpenWebif JSON API. Output records (`Channel`, `Programme`) are built fresh
//! on every run and only live until the document is serialized.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A single tunable entry of a bouquet.
///
/// Entries without a position are markers or separators and never become
/// channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Position of the service inside its bouquet
    #[serde(rename = "pos", default)]
    pub position: Option<u32>,
    /// Display name of the service
    #[serde(rename = "servicename", default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Full enigma2 service reference, used to query the EPG
    #[serde(
        rename = "servicereference",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub service_reference: String,
    /// Program reference linking the service to its events and channel id
    #[serde(rename = "program", default, deserialize_with = "string_or_number")]
    pub program_reference: String,
}

impl Service {
    /// Whether the service represents a real channel.
    pub fn is_channel(&self) -> bool {
        self.position.is_some()
    }
}

/// One scheduled broadcast of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Start of the broadcast in seconds since the Unix epoch
    pub begin_timestamp: i64,
    /// Length of the broadcast in minutes
    #[serde(rename = "duration", default)]
    pub duration_minutes: i64,
    /// Event title, possibly prefixed with `New: `
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Short description, often carrying `[Category]` and episode markers
    #[serde(rename = "shortdesc", default, deserialize_with = "null_as_empty")]
    pub short_description: String,
    /// Long description, for movies often followed by director and cast lines
    #[serde(rename = "longdesc", default, deserialize_with = "null_as_empty")]
    pub long_description: String,
    /// Picon path relative to the API root
    #[serde(default, deserialize_with = "null_as_empty")]
    pub picon: String,
}

/// A named group of services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bouquet {
    /// Display name of the bouquet
    pub name: String,
    /// Service reference of the bouquet itself
    pub reference: String,
    /// Services in bouquet order
    pub services: Vec<Service>,
}

/// Fully retrieved input for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Listing {
    /// Bouquets in the order they were retrieved
    pub bouquets: Vec<Bouquet>,
    /// Events per program reference
    pub epg: HashMap<String, Vec<Event>>,
}

impl Listing {
    /// Iterate over every service that carries a position, in bouquet order.
    pub fn channel_services(&self) -> impl Iterator<Item = &Service> {
        self.bouquets
            .iter()
            .flat_map(|bouquet| bouquet.services.iter())
            .filter(|service| service.is_channel())
    }

    /// Events recorded for a program reference (empty when none were fetched).
    pub fn events_for(&self, program_reference: &str) -> &[Event] {
        self.epg
            .get(program_reference)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Channel entry of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Program reference of the service
    pub id: String,
    /// Sanitized service name followed by the position
    pub display_names: Vec<String>,
    /// Picon URL of the first event, if the channel has any event
    pub icon_url: Option<String>,
}

/// Numbering system of an `episode-num` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeNumSystem {
    /// Zero-indexed `season.episode.part`
    #[serde(rename = "xmltv_ns")]
    XmltvNs,
    /// `YYYY-MM-DD` of the first broadcast
    #[serde(rename = "original-air-date")]
    OriginalAirDate,
}

impl EpisodeNumSystem {
    /// Value of the `system` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeNumSystem::XmltvNs => "xmltv_ns",
            EpisodeNumSystem::OriginalAirDate => "original-air-date",
        }
    }
}

/// An `episode-num` annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeNum {
    pub system: EpisodeNumSystem,
    pub value: String,
}

/// Zero-indexed season/episode/part triple.
///
/// Renders as `S.E.P` with absent fields left empty, so the dotted
/// three-field shape is kept even when nothing is known. A source number of
/// `0` is stored as `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeNumber {
    pub season: Option<i64>,
    pub episode: Option<i64>,
    pub part: Option<i64>,
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field(value: Option<i64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }
        write!(
            f,
            "{}.{}.{}",
            field(self.season),
            field(self.episode),
            field(self.part)
        )
    }
}

/// Cast and crew of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub director: String,
    pub actors: Vec<String>,
}

/// Programme entry of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Programme {
    /// Program reference of the owning channel
    pub channel: String,
    /// Start as `YYYYMMDDHHMMSS ±HHMM`
    pub start: String,
    /// Stop as `YYYYMMDDHHMMSS ±HHMM`
    pub stop: String,
    pub length_minutes: i64,
    pub description: String,
    pub subtitle: Option<String>,
    pub title: String,
    pub is_new: bool,
    /// At most two categories from the short description, or `Series`
    pub categories: Vec<String>,
    pub episode_numbers: Vec<EpisodeNum>,
    pub credits: Option<Credits>,
}

impl Programme {
    /// First category, which drives the series and credits heuristics.
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

/// Treat a JSON `null` text field like a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// OpenWebif reports `program` as a number; accept strings too.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
        Missing,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
        Raw::Missing => String::new(),
    })
}
