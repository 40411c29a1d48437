//! OpenWebif to XMLTV Core Library
//!
//! This crate converts the electronic programme guide of an Enigma2
//! receiver, as exposed by its OpenWebif API, into an XMLTV document.
//!
//! # Features
//! - Rate-limited OpenWebif client with retries
//! - Bouquet, service and EPG retrieval
//! - Heuristic annotations: categories, episode numbers, credits, sub-titles
//! - XMLTV serialization with pluggable progress reporting

pub mod client;
pub mod error;
pub mod fetcher;
pub mod observer;
pub mod parser;
pub mod time;
pub mod types;
pub mod xmltv;

// Re-export main types for convenience
pub use client::{ClientConfig, OpenWebifClient, RateLimiter};
pub use error::{Result, XmltvError};
pub use fetcher::{BouquetRef, EpgFetcher};
pub use observer::{GenerationObserver, GenerationSummary, NoopObserver, TracingObserver};
pub use time::{TimeFormatter, TzOffset};
pub use types::{
    Bouquet, Channel, Credits, EpisodeNum, EpisodeNumSystem, EpisodeNumber, Event, Listing,
    Programme, Service,
};
pub use xmltv::{GeneratorInfo, ScheduleDocument, ScheduleDocumentGenerator};
