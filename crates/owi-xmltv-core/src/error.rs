//! Error types for the OpenWebif to XMLTV converter
//!
//! Text heuristics never fail; only retrieval, timestamp conversion and
//! document serialization produce these errors.

use thiserror::Error;

/// Error type for converter operations
#[derive(Error, Debug)]
pub enum XmltvError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Writing the document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML writer rejected an event
    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An event timestamp could not be represented as a date
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The requested bouquet does not exist on the receiver
    #[error("Bouquet not found: {0}")]
    BouquetNotFound(String),

    /// The API answered with a payload we could not understand
    #[error("Unexpected API response: {0}")]
    ApiError(String),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Requested resource was not found (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Result type alias for converter operations
pub type Result<T> = std::result::Result<T, XmltvError>;
