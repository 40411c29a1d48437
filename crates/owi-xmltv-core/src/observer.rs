//! Progress reporting for document generation.
//!
//! The generator never prints. It reports what it emits to a
//! [`GenerationObserver`]; [`TracingObserver`] forwards those reports to
//! `tracing`, and tests plug in their own recorder.

use tracing::{debug, info, warn};

use crate::time::TzOffset;
use crate::types::{Channel, Programme};

/// Counts reported once the document has been assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub channels: usize,
    pub programmes: usize,
    pub bytes: usize,
}

/// Receives diagnostics while a document is generated.
///
/// Every hook has an empty default so implementors only override what they
/// care about.
pub trait GenerationObserver {
    /// The offset used for every timestamp of the run.
    fn offset_selected(&self, _offset: TzOffset) {}

    fn channel_emitted(&self, _channel: &Channel) {}

    fn programme_emitted(&self, _programme: &Programme) {}

    /// A channel service had no events in the listing.
    fn epg_missing(&self, _program_reference: &str, _service_name: &str) {}

    fn finished(&self, _summary: &GenerationSummary) {}
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

/// Forwards reports to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl GenerationObserver for TracingObserver {
    fn offset_selected(&self, offset: TzOffset) {
        info!(offset = %offset, "Setting TZ offset from UTC");
    }

    fn channel_emitted(&self, channel: &Channel) {
        debug!(
            id = %channel.id,
            name = channel.display_names.first().map(String::as_str).unwrap_or_default(),
            icon = channel.icon_url.is_some(),
            "Added channel"
        );
    }

    fn programme_emitted(&self, programme: &Programme) {
        debug!(
            channel = %programme.channel,
            start = %programme.start,
            title = %programme.title,
            categories = programme.categories.len(),
            "Added programme"
        );
    }

    fn epg_missing(&self, program_reference: &str, service_name: &str) {
        warn!(
            program = program_reference,
            service = service_name,
            "No EPG events for service"
        );
    }

    fn finished(&self, summary: &GenerationSummary) {
        info!(
            channels = summary.channels,
            programmes = summary.programmes,
            bytes = summary.bytes,
            "Generated XMLTV payload"
        );
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingObserver;
    use super::*;

    #[test]
    fn test_noop_observer_accepts_everything() {
        let observer = NoopObserver;
        observer.offset_selected(TzOffset::from_seconds(0));
        observer.epg_missing("6100", "BBC One");
        observer.finished(&GenerationSummary::default());
    }

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::default();
        observer.offset_selected(TzOffset::from_seconds(3600));
        observer.epg_missing("6100", "BBC One");
        observer.finished(&GenerationSummary {
            channels: 1,
            programmes: 0,
            bytes: 10,
        });

        assert_eq!(
            observer.lines(),
            vec!["offset +0100", "missing 6100", "finished 1 0"]
        );
    }
}
