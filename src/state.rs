use std::sync::atomic::AtomicU64;
use std::time::Instant;

use crate::signal::Callsign;
use crate::station::StationBook;
use crate::traits::{BubbleSink, ToneSink, Transport};

/// Immutable session configuration set at startup.
pub(crate) struct Config {
    pub(crate) callsign: Callsign,
    pub(crate) room: String,
    pub(crate) server: String,
    pub(crate) dit_ms: u64,
    pub(crate) flush_window_ms: u64,
}

/// Runtime metrics (atomic counters).
pub(crate) struct Metrics {
    pub(crate) start_time: Instant,
    pub(crate) signals_sent: AtomicU64,
    pub(crate) signals_received: AtomicU64,
    pub(crate) frames_dropped: AtomicU64,
}

pub(crate) struct State {
    pub(crate) config: Config,
    pub(crate) metrics: Metrics,
    pub(crate) stations: StationBook,
    pub(crate) transport: Box<dyn Transport>,
    pub(crate) tone: Box<dyn ToneSink>,
    pub(crate) bubbles: Box<dyn BubbleSink>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::constants::{DEFAULT_DIT_MS, FLUSH_WINDOW_MS};
    use crate::traits::{MockBubbleSink, MockToneSink, MockTransport};

    pub(crate) fn test_state_with(
        transport: MockTransport,
        tone: MockToneSink,
        bubbles: MockBubbleSink,
    ) -> State {
        State {
            config: Config {
                callsign: Callsign::parse("TESTY").unwrap(),
                room: "roomForAll".to_string(),
                server: "http://127.0.0.1:9999".to_string(),
                dit_ms: DEFAULT_DIT_MS,
                flush_window_ms: FLUSH_WINDOW_MS,
            },
            metrics: Metrics {
                start_time: Instant::now(),
                signals_sent: AtomicU64::new(0),
                signals_received: AtomicU64::new(0),
                frames_dropped: AtomicU64::new(0),
            },
            stations: StationBook::default(),
            transport: Box::new(transport),
            tone: Box::new(tone),
            bubbles: Box::new(bubbles),
        }
    }

    /// Bubble sink that accepts any call, for tests asserting on state
    /// rather than render output.
    pub(crate) fn quiet_bubbles() -> MockBubbleSink {
        let mut bubbles = MockBubbleSink::new();
        bubbles.expect_live().returning(|_, _| ());
        bubbles.expect_history().returning(|_| ());
        bubbles.expect_clear_live().returning(|_| ());
        bubbles
    }

    /// Tone sink that accepts any call.
    pub(crate) fn quiet_tone() -> MockToneSink {
        let mut tone = MockToneSink::new();
        tone.expect_key_down().returning(|| ());
        tone.expect_key_up().returning(|| ());
        tone.expect_blip().returning(|_| ());
        tone
    }
}
