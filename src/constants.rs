/// Default length of one dit in milliseconds. Everything else derives from it.
pub(crate) const DEFAULT_DIT_MS: u64 = 80;

/// Presses and pauses shorter than 3 dit lengths are "short" (dit /
/// intra-letter gap); at or above, "long" (dah / letter gap).
pub(crate) const LETTER_GAP_FACTOR: u64 = 3;

/// Pauses of 7 dit lengths or more separate words.
pub(crate) const WORD_GAP_FACTOR: u64 = 7;

/// Inactivity window after which a participant's buffer is flushed to history.
pub(crate) const FLUSH_WINDOW_MS: u64 = 1000;

/// A callsign is exactly this many uppercase ASCII letters.
pub(crate) const CALLSIGN_LEN: usize = 5;

/// Default sidetone pitch for the local key.
pub(crate) const DEFAULT_TONE_HZ: f32 = 600.0;

/// Remote participants play back at a slightly lower pitch so streams are
/// distinguishable by ear.
pub(crate) const REMOTE_TONE_HZ: f32 = 520.0;

/// Sine amplitude for generated tones.
pub(crate) const TONE_AMPLITUDE: f32 = 0.2;

/// Default relay server base URL.
pub(crate) const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";
