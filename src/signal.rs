use rand::Rng;
use std::fmt;

use crate::constants::CALLSIGN_LEN;

/// One keyed symbol. Dits and dahs are marks; the two pauses segment marks
/// into letters and words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Signal {
    Dit,
    Dah,
    LetterPause,
    WordPause,
}

impl Signal {
    /// Wire token, exactly as it appears in a frame.
    pub(crate) fn token(self) -> &'static str {
        match self {
            Signal::Dit => "dit",
            Signal::Dah => "dah",
            Signal::LetterPause => "letter_pause",
            Signal::WordPause => "word_pause",
        }
    }

    /// Inverse of [`token`](Self::token). Tokens are case-sensitive.
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "dit" => Some(Signal::Dit),
            "dah" => Some(Signal::Dah),
            "letter_pause" => Some(Signal::LetterPause),
            "word_pause" => Some(Signal::WordPause),
            _ => None,
        }
    }

    pub(crate) fn is_mark(self) -> bool {
        matches!(self, Signal::Dit | Signal::Dah)
    }

    /// Decode-buffer mark for this signal, if it is one.
    pub(crate) fn mark(self) -> Option<char> {
        match self {
            Signal::Dit => Some('.'),
            Signal::Dah => Some('_'),
            _ => None,
        }
    }
}

/// A participant identity: exactly 5 ASCII letters, stored uppercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Callsign(String);

impl Callsign {
    /// Validate and normalize. Returns `None` unless the input is exactly
    /// 5 ASCII alphabetic characters (any case).
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        if raw.len() != CALLSIGN_LEN || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self(raw.to_ascii_uppercase()))
    }

    /// Random session identity, 5 letters A-Z.
    pub(crate) fn generate() -> Self {
        let mut rng = rand::rng();
        let name: String = (0..CALLSIGN_LEN)
            .map(|_| char::from(b'A' + rng.random_range(0..26)))
            .collect();
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize a signal for the relay: `"<signal>:<callsign>"`.
pub(crate) fn encode_frame(signal: Signal, callsign: &Callsign) -> String {
    format!("{}:{}", signal.token(), callsign)
}

/// Parse an inbound frame. Both fields are validated independently; any
/// violation yields `None` and the caller drops the frame.
pub(crate) fn parse_frame(raw: &str) -> Option<(Signal, Callsign)> {
    let (token, callsign) = raw.split_once(':')?;
    let signal = Signal::from_token(token)?;
    let callsign = Callsign::parse(callsign)?;
    Some((signal, callsign))
}
