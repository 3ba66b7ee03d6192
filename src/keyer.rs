use crate::constants::{LETTER_GAP_FACTOR, WORD_GAP_FACTOR};
use crate::signal::Signal;

/// Press/release classifier for the straight key.
///
/// Pure state machine over millisecond timestamps: the caller feeds it
/// `key_down`/`key_up` events and gets back at most one [`Signal`] per
/// transition. A key-down classifies the preceding pause, a key-up
/// classifies the press itself. Side effects (tone, transport, buffer)
/// belong to the caller.
pub(crate) struct Keyer {
    dit_ms: u64,
    pressed: bool,
    press_start: Option<u64>,
    pause_start: Option<u64>,
}

impl Keyer {
    pub(crate) fn new(dit_ms: u64) -> Self {
        Self {
            dit_ms,
            pressed: false,
            press_start: None,
            pause_start: None,
        }
    }

    /// Key went down at `now_ms`. Repeated downs while held are ignored
    /// (auto-repeat debounce). Returns the pause classification for the gap
    /// since the last release, if that gap was long enough to mean anything.
    pub(crate) fn key_down(&mut self, now_ms: u64) -> Option<Signal> {
        if self.pressed {
            return None;
        }
        self.pressed = true;
        self.press_start = Some(now_ms);

        let pause_start = self.pause_start.take()?;
        let gap = now_ms.saturating_sub(pause_start);
        if gap >= WORD_GAP_FACTOR * self.dit_ms {
            Some(Signal::WordPause)
        } else if gap >= LETTER_GAP_FACTOR * self.dit_ms {
            Some(Signal::LetterPause)
        } else {
            None
        }
    }

    /// Key came up at `now_ms`. A release with no recorded press is spurious
    /// and ignored. Returns the press classification: dit below 3 dit
    /// lengths, dah at or above.
    pub(crate) fn key_up(&mut self, now_ms: u64) -> Option<Signal> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        self.pause_start = Some(now_ms);

        let press_start = self.press_start?;
        let held = now_ms.saturating_sub(press_start);
        if held < LETTER_GAP_FACTOR * self.dit_ms {
            Some(Signal::Dit)
        } else {
            Some(Signal::Dah)
        }
    }

    /// Whether the key is currently held.
    pub(crate) fn is_pressed(&self) -> bool {
        self.pressed
    }
}
