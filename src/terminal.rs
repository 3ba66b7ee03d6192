use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use std::io::Write;
use tracing::warn;

use crate::error::AppError;
use crate::render::{Bubble, HistoryEntry};
use crate::signal::Callsign;
use crate::traits::BubbleSink;

/// What a terminal event means to the chat loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyAction {
    /// Space bar went down (includes auto-repeat; the keyer debounces).
    SpaceDown,
    /// Space bar came up.
    SpaceUp,
    Quit,
}

/// Map a raw terminal event onto the chat's input vocabulary. Everything
/// else is ignored.
pub(crate) fn map_key(event: &Event) -> Option<KeyAction> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event
    else {
        return None;
    };
    match (code, kind) {
        (KeyCode::Char(' '), KeyEventKind::Press | KeyEventKind::Repeat) => {
            Some(KeyAction::SpaceDown)
        }
        (KeyCode::Char(' '), KeyEventKind::Release) => Some(KeyAction::SpaceUp),
        (KeyCode::Char('c'), KeyEventKind::Press) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        (KeyCode::Char('q') | KeyCode::Esc, KeyEventKind::Press) => Some(KeyAction::Quit),
        _ => None,
    }
}

/// Puts the terminal into raw mode with key-release reporting for the
/// session, restoring it on drop. Key release needs the kitty keyboard
/// protocol; without it the client can listen but not key.
pub(crate) struct RawModeGuard {
    enhanced: bool,
}

impl RawModeGuard {
    pub(crate) fn enter() -> Result<Self, AppError> {
        terminal::enable_raw_mode()?;
        let enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if enhanced {
            execute!(
                std::io::stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        } else {
            warn!("terminal does not report key releases; keying disabled, receive-only session");
        }
        Ok(Self { enhanced })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
    }
}

/// Bubble sink printing to the raw-mode terminal. History scrolls up; the
/// bottom line shows the most recently active live bubble.
pub(crate) struct TerminalBubbles;

const CLEAR_LINE: &str = "\r\x1b[2K";

impl BubbleSink for TerminalBubbles {
    fn live(&self, callsign: &Callsign, bubble: &Bubble) {
        let mut out = std::io::stdout().lock();
        let _ = write!(
            out,
            "{CLEAR_LINE}{callsign} {} {}",
            bubble.marks, bubble.text
        );
        let _ = out.flush();
    }

    fn history(&self, entry: &HistoryEntry) {
        let mut out = std::io::stdout().lock();
        let _ = write!(
            out,
            "{CLEAR_LINE}{} | {} | {}\r\n",
            entry.callsign, entry.bubble.marks, entry.bubble.text
        );
        let _ = out.flush();
    }

    fn clear_live(&self, _callsign: &Callsign) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{CLEAR_LINE}");
        let _ = out.flush();
    }
}
