use dashmap::DashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::render::{render, HistoryEntry};
use crate::signal::{parse_frame, Callsign, Signal};
use crate::state::State;

/// One participant's in-progress transmission.
///
/// `generation` counts ingests; a flush task remembers the generation it was
/// scheduled for and gives up if another ingest has happened since. Together
/// with `abort` this guarantees at most one effective flush per quiescent
/// period even if an abort races an already-running task.
#[derive(Default)]
pub(crate) struct Station {
    pub(crate) signals: Vec<Signal>,
    pub(crate) generation: u64,
    pub(crate) flush_task: Option<JoinHandle<()>>,
}

/// All stations heard this session, keyed by callsign, plus the append-only
/// session history. Station entries persist across flushes.
#[derive(Default)]
pub(crate) struct StationBook {
    stations: DashMap<String, Station>,
    history: Mutex<Vec<HistoryEntry>>,
}

impl StationBook {
    pub(crate) fn active_count(&self) -> usize {
        self.stations.len()
    }

    pub(crate) fn history_len(&self) -> usize {
        self.history.lock().expect("history lock").len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, callsign: &str) -> bool {
        self.stations.contains_key(callsign)
    }

    #[cfg(test)]
    pub(crate) fn history_snapshot(&self) -> Vec<HistoryEntry> {
        self.history.lock().expect("history lock").clone()
    }
}

/// Route one raw inbound frame: validate both fields, drop silently (with a
/// diagnostic log and a counter) on any violation, otherwise ingest and play
/// back marks audibly.
pub(crate) fn handle_frame(state: &Arc<State>, raw: &str) {
    let Some((signal, callsign)) = parse_frame(raw) else {
        state.metrics.frames_dropped.fetch_add(1, Ordering::Relaxed);
        let shown: String = raw.chars().take(40).collect();
        warn!(frame = %shown, "dropping malformed frame");
        return;
    };
    state.metrics.signals_received.fetch_add(1, Ordering::Relaxed);
    if signal.is_mark() {
        state.tone.blip(signal);
    }
    ingest(state, &callsign, signal);
}

/// Emit a locally keyed signal: relay it, then ingest into our own station
/// so the local view matches what everyone else sees.
pub(crate) async fn emit_own(state: &Arc<State>, signal: Signal) -> Result<(), AppError> {
    state
        .transport
        .send_signal(signal, &state.config.callsign)
        .await?;
    state.metrics.signals_sent.fetch_add(1, Ordering::Relaxed);
    let callsign = state.config.callsign.clone();
    ingest(state, &callsign, signal);
    Ok(())
}

/// Append one signal to a participant's buffer, re-render the live bubble
/// and reset that participant's flush timer. Creates the station on first
/// contact.
pub(crate) fn ingest(state: &Arc<State>, callsign: &Callsign, signal: Signal) {
    let bubble;
    {
        let mut entry = state
            .stations
            .stations
            .entry(callsign.as_str().to_string())
            .or_default();
        if let Some(task) = entry.flush_task.take() {
            task.abort();
        }
        entry.signals.push(signal);
        entry.generation += 1;
        bubble = render(&entry.signals);

        let scheduled_for = entry.generation;
        let state = Arc::clone(state);
        let callsign = callsign.clone();
        entry.flush_task = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(state.config.flush_window_ms)).await;
            flush(&state, &callsign, scheduled_for);
        }));
    }
    state.bubbles.live(callsign, &bubble);
}

/// Cancel a participant's pending flush without touching the buffer. Used
/// while the local key is held down.
pub(crate) fn hold(state: &State, callsign: &Callsign) {
    if let Some(mut entry) = state.stations.stations.get_mut(callsign.as_str()) {
        if let Some(task) = entry.flush_task.take() {
            task.abort();
        }
    }
}

/// Finalize a quiescent buffer into history and clear it. The station entry
/// itself persists for future signals.
fn flush(state: &Arc<State>, callsign: &Callsign, scheduled_for: u64) {
    let signals = {
        let Some(mut entry) = state.stations.stations.get_mut(callsign.as_str()) else {
            return;
        };
        if entry.generation != scheduled_for {
            debug!(%callsign, "stale flush, newer activity won");
            return;
        }
        entry.flush_task = None;
        std::mem::take(&mut entry.signals)
    };
    if signals.is_empty() {
        return;
    }

    let entry = HistoryEntry {
        callsign: callsign.clone(),
        bubble: render(&signals),
    };
    debug!(%callsign, text = %entry.bubble.text, "flushing buffer to history");
    state.bubbles.history(&entry);
    state.bubbles.clear_live(callsign);
    state
        .stations
        .history
        .lock()
        .expect("history lock")
        .push(entry);
}
