use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::constants::TONE_AMPLITUDE;
use crate::error::AppError;
use crate::signal::Signal;
use crate::traits::ToneSink;

/// Sine-tone output via cpal.
///
/// cpal streams are not `Send`, so a dedicated thread builds and owns the
/// stream for the life of the process; this handle only flips atomics that
/// the audio callback reads. Local sidetone and remote playback are
/// independent oscillators and may overlap.
pub(crate) struct CpalTone {
    local_gate: Arc<AtomicBool>,
    remote_deadline_us: Arc<AtomicU64>,
    epoch: Instant,
    dit_ms: u64,
}

impl CpalTone {
    pub(crate) fn new(dit_ms: u64, local_hz: f32, remote_hz: f32) -> Result<Self, AppError> {
        let local_gate = Arc::new(AtomicBool::new(false));
        let remote_deadline_us = Arc::new(AtomicU64::new(0));
        let epoch = Instant::now();

        let gate = Arc::clone(&local_gate);
        let deadline = Arc::clone(&remote_deadline_us);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            match build_stream(gate, deadline, epoch, local_hz, remote_hz) {
                Ok(stream) => {
                    let _ = ready_tx.send(Ok(()));
                    // The stream must outlive the session; park forever.
                    drop(ready_tx);
                    let _keepalive = stream;
                    loop {
                        std::thread::park();
                    }
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            }
        });

        ready_rx
            .recv()
            .map_err(|_| AppError::Audio("audio thread died during setup".to_string()))??;
        Ok(Self {
            local_gate,
            remote_deadline_us,
            epoch,
            dit_ms,
        })
    }
}

fn build_stream(
    gate: Arc<AtomicBool>,
    deadline: Arc<AtomicU64>,
    epoch: Instant,
    local_hz: f32,
    remote_hz: f32,
) -> Result<cpal::Stream, AppError> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| AppError::Audio("no output device".to_string()))?;
    let config = device
        .default_output_config()
        .map_err(|e| AppError::Audio(e.to_string()))?;
    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(AppError::Audio(format!(
            "unsupported sample format {:?}",
            config.sample_format()
        )));
    }
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    debug!(sample_rate, channels, "audio output configured");

    let mut local_phase = 0f32;
    let mut remote_phase = 0f32;
    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let now_us = epoch.elapsed().as_micros() as u64;
                let local_on = gate.load(Ordering::Relaxed);
                let remote_on = deadline.load(Ordering::Relaxed) > now_us;
                for frame in data.chunks_mut(channels) {
                    let mut sample = 0.0;
                    if local_on {
                        sample += (local_phase * TAU).sin() * TONE_AMPLITUDE;
                        local_phase = (local_phase + local_hz / sample_rate).fract();
                    }
                    if remote_on {
                        sample += (remote_phase * TAU).sin() * TONE_AMPLITUDE;
                        remote_phase = (remote_phase + remote_hz / sample_rate).fract();
                    }
                    for out in frame {
                        *out = sample;
                    }
                }
            },
            |e| warn!("audio stream error: {e}"),
            None,
        )
        .map_err(|e| AppError::Audio(e.to_string()))?;
    stream.play().map_err(|e| AppError::Audio(e.to_string()))?;
    Ok(stream)
}

/// Nominal playback length of a remote mark, in microseconds.
fn blip_micros(dit_ms: u64, signal: Signal) -> u64 {
    match signal {
        Signal::Dit => dit_ms * 1000,
        Signal::Dah => dit_ms * 3000,
        Signal::LetterPause | Signal::WordPause => 0,
    }
}

impl ToneSink for CpalTone {
    fn key_down(&self) {
        self.local_gate.store(true, Ordering::Relaxed);
    }

    fn key_up(&self) {
        self.local_gate.store(false, Ordering::Relaxed);
    }

    fn blip(&self, signal: Signal) {
        let dur = blip_micros(self.dit_ms, signal);
        if dur == 0 {
            return;
        }
        let until = self.epoch.elapsed().as_micros() as u64 + dur;
        self.remote_deadline_us.fetch_max(until, Ordering::Relaxed);
    }
}

/// Silent fallback when no audio device is available. The chat stays fully
/// usable, just without tones.
pub(crate) struct NullTone;

impl ToneSink for NullTone {
    fn key_down(&self) {}
    fn key_up(&self) {}
    fn blip(&self, _signal: Signal) {}
}
