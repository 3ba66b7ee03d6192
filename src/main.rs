use clap::{Parser, ValueEnum};
use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{error, info, warn};

mod config;
mod constants;
mod directory;
mod error;
mod keyer;
mod morse;
mod render;
mod signal;
mod state;
mod station;
mod stats;
mod terminal;
mod tone;
mod traits;

use config::FileConfig;
use constants::{DEFAULT_DIT_MS, DEFAULT_SERVER, DEFAULT_TONE_HZ, FLUSH_WINDOW_MS, REMOTE_TONE_HZ};
use directory::RoomDirectory;
use error::AppError;
use keyer::Keyer;
use signal::Callsign;
use state::{Config, Metrics, State};
use terminal::{KeyAction, RawModeGuard, TerminalBubbles};
use tone::{CpalTone, NullTone};
use traits::{ToneSink, WsTransport};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "cwchat", about = "Morse code chat in your terminal")]
struct Args {
    /// Room to join; omit to list open rooms and exit
    #[arg(long, env = "CWCHAT_ROOM")]
    room: Option<String>,

    /// Ask the directory for a fresh room and join it
    #[arg(long, default_value_t = false)]
    gen_room: bool,

    /// Relay server base URL
    #[arg(long, env = "CWCHAT_SERVER")]
    server: Option<String>,

    /// Dit length in milliseconds
    #[arg(long, env = "CWCHAT_DIT_MS")]
    dit_ms: Option<u64>,

    /// Sidetone pitch in Hz
    #[arg(long, env = "CWCHAT_TONE_HZ")]
    tone_hz: Option<f32>,

    /// Serve session stats as JSON on this local port
    #[arg(long, env = "CWCHAT_STATS_PORT")]
    stats_port: Option<u16>,

    /// Optional YAML settings file (flags win over the file)
    #[arg(long, env = "CWCHAT_CONFIG")]
    config: Option<String>,

    /// Disable audio output
    #[arg(long, default_value_t = false)]
    mute: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "CWCHAT_LOG_FORMAT")]
    log_format: LogFormat,
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cwchat=info".parse().expect("static filter"));
    // Logs go to stderr; stdout belongs to the chat view.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.log_format);

    if let Err(e) = run(args).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let file = match &args.config {
        Some(path) => config::load(path)?,
        None => FileConfig::default(),
    };
    let server = args
        .server
        .or(file.server)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let dit_ms = args.dit_ms.or(file.dit_ms).unwrap_or(DEFAULT_DIT_MS);
    let tone_hz = args.tone_hz.or(file.tone_hz).unwrap_or(DEFAULT_TONE_HZ);
    let stats_port = args.stats_port.or(file.stats_port);

    let directory = RoomDirectory::new(&server);
    let room = match (args.room, args.gen_room) {
        (Some(room), _) => room,
        (None, true) => directory.gen_room().await?,
        (None, false) => {
            let rooms = directory.list_rooms().await?;
            println!("Open rooms on {server}:");
            for room in &rooms {
                println!("  {room}");
            }
            println!("Join with --room <name>, or create one with --gen-room.");
            return Err(AppError::NoRoom);
        }
    };

    let callsign = Callsign::generate();
    info!(%callsign, %room, "starting session");

    let ws_url = format!("{}/ws?room={}", server.replace("http", "ws"), room);
    let (ws, _) = tokio_tungstenite::connect_async(&ws_url).await?;
    info!(url = %ws_url, "connected to room relay");
    let (ws_sink, ws_read) = ws.split();

    let tone: Box<dyn ToneSink> = if args.mute {
        Box::new(NullTone)
    } else {
        match CpalTone::new(dit_ms, tone_hz, REMOTE_TONE_HZ) {
            Ok(tone) => Box::new(tone),
            Err(e) => {
                warn!("{e}; continuing without audio");
                Box::new(NullTone)
            }
        }
    };

    let state = Arc::new(State {
        config: Config {
            callsign,
            room,
            server,
            dit_ms,
            flush_window_ms: FLUSH_WINDOW_MS,
        },
        metrics: Metrics {
            start_time: Instant::now(),
            signals_sent: AtomicU64::new(0),
            signals_received: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
        },
        stations: station::StationBook::default(),
        transport: Box::new(WsTransport::new(ws_sink)),
        tone,
        bubbles: Box::new(TerminalBubbles),
    });

    if let Some(port) = stats_port {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(stats::run_stats_server(listener, Arc::clone(&state)));
    }

    println!(
        "You are {} in room {}. Key with the space bar, quit with q.",
        state.config.callsign, state.config.room
    );

    let _guard = RawModeGuard::enter()?;
    chat_loop(&state, ws_read).await
}

type WsRead = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// The session's single event loop: terminal key events drive the keyer and
/// outbound signals, inbound frames drive remote buffers. Flush timers run
/// as spawned tasks inside the station book.
async fn chat_loop(state: &Arc<State>, mut ws_read: WsRead) -> Result<(), AppError> {
    let mut keyer = Keyer::new(state.config.dit_ms);
    let epoch = Instant::now();
    let mut term_events = crossterm::event::EventStream::new();

    loop {
        tokio::select! {
            maybe_event = term_events.next() => {
                let Some(event) = maybe_event else {
                    info!("terminal input closed");
                    break;
                };
                let event = event?;
                let now_ms = epoch.elapsed().as_millis() as u64;
                match terminal::map_key(&event) {
                    // Auto-repeat while held arrives as more SpaceDowns;
                    // is_pressed filters it out.
                    Some(KeyAction::SpaceDown) if !keyer.is_pressed() => {
                        state.tone.key_down();
                        // An active press must not be flushed out from
                        // under us.
                        station::hold(state, &state.config.callsign);
                        if let Some(sig) = keyer.key_down(now_ms) {
                            station::emit_own(state, sig).await?;
                        }
                    }
                    Some(KeyAction::SpaceDown) => {}
                    Some(KeyAction::SpaceUp) => {
                        state.tone.key_up();
                        if let Some(sig) = keyer.key_up(now_ms) {
                            station::emit_own(state, sig).await?;
                        }
                    }
                    Some(KeyAction::Quit) => {
                        info!("leaving room");
                        break;
                    }
                    None => {}
                }
            }
            maybe_msg = ws_read.next() => {
                let Some(msg) = maybe_msg else {
                    info!("relay closed the connection");
                    break;
                };
                let msg = msg?;
                if msg.is_text() {
                    let text = msg.into_text()?;
                    station::handle_frame(state, &text);
                }
            }
        }
    }
    Ok(())
}
