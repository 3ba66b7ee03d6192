use crate::state::State;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

pub(crate) fn build_stats_json(state: &State) -> serde_json::Value {
    let uptime = state.metrics.start_time.elapsed();
    serde_json::json!({
        "uptime_secs": uptime.as_secs(),
        "callsign": state.config.callsign.as_str(),
        "room": state.config.room,
        "signals_sent": state.metrics.signals_sent.load(Ordering::Relaxed),
        "signals_received": state.metrics.signals_received.load(Ordering::Relaxed),
        "frames_dropped": state.metrics.frames_dropped.load(Ordering::Relaxed),
        "active_stations": state.stations.active_count(),
        "history_entries": state.stations.history_len(),
        "version": env!("CARGO_PKG_VERSION"),
    })
}

pub(crate) async fn run_stats_server(listener: TcpListener, state: Arc<State>) {
    match listener.local_addr() {
        Ok(addr) => info!(addr = %addr, "Stats server listening"),
        Err(e) => error!("Stats listener has no address: {e}"),
    }
    loop {
        let (mut stream, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Stats accept error: {e}");
                continue;
            }
        };
        debug!(peer = %addr, "Stats connection");
        let state = state.clone();
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let _ = tokio::io::AsyncReadExt::read(&mut stream, &mut buf).await;
            let body = build_stats_json(&state).to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
        });
    }
}
