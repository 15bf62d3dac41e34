//! Native WebSocket client: `tokio-tungstenite`.
//!
//! One background tokio task per live connection:
//! - Normalizes every text frame and publishes it on the [`EventBus`]
//! - Answers server pings
//! - Reconnects with capped exponential backoff and jitter once a session
//!   has been established; a failed first handshake is terminal
//! - Queues outbound messages while a retry is pending

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::WsError;
use crate::network::with_channel;
use crate::ws::{
    normalize, ConnectionState, DomainEvent, EventBus, EventSubscription, MessageOut,
    ReconnectPolicy, WsConfig,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Send(MessageOut),
    Close,
}

// ─── Disconnect reasons for reconnection decision ────────────────────────────

enum DisconnectReason {
    UserRequested,
    NormalClose,
    Closed(String),
    Error(String),
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    url: String,
    policy: ReconnectPolicy,
    bus: EventBus,
    status: Arc<watch::Sender<ConnectionState>>,
    cmd_rx: mpsc::Receiver<Command>,
    pending_messages: Vec<MessageOut>,
    reconnect_attempts: u32,
    /// Set once a handshake has succeeded; retries only apply after that.
    established: bool,
}

impl TaskState {
    fn set_status(&self, state: ConnectionState) {
        set_status(&self.status, state);
    }

    fn should_reconnect(&self) -> bool {
        self.established
            && self.policy.enabled
            && self.reconnect_attempts < self.policy.max_attempts
    }
}

fn set_status(tx: &watch::Sender<ConnectionState>, state: ConnectionState) {
    let previous = tx.send_replace(state);
    if previous != state {
        tracing::debug!("WebSocket status {} -> {}", previous, state);
    }
}

// ─── Public WsClient ─────────────────────────────────────────────────────────

/// Native WebSocket client using `tokio-tungstenite`.
///
/// Holds at most one live connection. The public API talks to the background
/// task over an mpsc channel; status is published on a `watch` channel and
/// events on the [`EventBus`].
pub struct WsClient {
    config: WsConfig,
    bus: EventBus,
    status: Arc<watch::Sender<ConnectionState>>,
    cmd_tx: Option<mpsc::Sender<Command>>,
    task_handle: Option<JoinHandle<()>>,
    channel: Option<String>,
}

impl WsClient {
    /// Create a new WS client. Does not connect yet.
    pub fn new(config: WsConfig) -> Self {
        let bus = EventBus::new(config.event_capacity);
        let (status, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            bus,
            status: Arc::new(status),
            cmd_tx: None,
            task_handle: None,
            channel: None,
        }
    }

    /// Connect to the stream, optionally on a channel sub-path (`logs`).
    ///
    /// Any existing connection is closed first and its task awaited, so two
    /// sockets never coexist. An invalid URL sets [`ConnectionState::Error`]
    /// and returns without spawning anything.
    pub async fn connect(&mut self, channel: Option<&str>) -> Result<(), WsError> {
        if self.cmd_tx.is_some() {
            tracing::debug!("Closing previous connection before connecting");
            self.shutdown().await;
        }

        let url = with_channel(&self.config.url, channel);
        self.channel = channel.map(str::to_string);
        if let Err(e) = validate_url(&url) {
            tracing::error!("Refusing to connect: {}", e);
            set_status(&self.status, ConnectionState::Error);
            return Err(e);
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(self.config.command_capacity.max(1));
        self.cmd_tx = Some(cmd_tx);
        set_status(&self.status, ConnectionState::Connecting);

        let state = TaskState {
            url,
            policy: self.config.reconnect,
            bus: self.bus.clone(),
            status: Arc::clone(&self.status),
            cmd_rx,
            pending_messages: Vec::new(),
            reconnect_attempts: 0,
            established: false,
        };
        self.task_handle = Some(tokio::spawn(run_task(state)));
        Ok(())
    }

    /// Graceful close. Never triggers a reconnect.
    pub async fn close(&mut self) {
        self.shutdown().await;
        set_status(&self.status, ConnectionState::Disconnected);
    }

    /// Tear down and reconnect on the same channel with a fresh attempt counter.
    ///
    /// This is the only way out of a failed first handshake, which is never
    /// retried automatically.
    pub async fn reconnect(&mut self) -> Result<(), WsError> {
        tracing::info!("Manual reconnection requested");
        let channel = self.channel.clone();
        self.connect(channel.as_deref()).await
    }

    /// Send a message to the server.
    ///
    /// While a retry is pending the message is queued and flushed on reconnect.
    /// Returns `WsError::NotConnected` if no connection task exists.
    pub fn send(&self, msg: MessageOut) -> Result<(), WsError> {
        match &self.cmd_tx {
            Some(tx) => tx.try_send(Command::Send(msg)).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    WsError::SendFailed("Command channel full".into())
                }
                mpsc::error::TrySendError::Closed(_) => WsError::NotConnected,
            }),
            None => Err(WsError::NotConnected),
        }
    }

    pub fn status(&self) -> watch::Receiver<ConnectionState> {
        self.status.subscribe()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.status.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Shorthand for `bus().subscribe()`.
    pub fn subscribe(&self) -> EventSubscription {
        self.bus.subscribe()
    }

    async fn shutdown(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Close).await;
        }
        if let Some(mut handle) = self.task_handle.take() {
            if tokio::time::timeout(CLOSE_TIMEOUT, &mut handle).await.is_err() {
                tracing::warn!("Connection task did not stop in time, aborting");
                handle.abort();
            }
        }
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    loop {
        // ── 1. Attempt connection ────────────────────────────────────────
        let (sink, stream) = match attempt_connect(&state.url).await {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!("WebSocket connection failed: {}", e);
                state.set_status(ConnectionState::Error);
                state
                    .bus
                    .publish(DomainEvent::Error(format!("Connection failed: {}", e)));
                if state.should_reconnect() && backoff_sleep(&mut state).await {
                    continue;
                }
                return;
            }
        };

        // ── 2. Connected ─────────────────────────────────────────────────
        tracing::info!("WebSocket connected to {}", state.url);
        state.established = true;
        state.reconnect_attempts = 0;
        state.set_status(ConnectionState::Connected);

        let mut sink = sink;
        flush_pending(&mut sink, &mut state.pending_messages).await;

        // ── 3. Inner select! loop ────────────────────────────────────────
        let reason = run_connected(&mut state, sink, stream).await;

        // ── 4. Post-disconnect decision ──────────────────────────────────
        match reason {
            DisconnectReason::UserRequested => {
                state.set_status(ConnectionState::Disconnected);
                return;
            }
            DisconnectReason::NormalClose => {
                tracing::info!("WebSocket closed by server");
                state.set_status(ConnectionState::Disconnected);
                return;
            }
            DisconnectReason::Closed(reason) => {
                tracing::warn!("WebSocket closed: {}", reason);
                state.set_status(ConnectionState::Disconnected);
            }
            DisconnectReason::Error(reason) => {
                tracing::error!("WebSocket error: {}", reason);
                state.set_status(ConnectionState::Disconnected);
                state.bus.publish(DomainEvent::Error(reason));
            }
        }

        if !(state.should_reconnect() && backoff_sleep(&mut state).await) {
            return;
        }
    }
}

/// The inner connected loop: runs until the connection breaks.
async fn run_connected(
    state: &mut TaskState,
    mut sink: SplitSink<WsStream, Message>,
    mut stream: SplitStream<WsStream>,
) -> DisconnectReason {
    loop {
        tokio::select! {
            // ── a) Incoming WS message ───────────────────────────────────
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let text_str: &str = text.as_ref();
                        if let Some(event) = normalize(text_str) {
                            state.bus.publish(event);
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = extract_close(frame.as_ref());
                        return match code {
                            1000 => DisconnectReason::NormalClose,
                            _ => DisconnectReason::Closed(format!("code={} reason={}", code, reason)),
                        };
                    }
                    Some(Ok(_)) => {} // Pong, Binary, Frame: ignore
                    Some(Err(e)) => return DisconnectReason::Error(e.to_string()),
                    None => return DisconnectReason::Closed("Stream ended".into()),
                }
            }

            // ── b) Command from public API ───────────────────────────────
            cmd = state.cmd_rx.recv() => {
                match cmd {
                    Some(Command::Send(msg_out)) => {
                        if let Err(e) = send_msg(&mut sink, &msg_out).await {
                            tracing::warn!("Send failed: {}", e);
                        }
                    }
                    Some(Command::Close) | None => {
                        let _ = sink.send(Message::Close(Some(CloseFrame {
                            code: CloseCode::Normal,
                            reason: "Client disconnect".into(),
                        }))).await;
                        await_close_ack(&mut stream).await;
                        return DisconnectReason::UserRequested;
                    }
                }
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Reject URLs that cannot start a WebSocket handshake.
fn validate_url(url: &str) -> Result<(), WsError> {
    if !(url.starts_with("ws://") || url.starts_with("wss://")) {
        return Err(WsError::InvalidUrl(url.to_string()));
    }
    url.into_client_request()
        .map(|_| ())
        .map_err(|e| WsError::InvalidUrl(format!("{}: {}", url, e)))
}

/// Attempt to establish a WebSocket connection with a 30-second timeout.
async fn attempt_connect(
    url: &str,
) -> Result<(SplitSink<WsStream, Message>, SplitStream<WsStream>), String> {
    let (ws_stream, _) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(url))
        .await
        .map_err(|_| "Connection timeout".to_string())?
        .map_err(|e| e.to_string())?;

    Ok(ws_stream.split())
}

/// Wait briefly for the server's half of the close handshake.
async fn await_close_ack(stream: &mut SplitStream<WsStream>) {
    let drain = async {
        while let Some(Ok(msg)) = stream.next().await {
            if msg.is_close() {
                break;
            }
        }
    };
    let _ = tokio::time::timeout(Duration::from_secs(2), drain).await;
}

/// Serialize and send a MessageOut over the sink.
async fn send_msg(
    sink: &mut SplitSink<WsStream, Message>,
    msg: &MessageOut,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json.into()))
        .await
        .map_err(|e| e.to_string())
}

/// Extract close code and reason from an optional CloseFrame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.to_string()),
        None => (1006, "No close frame".into()),
    }
}

// ─── Message queue ───────────────────────────────────────────────────────────

async fn flush_pending(
    sink: &mut SplitSink<WsStream, Message>,
    pending: &mut Vec<MessageOut>,
) {
    if pending.is_empty() {
        return;
    }
    tracing::info!("Flushing {} pending message(s)", pending.len());
    let messages = std::mem::take(pending);
    for msg in &messages {
        if let Err(e) = send_msg(sink, msg).await {
            tracing::warn!("Failed to flush pending message: {}", e);
        }
    }
}

// ─── Reconnection backoff ────────────────────────────────────────────────────

/// Delay before retry number `attempt` (1-based), before jitter.
fn backoff_delay(policy: &ReconnectPolicy, attempt: u32) -> u64 {
    let exp = attempt.saturating_sub(1).min(16);
    policy
        .base_delay_ms
        .saturating_mul(1u64 << exp)
        .min(policy.max_delay_ms)
}

/// Sleep before the next attempt while still serving commands.
///
/// Sends are queued for the next connection. Returns `false` when the
/// client asked to close during the wait.
async fn backoff_sleep(state: &mut TaskState) -> bool {
    state.reconnect_attempts += 1;

    let jitter_max = (state.policy.base_delay_ms / 2).max(1);
    let jitter = rand::random::<u64>() % jitter_max;
    let delay = backoff_delay(&state.policy, state.reconnect_attempts)
        .saturating_add(jitter)
        .min(state.policy.max_delay_ms);

    tracing::info!(
        "Reconnect attempt {}/{} in {}ms",
        state.reconnect_attempts,
        state.policy.max_attempts,
        delay
    );
    state.set_status(ConnectionState::Connecting);

    let sleep = tokio::time::sleep(Duration::from_millis(delay));
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            () = &mut sleep => return true,
            cmd = state.cmd_rx.recv() => match cmd {
                Some(Command::Send(msg)) => state.pending_messages.push(msg),
                Some(Command::Close) | None => {
                    state.set_status(ConnectionState::Disconnected);
                    return false;
                }
            },
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_client_new() {
        let client = WsClient::new(WsConfig::default());
        assert!(client.cmd_tx.is_none());
        assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_send_when_not_connected() {
        let client = WsClient::new(WsConfig::default());
        let result = client.send(MessageOut::Ping);
        assert!(matches!(result, Err(WsError::NotConnected)));
    }

    #[tokio::test]
    async fn test_invalid_url_sets_error_without_task() {
        let mut client = WsClient::new(WsConfig {
            url: "not a url".into(),
            ..Default::default()
        });
        let result = client.connect(None).await;
        assert!(matches!(result, Err(WsError::InvalidUrl(_))));
        assert_eq!(client.connection_state(), ConnectionState::Error);
        assert!(client.task_handle.is_none());
        assert!(matches!(client.send(MessageOut::Ping), Err(WsError::NotConnected)));
    }

    #[test]
    fn test_validate_url_schemes() {
        assert!(validate_url("ws://127.0.0.1:8100/ws").is_ok());
        assert!(validate_url("wss://desk.example.com/api/ws/logs").is_ok());
        assert!(validate_url("http://127.0.0.1:8100").is_err());
    }

    #[test]
    fn test_backoff_delay_is_capped() {
        let policy = ReconnectPolicy::default();
        assert_eq!(backoff_delay(&policy, 1), 1_000);
        assert_eq!(backoff_delay(&policy, 2), 2_000);
        assert_eq!(backoff_delay(&policy, 5), 16_000);
        assert_eq!(backoff_delay(&policy, 6), 30_000);
        assert_eq!(backoff_delay(&policy, 40), 30_000);
    }

    #[test]
    fn test_retries_need_an_established_session() {
        let (status, _) = watch::channel(ConnectionState::Connecting);
        let (_cmd_tx, cmd_rx) = mpsc::channel(1);
        let mut state = TaskState {
            url: "ws://127.0.0.1:8100/ws".into(),
            policy: ReconnectPolicy::default(),
            bus: EventBus::new(8),
            status: Arc::new(status),
            cmd_rx,
            pending_messages: Vec::new(),
            reconnect_attempts: 0,
            established: false,
        };
        assert!(!state.should_reconnect());

        state.established = true;
        assert!(state.should_reconnect());

        state.reconnect_attempts = state.policy.max_attempts;
        assert!(!state.should_reconnect());
    }

    #[test]
    fn test_extract_close_with_frame() {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "goodbye".into(),
        };
        let (code, reason) = extract_close(Some(&frame));
        assert_eq!(code, 1000);
        assert_eq!(reason, "goodbye");
    }

    #[test]
    fn test_extract_close_no_frame() {
        let (code, reason) = extract_close(None);
        assert_eq!(code, 1006);
        assert_eq!(reason, "No close frame");
    }

    #[tokio::test]
    async fn test_close_when_not_connected() {
        let mut client = WsClient::new(WsConfig::default());
        client.close().await;
        assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    }
}
