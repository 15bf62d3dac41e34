//! Network URL constants and endpoint derivation.

/// Default REST API base URL (local backend).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8100";

/// Path suffix of the event stream relative to the HTTP base.
pub const DEFAULT_WS_SUFFIX: &str = "/ws";

/// Derive the WebSocket base from an HTTP base.
///
/// `http` becomes `ws`, `https` becomes `wss`, trailing slashes are trimmed and
/// `suffix` is appended. A base that is already `ws://`/`wss://` keeps its scheme.
///
/// ```ignore
/// assert_eq!(ws_url_from_http("http://host:8100/api/", "/ws"), "ws://host:8100/api/ws");
/// ```
pub fn ws_url_from_http(http_base: &str, suffix: &str) -> String {
    let base = http_base.trim().trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };

    if suffix.is_empty() {
        return base;
    }
    format!("{}/{}", base, suffix.trim_start_matches('/'))
}

/// Append an optional channel sub-path (`logs`, `portfolio/fills`) to a WS base.
pub fn with_channel(ws_base: &str, channel: Option<&str>) -> String {
    let base = ws_base.trim_end_matches('/');
    match channel.map(|c| c.trim_matches('/')).filter(|c| !c.is_empty()) {
        Some(channel) => format!("{}/{}", base, channel),
        None => base.to_string(),
    }
}
