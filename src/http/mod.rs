//! HTTP client layer: `DeskHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::DeskHttp;
pub use retry::{RetryConfig, RetryPolicy};
