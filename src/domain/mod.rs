//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Domain types and backend payload shapes
//! - `state.rs`: Bounded reducers fed from the event bus (stream-driven slices only)
//! - `client.rs`: Sub-client with the slice's REST commands (`http` feature)

pub mod admin;
pub mod config;
pub mod equity;
pub mod history;
pub mod log;
pub mod market;
pub mod order;
pub mod orderbook;
pub mod portfolio;
pub mod risk;
pub mod status;
pub mod strategy;
pub mod trade;
