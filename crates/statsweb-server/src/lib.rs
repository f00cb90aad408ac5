//! statsweb server library entry.
//!
//! Wires config, shared state, the hit layer, page handlers, and the metrics
//! backends into an axum application. Consumed by the binary (`main.rs`) and
//! by integration tests.

pub mod app_state;
pub mod config;
pub mod counter;
pub mod error;
pub mod http;
pub mod obs;
pub mod ops;
pub mod router;
