//! statsweb core: the Lissajous animation generator, its GIF encoding, and the
//! metrics capability the generator reports through.
//!
//! This crate carries no transport or runtime dependencies. The HTTP server
//! wires a concrete metrics backend into it; tests wire a recording fake.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Encoding failures surface as `StatsWebError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod curve;
pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{Result, StatsWebError};
