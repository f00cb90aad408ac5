//! Top-level facade crate for statsweb.
//!
//! Re-exports the core generator/metrics types and the server library so users can depend on a single crate.

pub mod core {
    pub use statsweb_core::*;
}

pub mod server {
    pub use statsweb_server::*;
}
