//! Page handlers and the per-request hit layer.

pub mod hits;
pub mod lissajous;
pub mod pages;
