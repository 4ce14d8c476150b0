//! gfc-core: shared types, configuration schema, and error taxonomy for gfc
//!
//! Every other gfc crate depends on this one. It carries no cryptography of
//! its own; it only describes requests ([`types::Request`]) and the ways they
//! can fail ([`GfcError`]).

pub mod config;
pub mod error;
pub mod types;

pub use error::{GfcError, GfcResult};
pub use types::{AlgoMode, Direction, Encoding, Request};
