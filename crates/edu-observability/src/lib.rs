//! Observability infrastructure for EduMarket.
//!
//! All crates log through `tracing`; this crate installs the subscriber that
//! turns those events into output:
//! - `LogConfig` - level and output format, deserializable from config files
//! - `init_logging` - one-shot, idempotent subscriber installation

mod logging;

pub use logging::*;
