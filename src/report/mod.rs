//! Reporting utilities.
//!
//! We keep formatting code in one place so:
//! - the bootstrap and pipeline code stay free of presentation details
//! - output changes are localized

pub mod format;

pub use format::*;
