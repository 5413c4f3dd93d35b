//! Input/output helpers.
//!
//! - raw metrics CSV ingest (`ingest`)
//! - CSV writers (`export`)
//! - workspace paths and directory tree (`layout`)

pub mod export;
pub mod ingest;
pub mod layout;

pub use export::*;
pub use ingest::*;
pub use layout::*;
