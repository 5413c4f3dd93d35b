//! `analytics-bootstrap` library crate.
//!
//! The binary (`analytics`) is a thin wrapper around this library so that:
//!
//! - bootstrap steps and the data pipeline are testable without spawning processes
//! - the fixture generator and config materializer can be reused from tests
//!   of other tools that need a populated workspace

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
