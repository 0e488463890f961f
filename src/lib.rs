//! Backend of a debugger's breakpoints panel.
//!
//! [`panel::aggregate`] turns loaded sources and breakpoints into the
//! `(source, breakpoints)` groups the panel lists. [`debugger::DebugContext`]
//! keeps that state live and memoized; [`dap`] and [`console`] expose it.

pub mod console;
pub mod dap;
pub mod debugger;
pub mod error;
pub mod logging;
pub mod model;
pub mod panel;
pub mod snapshot;

pub use error::{Error, Result};
