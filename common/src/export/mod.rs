//! Export core modules shared across hosts.

#[cfg(feature = "excel")]
pub mod excel_core;
