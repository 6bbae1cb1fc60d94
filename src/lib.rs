//! Campaign-tracking URL builder
//!
//! Composes UTM-tagged URLs from a base address and five tracking fields,
//! validates the input, and keeps a short persisted history of generated URLs.

pub mod composer;
pub mod config;
pub mod error;
pub mod handler;
pub mod history;
pub mod model;
pub mod presets;
pub mod route;
pub mod session;
pub mod storage;
pub mod validation;
