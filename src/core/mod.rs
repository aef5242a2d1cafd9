//! Core library components.
//!
//! Everything needed to turn a password store on disk into encrypted
//! responses, independent of how those responses are served.

pub mod armor;
pub mod cache;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod normalize;
pub mod store;
pub mod types;
