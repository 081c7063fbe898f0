//! Shared types for the PodWave client: wire protocol, HTTP client,
//! configuration and platform paths.

pub mod client;
pub mod config;
pub mod error;
pub mod platform;
pub mod protocol;
