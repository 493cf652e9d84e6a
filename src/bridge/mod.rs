//! Types and HTTP client for the bridge's REST API.

pub mod client;
pub mod command;
pub mod object;
