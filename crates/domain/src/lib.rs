//! Shared vocabulary for the Aun conversation core: errors, configuration,
//! provider-agnostic message types, and structured trace events.

pub mod config;
pub mod conversation;
pub mod error;
pub mod tool;
pub mod trace;
