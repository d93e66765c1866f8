//! Tools the tool-augmented agent may call: session-id generation, guided
//! breathing, and a simulated booking.

pub mod builtin;
pub mod registry;

pub use registry::{ToolOutput, ToolRegistry};
