//! Monitoring agents and their registry.

pub mod registry;

pub use registry::AgentRegistry;
