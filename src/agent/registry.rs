//! Registry of monitoring agents.
//!
//! Agents are seeded once at startup and never added or removed; only
//! their status, last action and confidence change.

use crate::error::TelemetryError;
use crate::models::{Agent, AgentStatus, AgentUpdate};
use tracing::{debug, warn};

pub const SLIP_DETECTION: &str = "slip-detection";
pub const BRAKE_CONTROL: &str = "brake-control";
pub const THROTTLE_MANAGER: &str = "throttle-manager";
pub const SURFACE_ANALYSIS: &str = "surface-analysis";

/// Ordered set of agents keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::seeded()
    }
}

impl AgentRegistry {
    /// The four traction agents with their startup values.
    pub fn seeded() -> Self {
        Self::from_agents(vec![
            Agent::new(
                SLIP_DETECTION,
                "Slip Detection Agent",
                AgentStatus::Active,
                "Monitoring wheel slip",
                98,
            ),
            Agent::new(
                BRAKE_CONTROL,
                "Brake Control Agent",
                AgentStatus::Active,
                "Optimizing brake force",
                95,
            ),
            Agent::new(
                THROTTLE_MANAGER,
                "Throttle Manager Agent",
                AgentStatus::Idle,
                "Awaiting input",
                100,
            ),
            Agent::new(
                SURFACE_ANALYSIS,
                "Surface Analysis Agent",
                AgentStatus::Active,
                "Detecting road conditions",
                92,
            ),
        ])
    }

    /// Build a registry from an explicit agent list.
    ///
    /// Later duplicates of an id are dropped so identities stay unique.
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        let mut unique: Vec<Agent> = Vec::with_capacity(agents.len());
        for agent in agents {
            if unique.iter().any(|a| a.id == agent.id) {
                warn!("Ignoring duplicate agent id: {}", agent.id);
                continue;
            }
            unique.push(agent);
        }
        Self { agents: unique }
    }

    /// Replace the mutable fields of one agent.
    pub fn update(&mut self, update: &AgentUpdate) -> Result<(), TelemetryError> {
        match self.agents.iter_mut().find(|a| a.id == update.id) {
            Some(agent) => {
                agent.apply(update);
                debug!(
                    "Agent {} -> {} ({}%): {}",
                    update.id, update.status, update.confidence, update.last_action
                );
                Ok(())
            }
            None => Err(TelemetryError::UnknownAgent(update.id.to_string())),
        }
    }

    /// All agents in registration order.
    pub fn list(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }
}
