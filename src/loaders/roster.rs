use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

use crate::layouts::TemplateId;
use crate::types::{AgentRecord, AgentStatus, Partner};

/// Loads an agent roster from a JSON array of agent records
pub fn load_agents(path: impl AsRef<Path>) -> Result<Vec<AgentRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(format!("Failed to read agent roster: {:?}", path))?;
    let agents: Vec<AgentRecord> =
        serde_json::from_str(&text).context(format!("Malformed agent roster: {:?}", path))?;
    info!("loaded {} agents from {:?}", agents.len(), path);
    Ok(agents)
}

/// Loads a partner list from a JSON array
pub fn load_partners(path: impl AsRef<Path>) -> Result<Vec<Partner>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(format!("Failed to read partner list: {:?}", path))?;
    let partners: Vec<Partner> =
        serde_json::from_str(&text).context(format!("Malformed partner list: {:?}", path))?;
    info!("loaded {} partners from {:?}", partners.len(), path);
    Ok(partners)
}

/// Built-in roster used when no `--agents` file is given
pub fn sample_roster(template: TemplateId) -> Vec<AgentRecord> {
    match template {
        TemplateId::Assistant => vec![AgentRecord::new("assistant", "management", "manager")
            .with_status(AgentStatus::Working)],
        TemplateId::AiTeam => vec![
            AgentRecord::new("lead", "management", "manager").with_status(AgentStatus::Working),
            AgentRecord::new("research", "support", "specialist"),
            AgentRecord::new("writer", "support", "specialist").with_status(AgentStatus::Working),
            AgentRecord::new("analyst", "support", "specialist").with_status(AgentStatus::Offline),
        ],
        TemplateId::Corporate => {
            let mut agents =
                vec![AgentRecord::new("executive_assistant", "management", "assistant")
                    .with_status(AgentStatus::Working)];
            for department in ["buyer", "listing", "operations"] {
                agents.push(AgentRecord::new(format!("{department}_manager"), department, "manager"));
                for n in 1..=4 {
                    let status = if n % 3 == 0 { AgentStatus::Offline } else { AgentStatus::Available };
                    agents.push(
                        AgentRecord::new(format!("{department}_agent_{n}"), department, "agent").with_status(status),
                    );
                }
            }
            agents
        }
    }
}
