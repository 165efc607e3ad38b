//! Fixed catalog of office layouts. Each template is plain data; building
//! one has no side effects, so callers may fetch a fresh copy at any time.

mod ai_team;
mod assistant;
mod common;
mod corporate;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::types::{IconKind, OfficeTemplate, Partner};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown office template `{id}` (registered: {})", registered_ids().join(", "))]
pub struct UnknownTemplateError {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateId {
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "ai-team")]
    AiTeam,
    #[serde(rename = "corporate")]
    Corporate,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Assistant, TemplateId::AiTeam, TemplateId::Corporate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assistant => "assistant",
            Self::AiTeam => "ai-team",
            Self::Corporate => "corporate",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownTemplateError { id: s.to_string() })
    }
}

pub fn registered_ids() -> Vec<&'static str> {
    TemplateId::ALL.iter().map(TemplateId::as_str).collect()
}

/// Looks up a template by its string id.
pub fn get_template(id: &str) -> Result<OfficeTemplate, UnknownTemplateError> {
    id.parse().map(template)
}

pub fn template(id: TemplateId) -> OfficeTemplate {
    match id {
        TemplateId::Assistant => assistant::template(),
        TemplateId::AiTeam => ai_team::template(),
        TemplateId::Corporate => corporate::template(),
    }
}

/// Default referral partners advertised in each office
pub fn partner_network(id: TemplateId) -> Vec<Partner> {
    match id {
        TemplateId::Assistant => Vec::new(),
        TemplateId::AiTeam => vec![
            Partner::new("Tech Support Services", "15%", IconKind::Engineering),
            Partner::new("Cloud Infrastructure", "10%", IconKind::Business),
            Partner::new("AI Training Partners", "20%", IconKind::Psychology),
        ],
        TemplateId::Corporate => vec![
            Partner::new("Real Estate Attorneys", "25%", IconKind::Gavel).in_category("Legal"),
            Partner::new("Home Inspection Services", "20%", IconKind::Assessment).in_category("Inspection"),
            Partner::new("General Contractors", "15%", IconKind::Build).in_category("Construction"),
            Partner::new("Mortgage Brokers", "1% of loan", IconKind::AccountBalance).in_category("Financial"),
            Partner::new("Title Insurance", "30%", IconKind::Business).in_category("Insurance"),
            Partner::new("Home Staging", "20%", IconKind::Home).in_category("Marketing"),
            Partner::new("Property Photographers", "25%", IconKind::PhotoCamera).in_category("Marketing"),
            Partner::new("Moving Services", "10%", IconKind::LocalShipping).in_category("Services"),
            Partner::new("Property Management", "15%", IconKind::Business).in_category("Management"),
        ],
    }
}
