pub mod roster;

pub use roster::{load_agents, load_partners, sample_roster};
