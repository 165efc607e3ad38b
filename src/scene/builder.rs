use glam::Vec3;
use log::{debug, warn};

use super::graph::SceneGraph;
use super::prefabs;
use crate::types::{AgentRecord, OfficeTemplate, Partner};

/// Where one agent ends up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAssignment {
    pub agent_index: usize,
    pub rule_index: usize,
    pub slot: Vec3,
}

/// Partitions agents over the template's slot rules. Rules are tried in
/// declaration order and the first match claims the agent; agents keep
/// their input order within a rule.
pub fn assign_slots(template: &OfficeTemplate, agents: &[AgentRecord]) -> Vec<SlotAssignment> {
    let mut claimed = vec![0usize; template.slot_rules.len()];
    let mut assignments = Vec::with_capacity(agents.len());

    for (agent_index, agent) in agents.iter().enumerate() {
        let Some(rule_index) = template.slot_rules.iter().position(|r| r.matcher.matches(agent)) else {
            debug!("agent {} matches no slot rule in {}, omitted", agent.id, template.id);
            continue;
        };
        let rule = &template.slot_rules[rule_index];
        let nth = claimed[rule_index];
        claimed[rule_index] += 1;

        match rule.slot_for(nth) {
            Some(slot) => assignments.push(SlotAssignment {
                agent_index,
                rule_index,
                slot,
            }),
            None => debug!("agent {} overflows {} ({} slots), omitted", agent.id, rule.name, rule.slots.len()),
        }
    }
    assignments
}

/// Builds a fresh scene for the given inputs. Nothing is cached between
/// calls, so equal inputs always produce equal graphs.
pub fn build(template: &OfficeTemplate, agents: &[AgentRecord], partners: &[Partner]) -> SceneGraph {
    let mut graph = SceneGraph::new();
    let root = graph.root();

    for placement in &template.furniture {
        prefabs::furniture(&mut graph, root, placement);
    }
    for zone in &template.zones {
        prefabs::zone(&mut graph, root, zone);
    }

    let assignments = assign_slots(template, agents);
    for assignment in &assignments {
        prefabs::avatar(&mut graph, root, &agents[assignment.agent_index], assignment.slot);
    }

    let mut kiosks = 0;
    if let Some(slots) = &template.kiosk_slots {
        for (index, partner) in partners.iter().enumerate() {
            let Some(&position) = slots.get(index) else {
                warn!(
                    "{} partners but only {} kiosk slots in {}, omitting {}",
                    partners.len(),
                    slots.len(),
                    template.id,
                    partners.len() - slots.len()
                );
                break;
            };
            prefabs::kiosk(&mut graph, root, index, partner, position);
            kiosks += 1;
        }
    }

    debug!(
        "built {}: {} nodes, {} of {} agents placed, {} kiosks",
        template.id,
        graph.len(),
        assignments.len(),
        agents.len(),
        kiosks
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::{self, TemplateId};
    use crate::scene::graph::DomainKind;
    use crate::types::IconKind;

    #[test]
    fn test_first_matching_rule_claims_agent() {
        let template = layouts::template(TemplateId::AiTeam);
        // Manager of the support department goes to the manager desk, not a specialist desk
        let agents = vec![AgentRecord::new("m", "support", "manager")];
        let assignments = assign_slots(&template, &agents);
        assert_eq!(assignments.len(), 1);
        assert_eq!(template.slot_rules[assignments[0].rule_index].name, "manager-desk");
    }

    #[test]
    fn test_open_desks_fill_in_order_and_wrap() {
        let template = layouts::template(TemplateId::AiTeam);
        let agents: Vec<_> = (0..4).map(|i| AgentRecord::new(format!("s{i}"), "support", "specialist")).collect();
        let slots: Vec<_> = assign_slots(&template, &agents).iter().map(|a| a.slot).collect();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0], Vec3::new(-8.0, 0.0, -5.0));
        assert_eq!(slots[3], slots[0], "fourth specialist wraps onto the first desk");
    }

    #[test]
    fn test_unmatched_agent_is_omitted() {
        let template = layouts::template(TemplateId::Assistant);
        let agents = vec![AgentRecord::new("x", "marketing", "intern")];
        assert!(assign_slots(&template, &agents).is_empty());
        assert_eq!(build(&template, &agents, &[]).pickable_count(), 0);
    }

    #[test]
    fn test_omit_rule_drops_extra_agents() {
        let template = layouts::template(TemplateId::Assistant);
        let agents = vec![
            AgentRecord::new("a", "management", "manager"),
            AgentRecord::new("b", "management", "assistant"),
        ];
        assert_eq!(assign_slots(&template, &agents).len(), 1);
    }

    #[test]
    fn test_kiosks_only_with_kiosk_slots() {
        let partners = vec![Partner::new("Lawyers", "25%", IconKind::Gavel)];
        let team = build(&layouts::template(TemplateId::AiTeam), &[], &partners);
        assert_eq!(team.count_tagged(DomainKind::Kiosk), 0);

        let corporate = build(&layouts::template(TemplateId::Corporate), &[], &partners);
        assert_eq!(corporate.count_tagged(DomainKind::Kiosk), 1);
    }

    #[test]
    fn test_partners_past_last_kiosk_slot_are_omitted() {
        let template = layouts::template(TemplateId::Corporate);
        let slot_count = template.kiosk_slots.as_ref().map_or(0, Vec::len);
        let partners: Vec<_> = (0..slot_count + 3)
            .map(|i| Partner::new(format!("p{i}"), "5%", IconKind::Business))
            .collect();
        let graph = build(&template, &[], &partners);
        assert_eq!(graph.count_tagged(DomainKind::Kiosk), slot_count);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let template = layouts::template(TemplateId::Corporate);
        let agents = vec![AgentRecord::new("a", "buyer", "agent")];
        let before = (template.clone(), agents.clone());
        build(&template, &agents, &[]);
        assert_eq!(before, (template, agents));
    }
}
