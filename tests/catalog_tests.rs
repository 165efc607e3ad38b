use office_viewport::layouts::{self, get_template, partner_network, registered_ids, TemplateId};
use office_viewport::types::FurnitureKind;

#[cfg(test)]
mod catalog_tests {
    use super::*;

    #[test]
    fn test_every_registered_template_resolves() {
        for id in registered_ids() {
            let template = get_template(id).unwrap();
            assert_eq!(template.id.as_str(), id);
            assert!(!template.furniture.is_empty(), "{id} has no furniture");
            assert!(template.footprint.width > 0.0 && template.footprint.depth > 0.0);
            assert!(!template.slot_rules.is_empty(), "{id} has no slot rules");
        }
    }

    #[test]
    fn test_registered_ids_are_stable() {
        assert_eq!(registered_ids(), vec!["assistant", "ai-team", "corporate"]);
    }

    #[test]
    fn test_documented_footprints() {
        let expected = [
            (TemplateId::Assistant, 12.0, 10.0),
            (TemplateId::AiTeam, 20.0, 16.0),
            (TemplateId::Corporate, 36.0, 24.0),
        ];
        for (id, width, depth) in expected {
            let footprint = layouts::template(id).footprint;
            assert_eq!((footprint.width, footprint.depth), (width, depth), "{id}");
        }
    }

    #[test]
    fn test_unknown_template_names_registered_ids() {
        let err = get_template("penthouse").unwrap_err();
        assert_eq!(err.id, "penthouse");
        let message = err.to_string();
        assert!(message.contains("penthouse"));
        assert!(message.contains("corporate"));
    }

    #[test]
    fn test_template_ids_are_case_sensitive() {
        assert!(get_template("Corporate").is_err());
        assert!(get_template("").is_err());
    }

    #[test]
    fn test_only_corporate_has_kiosk_slots() {
        assert!(!layouts::template(TemplateId::Assistant).supports_kiosks());
        assert!(!layouts::template(TemplateId::AiTeam).supports_kiosks());
        assert!(layouts::template(TemplateId::Corporate).supports_kiosks());
    }

    #[test]
    fn test_furniture_stays_inside_footprint() {
        for id in TemplateId::ALL {
            let template = layouts::template(id);
            let half_w = template.footprint.width / 2.0 + 0.5;
            let half_d = template.footprint.depth / 2.0 + 0.5;
            for piece in &template.furniture {
                assert!(
                    piece.position.x.abs() <= half_w && piece.position.z.abs() <= half_d,
                    "{id}: {:?} at {} is outside the floor",
                    piece.kind,
                    piece.position
                );
            }
        }
    }

    #[test]
    fn test_every_template_has_a_floor() {
        for id in TemplateId::ALL {
            let template = layouts::template(id);
            assert_eq!(
                template.furniture.iter().filter(|p| p.kind == FurnitureKind::Floor).count(),
                1,
                "{id}"
            );
        }
    }

    #[test]
    fn test_partner_networks() {
        assert!(partner_network(TemplateId::Assistant).is_empty());
        assert_eq!(partner_network(TemplateId::AiTeam).len(), 3);
        assert_eq!(partner_network(TemplateId::Corporate).len(), 9);
    }

    #[test]
    fn test_template_serializes_to_json() {
        let json = serde_json::to_value(layouts::template(TemplateId::Assistant)).unwrap();
        assert_eq!(json["id"], "assistant");
        assert!(json["furniture"].as_array().is_some_and(|f| !f.is_empty()));
    }
}
