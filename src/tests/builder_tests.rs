#[cfg(test)]
mod tests {
    use log::info;
    use serde_json::json;

    use crate::errors::VeritasError;
    use crate::implementations::builder::build_transition_system;
    use crate::models::common::ModelKind;
    use crate::models::document::{ load_document, ModelDocument };
    use crate::models::property::{ PropertyKind, PropertySpec };
    use crate::models::transition_system::{ EdgeAnnotation, SearchRoot };
    use crate::tests::fixtures::{ job_net, login_model, pipeline_sts, setup };
    use crate::traits::state_space::StateSpace;

    #[test]
    fn test_state_machine_adjacency() {
        setup();
        let system = build_transition_system(&login_model()).unwrap();

        assert_eq!(system.kind, ModelKind::StateMachine);
        assert_eq!(system.states.len(), 4);
        assert_eq!(system.edge_count(), 5);
        assert_eq!(system.adjacency["logged_out"].len(), 2);
        assert!(!system.adjacency.contains_key("error"));
        assert_eq!(system.initial, vec!["logged_out".to_string()]);
        assert!(system.finals.contains("logged_in"));
        assert_eq!(
            system.adjacency["logged_out"][0].annotation,
            EdgeAnnotation::Guard("true".to_string())
        );
        assert_eq!(system.events.len(), 5);
        info!("Built {} with {} edges", system.model_id, system.edge_count());
    }

    #[test]
    fn test_state_machine_single_root() {
        setup();
        let system = build_transition_system(&login_model()).unwrap();
        let roots = system.roots().unwrap();
        assert_eq!(roots, vec![SearchRoot::State("logged_out".to_string())]);
    }

    #[test]
    fn test_unsupported_model_type() {
        setup();
        let model = ModelDocument::new("m", "bayesian_network", json!({}));
        match build_transition_system(&model) {
            Err(VeritasError::UnsupportedModelKind(kind)) => assert_eq!(kind, "bayesian_network"),
            other => panic!("expected UnsupportedModelKind, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_state_list_is_malformed() {
        setup();
        let model = ModelDocument::new("m", "state_machine", json!({"states": []}));
        assert!(matches!(build_transition_system(&model), Err(VeritasError::MalformedModel(_))));
    }

    #[test]
    fn test_undeclared_transition_target_is_malformed() {
        setup();
        let model = ModelDocument::new(
            "m",
            "state_machine",
            json!({
                "states": ["a"],
                "initial_state": "a",
                "transitions": [{"from": "a", "to": "ghost", "event": "go"}]
            })
        );
        let err = build_transition_system(&model).unwrap_err();
        assert!(matches!(err, VeritasError::MalformedModel(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_wrongly_typed_elements_are_malformed() {
        setup();
        let model = ModelDocument::new("m", "state_machine", json!({"states": "a,b"}));
        assert!(matches!(build_transition_system(&model), Err(VeritasError::MalformedModel(_))));
    }

    #[test]
    fn test_missing_initial_state_is_unresolved() {
        setup();
        let model = ModelDocument::new(
            "m",
            "state_machine",
            json!({"states": ["a", "b"], "transitions": [{"from": "a", "to": "b"}]})
        );
        let system = build_transition_system(&model).unwrap();
        assert!(matches!(system.roots(), Err(VeritasError::UnresolvedInitialState(_))));
    }

    #[test]
    fn test_undeclared_initial_state_is_unresolved() {
        setup();
        let model = ModelDocument::new(
            "m",
            "state_machine",
            json!({"states": ["a"], "initial_state": "z"})
        );
        let system = build_transition_system(&model).unwrap();
        assert!(matches!(system.roots(), Err(VeritasError::UnresolvedInitialState(_))));
    }

    #[test]
    fn test_petri_net_arcs_split_by_direction() {
        setup();
        let system = build_transition_system(&job_net(true)).unwrap();
        let net = system.net.as_ref().unwrap();

        assert_eq!(system.kind, ModelKind::PetriNet);
        assert_eq!(net.input_arcs["start"], vec![("idle".to_string(), 1)]);
        assert_eq!(net.output_arcs["start"], vec![("busy".to_string(), 1)]);
        assert_eq!(net.initial_marking.tokens("busy"), 0);
        assert_eq!(net.initial_marking.0.len(), 3);
        assert_eq!(net.final_markings.len(), 1);

        let roots = system.roots().unwrap();
        assert_eq!(system.label(&roots[0]), "busy=0,done=0,idle=1");
    }

    #[test]
    fn test_petri_net_firing() {
        setup();
        let system = build_transition_system(&job_net(false)).unwrap();
        let root = system.roots().unwrap().remove(0);

        let successors = system.successors(&root).unwrap();
        assert_eq!(successors.len(), 1);
        let (edge, next) = &successors[0];
        assert_eq!(edge.label, "start");
        assert_eq!(edge.from, "busy=0,done=0,idle=1");
        assert_eq!(edge.to, "busy=1,done=0,idle=0");
        assert_eq!(edge.annotation, EdgeAnnotation::Weight(1.0));

        let (_, done) = system.successors(next).unwrap().remove(0);
        assert_eq!(system.label(&done), "busy=0,done=1,idle=0");
        assert!(system.successors(&done).unwrap().is_empty());
        assert!(!system.is_final(&done));
    }

    #[test]
    fn test_petri_net_place_to_place_arc_is_malformed() {
        setup();
        let model = ModelDocument::new(
            "m",
            "petri_net",
            json!({
                "places": ["p", "q"],
                "transitions": ["t"],
                "arcs": [{"from": "p", "to": "q"}],
                "initial_marking": {"p": 1}
            })
        );
        assert!(matches!(build_transition_system(&model), Err(VeritasError::MalformedModel(_))));
    }

    #[test]
    fn test_petri_net_marking_with_unknown_place_is_malformed() {
        setup();
        let model = ModelDocument::new(
            "m",
            "petri_net",
            json!({"places": ["p"], "transitions": [], "initial_marking": {"nowhere": 2}})
        );
        assert!(matches!(build_transition_system(&model), Err(VeritasError::MalformedModel(_))));
    }

    #[test]
    fn test_unified_sts_relations() {
        setup();
        let system = build_transition_system(&pipeline_sts()).unwrap();

        assert_eq!(system.kind, ModelKind::UnifiedSts);
        assert_eq!(system.adjacency["a"][0].annotation, EdgeAnnotation::Weight(0.5));
        assert_eq!(system.adjacency["b"][0].annotation, EdgeAnnotation::Weight(1.0));
        assert_eq!(system.events, vec!["step".to_string()]);
        assert_eq!(system.roots().unwrap().len(), 2);
    }

    #[test]
    fn test_property_aliases() {
        setup();
        let property: PropertySpec = serde_json::from_value(
            json!({
                "property_id": "p1",
                "property_type": "deadlock_free",
                "description": "no deadlock",
                "formal_spec": "deadlock_free"
            })
        ).unwrap();
        assert_eq!(property.id, "p1");
        assert_eq!(property.kind, PropertyKind::DeadlockFree);
        assert!(property.temporal_formula.is_none());
    }

    #[test]
    fn test_load_document_by_extension() {
        setup();
        let dir = std::env::temp_dir().join(format!("veritas-doc-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let json_path = dir.join("login.json");
        std::fs::write(&json_path, serde_json::to_string(&login_model()).unwrap()).unwrap();
        let from_json: ModelDocument = load_document(&json_path).unwrap();

        let yaml_path = dir.join("login.yaml");
        std::fs::write(&yaml_path, serde_yaml::to_string(&login_model()).unwrap()).unwrap();
        let from_yaml: ModelDocument = load_document(&yaml_path).unwrap();

        assert_eq!(from_json, login_model());
        assert_eq!(from_yaml.model_id, "login_system");
        assert_eq!(build_transition_system(&from_yaml).unwrap().edge_count(), 5);

        std::fs::remove_dir_all(&dir).ok();
    }
}
