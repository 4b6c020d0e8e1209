use crate::{leo_at_periapsis, start_epoch};
use propstate::cosmic::{share, SharedObject, StateElementId};
use propstate::propagators::StateLayout;
use propstate::{Formation, PropagationStateManager, Spacecraft, StateMapError};
use rstest::*;

fn formation() -> SharedObject {
    share(Formation::new(
        "Form",
        start_epoch(),
        vec![
            Spacecraft::cartesian("Lead", 7000.0, 0.0, 0.0, 0.0, 7.5, 0.0, start_epoch()),
            Spacecraft::cartesian("Wing", 7000.0, 1.0, 0.0, 0.0, 7.5, 0.0, start_epoch()),
        ],
    ))
}

fn manager(objects: &[(&SharedObject, Vec<&str>)]) -> PropagationStateManager {
    let mut psm = PropagationStateManager::new();
    for (object, properties) in objects {
        psm.register_object(object).unwrap();
        for property in properties.iter() {
            psm.register_property(object, property).unwrap();
        }
    }
    psm
}

#[test]
fn layout_groups_element_types() {
    let _ = pretty_env_logger::try_init();
    let sat1 = leo_at_periapsis("Sat1", 0.01);
    let sat2 = leo_at_periapsis("Sat2", 0.02);
    let mut psm = manager(&[
        (&sat1, vec!["STM", "CartesianState"]),
        (&sat2, vec!["CartesianState", "MassFlow"]),
    ]);

    assert_eq!(psm.build_layout().unwrap(), 6 + 36 + 6 + 1);
    let layout = psm.layout().unwrap();
    let names: Vec<String> = layout.elements().iter().map(|e| e.to_string()).collect();
    assert_eq!(names[0], "Sat1.CartesianState.1");
    assert_eq!(names[6], "Sat2.CartesianState.1");
    assert_eq!(names[12], "Sat1.STM.1");
    assert_eq!(names[47], "Sat1.STM.36");
    assert_eq!(names[48], "Sat2.MassFlow.1");

    // Identifiers never decrease along the vector
    assert!(layout
        .elements()
        .windows(2)
        .all(|pair| pair[0].element.id() <= pair[1].element.id()));

    assert_eq!(psm.count_of(StateElementId::CartesianState), 2);
    assert_eq!(psm.count_of(StateElementId::OrbitStm), 1);
    assert!(psm.requires_completion_pass());
    assert_eq!(psm.completion_count(), 1);
    assert_eq!(
        psm.completion_element(0),
        Some((StateElementId::OrbitStm, 36))
    );
    assert_eq!(psm.completion_item(0).unwrap().start, 12);
    assert_eq!(psm.completion_element(1), None);

    // The STM starts with the identity on its diagonal
    let derivatives = layout.initial_derivatives();
    assert_eq!(derivatives.len(), 49);
    assert_eq!(derivatives[12], 1.0);
    assert_eq!(derivatives[13], 0.0);
    assert_eq!(derivatives.sum(), 6.0);
    assert!(layout.has_dynamic_derivatives());
}

#[test]
fn layout_determinism() {
    let sat = leo_at_periapsis("Sat", 0.1);
    let form = formation();
    let mut psm = manager(&[
        (&form, vec!["MassFlow", "CartesianState"]),
        (&sat, vec!["CartesianState", "STM"]),
    ]);
    psm.build_layout().unwrap();
    let first: StateLayout = psm.layout().unwrap().clone();
    psm.build_layout().unwrap();
    assert_eq!(psm.layout().unwrap(), &first);

    let rebuilt = StateLayout::build(psm.objects(), &[
        psm.properties(0).unwrap().to_vec(),
        psm.properties(1).unwrap().to_vec(),
    ])
    .unwrap();
    assert_eq!(rebuilt, first);
}

#[test]
fn formation_associates() {
    let form = formation();
    let mut psm = manager(&[(&form, vec!["CartesianState"])]);
    assert_eq!(psm.build_layout().unwrap(), 12);
    let layout = psm.layout().unwrap();
    assert_eq!(layout.element(0).unwrap().associate, "Lead");
    assert_eq!(layout.element(11).unwrap().associate, "Wing");
    assert_eq!(layout.associate_index(4), Some(0));
    assert_eq!(layout.associate_index(9), Some(6));
    assert_eq!(psm.state().associate(11), Some(6));
    assert_eq!(psm.state().description(7), Some("Form.CartesianState.8"));
}

#[rstest]
#[case("Cd")]
#[case("cartesianstate")]
#[case("")]
fn unknown_property_names_the_object(#[case] property: &str) {
    let sat = leo_at_periapsis("Voyager", 0.1);
    let mut psm = PropagationStateManager::new();
    psm.register_object(&sat).unwrap();
    let err = psm.register_property(&sat, property).unwrap_err();
    assert!(matches!(err, StateMapError::UnknownProperty { .. }));
    let msg = err.to_string();
    assert!(msg.contains("Voyager"), "{msg}");
    assert!(msg.contains("Spacecraft"), "{msg}");
}

#[test]
fn registration_rules() {
    let sat = leo_at_periapsis("Sat", 0.1);
    let other = leo_at_periapsis("Other", 0.1);
    let mut psm = PropagationStateManager::new();
    assert_eq!(psm.register_object(&sat).unwrap(), 0);
    assert_eq!(
        psm.register_object(&sat),
        Err(StateMapError::DuplicateObject {
            name: "Sat".to_string()
        })
    );
    assert_eq!(
        psm.register_property(&other, "CartesianState"),
        Err(StateMapError::UnknownObject {
            name: "Other".to_string()
        })
    );
    assert_eq!(
        psm.register_property_by_index("CartesianState", 3),
        Err(StateMapError::ObjectIndex { index: 3, count: 1 })
    );

    psm.register_property_by_index("CartesianState", 0).unwrap();
    // Registered twice, only propagated once
    psm.register_property(&sat, "CartesianState").unwrap();
    assert_eq!(psm.properties(0).unwrap().len(), 1);
    assert_eq!(psm.build_layout().unwrap(), 6);
}

#[test]
fn empty_formation_cannot_be_propagated() {
    let form = share(Formation::new("Empty", start_epoch(), vec![]));
    let mut psm = manager(&[(&form, vec!["CartesianState"])]);
    assert_eq!(
        psm.build_layout(),
        Err(StateMapError::NonPositiveWidth {
            object: "Empty".to_string(),
            property: "CartesianState".to_string()
        })
    );
    assert_eq!(psm.state_size(), 0);
}
