use crate::{leo_at_periapsis, rk4_step, start_epoch};
use propstate::cosmic::{read_object, share, write_object, ElementCoords};
use propstate::propagators::StateManagerConfig;
use propstate::time::Unit;
use propstate::{Formation, PropagationStateManager, Spacecraft, SyncError};
use rstest::*;

#[test]
fn pull_reads_the_objects() {
    let sat = share(
        Spacecraft::cartesian("Sat", 7000.0, 1.0, 2.0, 0.1, 7.5, 0.2, start_epoch())
            .with_masses(500.0, 80.0),
    );
    let mut psm = PropagationStateManager::new();
    psm.register_object(&sat).unwrap();
    psm.register_property(&sat, "MassFlow").unwrap();
    psm.register_property(&sat, "CartesianState").unwrap();
    psm.build_layout().unwrap();
    psm.pull_from_objects().unwrap();

    let state = psm.state();
    assert_eq!(state.len(), 7);
    assert_eq!(state.epoch(), start_epoch());
    assert_eq!(
        state.data().as_slice(),
        &[7000.0, 1.0, 2.0, 0.1, 7.5, 0.2, 80.0]
    );
}

#[rstest]
#[case(vec![7100.0, -5.0, 3.0, 0.01, 7.4, -0.3, 79.5])]
#[case(vec![-1.0e-300, 1.0e300, 0.0, -0.0, 1.0 / 3.0, std::f64::consts::PI, 0.0])]
fn push_pull_round_trip(#[case] values: Vec<f64>) {
    let sat = leo_at_periapsis("Sat", 0.1);
    let mut psm = PropagationStateManager::new();
    psm.register_object(&sat).unwrap();
    psm.register_property(&sat, "CartesianState").unwrap();
    psm.register_property(&sat, "MassFlow").unwrap();
    psm.build_layout().unwrap();
    psm.pull_from_objects().unwrap();

    let later = start_epoch() + 1.5 * Unit::Hour;
    for (i, value) in values.iter().enumerate() {
        psm.state_mut()[i] = *value;
    }
    psm.state_mut().set_epoch(later);
    let pushed = psm.state().clone();

    psm.push_to_objects().unwrap();
    assert_eq!(read_object(&sat).unwrap().epoch(), later);

    // Scramble the vector, then restore it from the object
    psm.state_mut().data_mut().fill(-42.0);
    psm.pull_from_objects().unwrap();
    assert_eq!(psm.state(), &pushed);
}

#[test]
fn formation_round_trip() {
    let form = share(Formation::new(
        "Form",
        start_epoch(),
        vec![
            Spacecraft::cartesian("A", 7000.0, 0.0, 0.0, 0.0, 7.5, 0.0, start_epoch()),
            Spacecraft::cartesian("B", 0.0, 7000.0, 0.0, -7.5, 0.0, 0.0, start_epoch()),
        ],
    ));
    let mut psm = PropagationStateManager::new();
    psm.register_object(&form).unwrap();
    psm.register_property(&form, "CartesianState").unwrap();
    assert_eq!(psm.build_layout().unwrap(), 12);
    psm.pull_from_objects().unwrap();
    assert_eq!(psm.state()[7], 7000.0);

    let step = 10.0 * Unit::Second;
    rk4_step(psm.state_mut(), 2, step);
    psm.push_to_objects().unwrap();

    let obj = read_object(&form).unwrap();
    assert_eq!(obj.epoch(), start_epoch() + step);
    let parameter = obj.prop_item("CartesianState").unwrap().parameter;
    assert_eq!(
        obj.scalar(parameter, ElementCoords::Vector { row: 7 }).unwrap(),
        psm.state()[7]
    );
}

#[test]
fn epoch_disagreement_is_fatal() {
    let _ = pretty_env_logger::try_init();
    let sat1 = leo_at_periapsis("Sat1", 0.1);
    let sat2 = leo_at_periapsis("Sat2", 0.1);
    write_object(&sat2)
        .unwrap()
        .set_epoch(start_epoch() + 1.0 * Unit::Second);

    let mut psm = PropagationStateManager::new();
    for sat in [&sat1, &sat2] {
        psm.register_object(sat).unwrap();
        psm.register_property(sat, "CartesianState").unwrap();
    }
    psm.build_layout().unwrap();
    let err = psm.pull_from_objects().unwrap_err();
    assert_eq!(
        err,
        SyncError::EpochMismatch {
            first: "Sat1".to_string(),
            first_epoch: start_epoch(),
            other: "Sat2".to_string(),
            other_epoch: start_epoch() + 1.0 * Unit::Second,
        }
    );
    // The vector was not touched
    assert!(psm.state().data().iter().all(|v| *v == 0.0));
}

#[test]
fn epoch_tolerance() {
    let sat1 = leo_at_periapsis("Sat1", 0.1);
    let sat2 = leo_at_periapsis("Sat2", 0.1);
    write_object(&sat2)
        .unwrap()
        .set_epoch(start_epoch() + 1.0 * Unit::Microsecond);

    let mut psm = PropagationStateManager::with_config(
        StateManagerConfig::builder().epoch_tolerance_s(1e-3).build(),
    );
    for sat in [&sat1, &sat2] {
        psm.register_object(sat).unwrap();
        psm.register_property(sat, "CartesianState").unwrap();
    }
    psm.build_layout().unwrap();
    psm.pull_from_objects().unwrap();
    assert_eq!(psm.state().epoch(), start_epoch());

    // Pushing moves everyone onto the vector epoch
    psm.push_to_objects().unwrap();
    assert_eq!(read_object(&sat2).unwrap().epoch(), start_epoch());
}

#[test]
fn non_finite_values_are_fatal() {
    let sat = share(Spacecraft::cartesian(
        "Lost",
        f64::NAN,
        0.0,
        0.0,
        0.0,
        7.5,
        0.0,
        start_epoch(),
    ));
    let mut psm = PropagationStateManager::new();
    psm.register_object(&sat).unwrap();
    psm.register_property(&sat, "CartesianState").unwrap();
    psm.build_layout().unwrap();
    let err = psm.pull_from_objects().unwrap_err();
    assert!(matches!(err, SyncError::NonFiniteValue { index: 0, .. }));
    let msg = err.to_string();
    assert!(msg.contains("Lost.CartesianState"), "{msg}");
}

#[test]
fn state_size_is_checked() {
    let sat = leo_at_periapsis("Sat", 0.1);
    let mut psm = PropagationStateManager::new();
    psm.register_object(&sat).unwrap();
    psm.register_property(&sat, "CartesianState").unwrap();
    psm.build_layout().unwrap();

    let short = propstate::linalg::DVector::from_element(5, 1.0);
    assert_eq!(
        psm.state_mut().set_data(&short),
        Err(SyncError::SizeMismatch {
            expected: 6,
            found: 5
        })
    );
}
