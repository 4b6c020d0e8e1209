use super::propagate_until;
use crate::{leo_at_periapsis, period_s, start_epoch, GM_EARTH};
use propstate::cosmic::{share, SharedObject};
use propstate::md::{
    ElapsedTime, EpochSource, Goal, LagrangeInterpolator, LinearInterpolator, ModJulianEpoch,
    OrbitParameter, OrbitQuantity, Quantity, StopConditionConfig,
};
use propstate::time::Unit;
use propstate::{Formation, QuantityError, Spacecraft, StopCondition, StopConditionError, StopKind};
use rstest::*;
use std::f64::consts::PI;
use std::sync::Arc;

const ECC: f64 = 0.1;

fn leo_at_apoapsis(ecc: f64) -> SharedObject {
    let ra = 7000.0 / (1.0 - ecc) * (1.0 + ecc);
    let va = (GM_EARTH * (1.0 - ecc) / ra).sqrt();
    let inc = 28.5_f64.to_radians();
    share(Spacecraft::cartesian(
        "Apo",
        -ra,
        0.0,
        0.0,
        0.0,
        -va * inc.cos(),
        -va * inc.sin(),
        start_epoch(),
    ))
}

/// Time past periapsis (s) at which the true anomaly reaches the provided value
fn time_of_true_anomaly(ecc: f64, ta_deg: f64) -> f64 {
    let half = ta_deg.to_radians() / 2.0;
    let ecc_anom = (2.0 * (((1.0 - ecc) / (1.0 + ecc)).sqrt() * half.tan()).atan())
        .rem_euclid(2.0 * PI);
    let mean_anom = ecc_anom - ecc * ecc_anom.sin();
    mean_anom / (2.0 * PI) * period_s(ecc)
}

fn orbit_condition(
    name: &str,
    sat: &SharedObject,
    quantity: OrbitQuantity,
    goal: impl Into<Goal>,
) -> StopCondition {
    StopCondition::new(
        name,
        Arc::new(OrbitParameter::new(quantity, sat, GM_EARTH).unwrap()),
        goal,
        Arc::new(LinearInterpolator),
    )
    .with_epoch_source(EpochSource::Object(sat.clone()))
}

fn elapsed_s(cond: &mut StopCondition) -> f64 {
    (cond.stop_epoch().unwrap() - start_epoch()).to_seconds()
}

#[rstest]
#[case(OrbitQuantity::Periapsis, 1.0)]
#[case(OrbitQuantity::Apoapsis, 0.5)]
fn apsis_of_a_two_body_orbit(#[case] apsis: OrbitQuantity, #[case] fraction: f64) {
    let _ = pretty_env_logger::try_init();
    let sat = leo_at_periapsis("Sat", ECC);
    let mut cond = orbit_condition("apsis", &sat, apsis, 0.0);
    cond.validate().unwrap();
    assert!(cond.is_apsis());

    let steps = propagate_until(&sat, &mut cond, 10.0 * Unit::Second, 2000);
    assert!(steps.is_some(), "{apsis} not found within 2000 steps");
    let found = elapsed_s(&mut cond);
    let expected = fraction * period_s(ECC);
    assert!(
        (found - expected).abs() < 0.5,
        "{apsis} found at {found} s instead of {expected} s"
    );
    assert_eq!(cond.stop_interval(), 10.0 * Unit::Second);
}

#[test]
fn third_apoapsis() {
    let sat = leo_at_periapsis("Sat", ECC);
    let mut cond = orbit_condition("third apoapsis", &sat, OrbitQuantity::Apoapsis, 0.0)
        .with_config(StopConditionConfig::builder().repeat_count(3).build());
    cond.validate().unwrap();

    propagate_until(&sat, &mut cond, 10.0 * Unit::Second, 2000).unwrap();
    assert_eq!(cond.crossings(), 3);
    let found = elapsed_s(&mut cond);
    assert!((found - 2.5 * period_s(ECC)).abs() < 1.0, "found at {found} s");
}

#[test]
fn circular_orbit_has_no_periapsis() {
    let sat = leo_at_periapsis("Circ", 0.0);
    let mut cond = orbit_condition("periapsis", &sat, OrbitQuantity::Periapsis, 0.0)
        .with_config(StopConditionConfig::builder().min_apsis_eccentricity(1e-3).build());
    cond.validate().unwrap();
    let steps = (1.2 * period_s(0.0) / 60.0) as usize;
    assert_eq!(
        propagate_until(&sat, &mut cond, 60.0 * Unit::Second, steps),
        None
    );
}

#[rstest]
#[case(90.0)]
#[case(270.0)]
fn true_anomaly_goal(#[case] goal: f64) {
    let sat = leo_at_periapsis("Sat", ECC);
    let mut cond = orbit_condition("ta", &sat, OrbitQuantity::TrueAnomaly, goal);
    cond.validate().unwrap();
    assert!(cond.is_cyclic());

    propagate_until(&sat, &mut cond, 10.0 * Unit::Second, 2000).unwrap();
    let found = elapsed_s(&mut cond);
    let expected = time_of_true_anomaly(ECC, goal);
    assert!(
        (found - expected).abs() < 0.5,
        "TA = {goal} found at {found} s instead of {expected} s"
    );
}

#[test]
fn true_anomaly_through_wrap() {
    let sat = leo_at_apoapsis(ECC);
    let mut cond = orbit_condition("ta wrap", &sat, OrbitQuantity::TrueAnomaly, 0.0);
    cond.set_interpolator(Arc::new(LagrangeInterpolator::new(3)));
    cond.validate().unwrap();
    assert_eq!(
        cond.kind(),
        StopKind::Cyclic {
            min: 0.0,
            max: 360.0
        }
    );

    propagate_until(&sat, &mut cond, 10.0 * Unit::Second, 2000).unwrap();
    let found = elapsed_s(&mut cond);
    let expected = 0.5 * period_s(ECC);
    assert!((found - expected).abs() < 0.1, "found at {found} s");
}

#[test]
fn radius_goal_from_another_object() {
    let sat = leo_at_periapsis("Sat", ECC);
    let beacon = share(Spacecraft::cartesian(
        "Beacon",
        8000.0,
        0.0,
        0.0,
        0.0,
        7.0,
        0.0,
        start_epoch(),
    ));
    let goal: Arc<dyn Quantity> =
        Arc::new(OrbitParameter::new(OrbitQuantity::Rmag, &beacon, GM_EARTH).unwrap());
    let mut cond = orbit_condition("rmag", &sat, OrbitQuantity::Rmag, goal);
    cond.validate().unwrap();
    assert_eq!(cond.kind(), StopKind::Plain);

    propagate_until(&sat, &mut cond, 10.0 * Unit::Second, 2000).unwrap();

    // r = p / (1 + e cos(ta))
    let p = 7000.0 * (1.0 + ECC);
    let ta = ((p / 8000.0 - 1.0) / ECC).acos().to_degrees();
    let expected = time_of_true_anomaly(ECC, ta);
    let found = elapsed_s(&mut cond);
    assert!((found - expected).abs() < 0.5, "found at {found} s instead of {expected} s");
}

#[test]
fn elapsed_time() {
    let sat = leo_at_periapsis("Sat", ECC);
    let elapsed = ElapsedTime::since_now(&sat, Unit::Minute).unwrap();
    let mut cond = StopCondition::new(
        "elapsed",
        Arc::new(elapsed),
        15.25,
        Arc::new(LinearInterpolator),
    )
    .with_epoch_source(EpochSource::Object(sat.clone()));
    cond.validate().unwrap();
    assert!(cond.is_time_valued());

    assert_eq!(
        propagate_until(&sat, &mut cond, 60.0 * Unit::Second, 100),
        Some(16)
    );
    assert!((elapsed_s(&mut cond) - 915.0).abs() < 1e-6);
    assert!((cond.stop_interval().to_seconds() - 15.0).abs() < 1e-6);
}

#[test]
fn modified_julian_epoch() {
    let sat = leo_at_periapsis("Sat", ECC);
    let goal = start_epoch().to_mjd_tai_days() + 0.01;
    let mut cond = StopCondition::new(
        "mjd",
        Arc::new(ModJulianEpoch::new(&sat).unwrap()),
        goal,
        Arc::new(LinearInterpolator),
    )
    .with_epoch_source(EpochSource::Object(sat.clone()));
    cond.validate().unwrap();

    assert_eq!(
        propagate_until(&sat, &mut cond, 60.0 * Unit::Second, 100),
        Some(15)
    );
    let found = elapsed_s(&mut cond);
    assert!((found - 864.0).abs() < 1e-3, "found at {found} s");
}

#[test]
fn reuse_after_reset() {
    let sat = leo_at_periapsis("Sat", ECC);
    let mut cond = orbit_condition("apoapsis", &sat, OrbitQuantity::Apoapsis, 0.0);
    cond.validate().unwrap();

    propagate_until(&sat, &mut cond, 10.0 * Unit::Second, 2000).unwrap();
    let first = cond.stop_epoch().unwrap();

    // Next revolution
    cond.reset();
    propagate_until(&sat, &mut cond, 10.0 * Unit::Second, 2000).unwrap();
    let second = cond.stop_epoch().unwrap();
    let period = (second - first).to_seconds();
    assert!((period - period_s(ECC)).abs() < 1.0, "period of {period} s");
}

#[test]
fn orbit_quantity_needs_a_spacecraft() {
    let form = share(Formation::new("Form", start_epoch(), vec![]));
    let mut cond = orbit_condition("bad", &form, OrbitQuantity::SMA, 8000.0);
    let err = cond.validate().unwrap_err();
    match &err {
        StopConditionError::InvalidStopQuantity { name, source } => {
            assert_eq!(name, "bad");
            assert!(matches!(source, QuantityError::WrongOwner { .. }));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(err.to_string().contains("bad"));
}
