use crate::rk4_step;
use propstate::cosmic::SharedObject;
use propstate::time::Duration;
use propstate::{PropagationStateManager, StopCondition};

mod stopcond;

/// Propagates the spacecraft with a fixed step until the condition is met, returns the number of steps
pub fn propagate_until(
    sat: &SharedObject,
    cond: &mut StopCondition,
    step: Duration,
    max_steps: usize,
) -> Option<usize> {
    let mut psm = PropagationStateManager::new();
    psm.register_object(sat).unwrap();
    psm.register_property(sat, "CartesianState").unwrap();
    assert_eq!(psm.build_layout().unwrap(), 6);
    psm.pull_from_objects().unwrap();

    assert!(!cond.evaluate().unwrap());
    for steps in 1..=max_steps {
        rk4_step(psm.state_mut(), 1, step);
        psm.push_to_objects().unwrap();
        if cond.evaluate().unwrap() {
            return Some(steps);
        }
    }
    None
}
