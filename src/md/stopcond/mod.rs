/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::interpolation::Interpolator;
use super::param::{Apsis, OrbitQuantity};
use super::quantity::Quantity;
use crate::cosmic::{read_object, SharedObject};
use crate::errors::{
    ApsisUnsupportedSnafu, BufferTooSmallSnafu, CycleUnavailableSnafu, EpochSourceSnafu,
    EpochUnavailableSnafu, EvaluationSnafu, GoalNotBracketedSnafu, InsufficientSamplesSnafu,
    InvalidGoalSnafu, InvalidStopQuantitySnafu, NotValidatedSnafu, StopConditionError,
    StopConfigSnafu,
};
use crate::io::{ConfigError, ConfigRepr, InvalidConfigSnafu};
use crate::time::{Duration, Epoch, Unit};
use crate::utils::remap_about;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use std::sync::Arc;
use typed_builder::TypedBuilder;

mod ring_buffer;
pub use ring_buffer::SampleRing;

fn default_buffer_size() -> usize {
    5
}

fn default_repeat_count() -> usize {
    1
}

fn default_min_apsis_eccentricity() -> f64 {
    1e-6
}

/// Configuration of a stopping condition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct StopConditionConfig {
    /// Number of most recent samples retained to interpolate the stop epoch
    #[builder(default = 5)]
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// The goal is reported as met on this crossing
    #[builder(default = 1)]
    #[serde(default = "default_repeat_count")]
    pub repeat_count: usize,
    /// Below this eccentricity, apsides are ill defined and never trigger
    #[builder(default = 1e-6)]
    #[serde(default = "default_min_apsis_eccentricity")]
    pub min_apsis_eccentricity: f64,
    /// Periapsis passages farther than this radius (km) are ignored
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub max_periapsis_radius_km: Option<f64>,
    /// Set if the propagation runs backward in time
    #[builder(default = false)]
    #[serde(default)]
    pub backward: bool,
}

impl Default for StopConditionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for StopConditionConfig {
    fn check(&self) -> Result<(), ConfigError> {
        ensure!(
            self.buffer_size >= 2,
            InvalidConfigSnafu {
                msg: format!(
                    "a crossing needs at least two buffered samples, got buffer_size = {}",
                    self.buffer_size
                )
            }
        );
        ensure!(
            self.repeat_count >= 1,
            InvalidConfigSnafu {
                msg: "repeat_count must be at least 1"
            }
        );
        ensure!(
            self.min_apsis_eccentricity.is_finite() && self.min_apsis_eccentricity >= 0.0,
            InvalidConfigSnafu {
                msg: format!(
                    "min_apsis_eccentricity must be non negative, got {}",
                    self.min_apsis_eccentricity
                )
            }
        );
        if let Some(max_rp) = self.max_periapsis_radius_km {
            ensure!(
                max_rp > 0.0,
                InvalidConfigSnafu {
                    msg: format!("max_periapsis_radius_km must be positive, got {max_rp}")
                }
            );
        }
        Ok(())
    }
}

/// Value a stop quantity must reach.
#[derive(Clone, Debug)]
pub enum Goal {
    Value(f64),
    /// Goal evaluated at every step, e.g. a property of another object
    Quantity(Arc<dyn Quantity>),
}

impl From<f64> for Goal {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<Arc<dyn Quantity>> for Goal {
    fn from(quantity: Arc<dyn Quantity>) -> Self {
        Self::Quantity(quantity)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Quantity(quantity) => write!(f, "{quantity}"),
        }
    }
}

/// Where a stopping condition reads the epoch of each sample.
#[derive(Clone, Debug, Default)]
pub enum EpochSource {
    /// Epoch provided by the caller through [`StopCondition::set_internal_epoch`]
    #[default]
    Internal,
    /// Epoch of a propagated object
    Object(SharedObject),
}

/// How the samples of a stop quantity are compared to the goal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StopKind {
    Plain,
    /// Time valued quantity in the provided unit, the stop epoch follows directly from the goal
    Time(Unit),
    /// Angle-like quantity wrapping around over [min, max]
    Cyclic { min: f64, max: f64 },
    Apoapsis,
    Periapsis,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConditionStatus {
    Uninitialized,
    Validated,
    /// At least one sample was recorded
    Armed,
    GoalMet,
    StillWaiting,
}

/// One sample of a stop quantity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub epoch: Epoch,
    pub value: f64,
}

/// Consecutive samples between which the stop quantity reached its goal.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Crossing {
    previous: Sample,
    current: Sample,
    goal: f64,
}

/// Returns whether the goal lies between both values, inclusive.
pub fn brackets(prev: f64, curr: f64, goal: f64) -> bool {
    prev.min(curr) <= goal && goal <= prev.max(curr)
}

/// Returns whether a time valued quantity went through its goal in the direction of propagation.
pub fn time_crossed(prev: f64, curr: f64, goal: f64, backward: bool) -> bool {
    let (before, after) = (prev - goal, curr - goal);
    if backward {
        before > 0.0 && after <= 0.0
    } else {
        before < 0.0 && after >= 0.0
    }
}

/// Returns whether a cyclic quantity of the provided period went through its goal.
///
/// Both samples are mapped into the window of one period centered on the goal. Samples more than
/// half a period apart after that mapping wrapped around the far side of the cycle, which is not a
/// crossing of the goal.
pub fn cyclic_crossed(prev: f64, curr: f64, goal: f64, period: f64) -> bool {
    let prev = remap_about(prev, goal, period);
    let curr = remap_about(curr, goal, period);
    (curr - prev).abs() <= 0.5 * period && brackets(prev, curr, goal)
}

/// Returns whether the radial rate changed sign as it does through the provided apsis.
pub fn apsis_crossed(apsis: Apsis, prev: f64, curr: f64, backward: bool) -> bool {
    let (before, after) = if backward { (curr, prev) } else { (prev, curr) };
    match apsis {
        Apsis::Periapsis => before < 0.0 && after >= 0.0,
        Apsis::Apoapsis => before > 0.0 && after <= 0.0,
    }
}

/// Detects when a stop quantity reaches its goal during a propagation, and locates the epoch of
/// that event.
///
/// The condition must be validated before use. Then, either call [`evaluate`](Self::evaluate) at
/// every step and query [`stop_epoch`](Self::stop_epoch) once it returns true, or call
/// [`add_to_buffer`](Self::add_to_buffer) which resolves the stop epoch once a crossing is
/// recorded and the buffer is full. Call [`reset`](Self::reset) to reuse the condition.
#[derive(Clone, Debug)]
pub struct StopCondition {
    name: String,
    stop: Arc<dyn Quantity>,
    goal: Goal,
    epoch_source: EpochSource,
    interpolator: Arc<dyn Interpolator>,
    config: StopConditionConfig,
    status: ConditionStatus,
    kind: StopKind,
    eccentricity: Option<Arc<dyn Quantity>>,
    radius: Option<Arc<dyn Quantity>>,
    internal_epoch: Option<Epoch>,
    previous: Option<Sample>,
    buffer: SampleRing<Sample>,
    crossings: usize,
    last_was_crossing: bool,
    active: bool,
    stop_epoch: Option<Epoch>,
    stop_interval: Duration,
    crossing: Option<Crossing>,
    pending: Option<Crossing>,
}

impl StopCondition {
    pub fn new(
        name: &str,
        stop: Arc<dyn Quantity>,
        goal: impl Into<Goal>,
        interpolator: Arc<dyn Interpolator>,
    ) -> Self {
        let config = StopConditionConfig::default();
        Self {
            name: name.to_string(),
            stop,
            goal: goal.into(),
            epoch_source: EpochSource::default(),
            interpolator,
            buffer: SampleRing::new(config.buffer_size),
            config,
            status: ConditionStatus::Uninitialized,
            kind: StopKind::Plain,
            eccentricity: None,
            radius: None,
            internal_epoch: None,
            previous: None,
            crossings: 0,
            last_was_crossing: false,
            active: true,
            stop_epoch: None,
            stop_interval: Duration::ZERO,
            crossing: None,
            pending: None,
        }
    }

    pub fn with_epoch_source(mut self, source: EpochSource) -> Self {
        self.set_epoch_source(source);
        self
    }

    pub fn with_config(mut self, config: StopConditionConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn set_stop_quantity(&mut self, stop: Arc<dyn Quantity>) {
        self.stop = stop;
        self.invalidate();
    }

    pub fn set_goal(&mut self, goal: impl Into<Goal>) {
        self.goal = goal.into();
        self.invalidate();
    }

    pub fn set_epoch_source(&mut self, source: EpochSource) {
        self.epoch_source = source;
        self.invalidate();
    }

    pub fn set_interpolator(&mut self, interpolator: Arc<dyn Interpolator>) {
        self.interpolator = interpolator;
        self.invalidate();
    }

    pub fn set_config(&mut self, config: StopConditionConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Sets the epoch of the next samples when the epoch source is internal
    pub fn set_internal_epoch(&mut self, epoch: Epoch) {
        self.internal_epoch = Some(epoch);
    }

    fn invalidate(&mut self) {
        self.status = ConditionStatus::Uninitialized;
        self.reset();
    }

    /// Resolves how the stop quantity is compared to its goal, and builds the orbital helpers
    /// needed for apsis detection.
    pub fn validate(&mut self) -> Result<(), StopConditionError> {
        self.config
            .check()
            .context(StopConfigSnafu { name: &self.name })?;
        self.stop
            .validate()
            .context(InvalidStopQuantitySnafu { name: &self.name })?;
        if let Goal::Quantity(goal) = &self.goal {
            goal.validate()
                .context(InvalidGoalSnafu { name: &self.name })?;
        }

        self.eccentricity = None;
        self.radius = None;
        self.kind = if let Some(apsis) = self.stop.apsis() {
            self.eccentricity = Some(self.helper(OrbitQuantity::Eccentricity)?);
            match apsis {
                Apsis::Apoapsis => StopKind::Apoapsis,
                Apsis::Periapsis => {
                    self.radius = Some(self.helper(OrbitQuantity::Rmag)?);
                    StopKind::Periapsis
                }
            }
        } else if let Some(unit) = self.stop.time_unit() {
            StopKind::Time(unit)
        } else if self.stop.cycle().is_cyclic() {
            let (min, max) = self.stop.cycle().range().context(CycleUnavailableSnafu {
                name: &self.name,
                quantity: self.stop.to_string(),
            })?;
            StopKind::Cyclic { min, max }
        } else {
            StopKind::Plain
        };

        if !matches!(self.kind, StopKind::Time(_)) {
            let required = self.interpolator.required_points();
            ensure!(
                self.config.buffer_size >= required,
                BufferTooSmallSnafu {
                    name: &self.name,
                    size: self.config.buffer_size,
                    required,
                }
            );
        }

        self.buffer = SampleRing::new(self.config.buffer_size);
        self.status = ConditionStatus::Validated;
        self.reset();
        debug!("{self} validated as {:?}", self.kind);
        Ok(())
    }

    fn helper(&self, quantity: OrbitQuantity) -> Result<Arc<dyn Quantity>, StopConditionError> {
        let helper = self
            .stop
            .orbit_helper(quantity)
            .context(ApsisUnsupportedSnafu {
                name: &self.name,
                quantity: self.stop.to_string(),
            })?;
        helper
            .validate()
            .context(InvalidStopQuantitySnafu { name: &self.name })?;
        Ok(helper)
    }

    fn ensure_validated(&self) -> Result<(), StopConditionError> {
        ensure!(
            self.status != ConditionStatus::Uninitialized,
            NotValidatedSnafu { name: &self.name }
        );
        Ok(())
    }

    fn current_epoch(&self) -> Result<Epoch, StopConditionError> {
        match &self.epoch_source {
            EpochSource::Internal => self
                .internal_epoch
                .context(EpochUnavailableSnafu { name: &self.name }),
            EpochSource::Object(object) => Ok(read_object(object)
                .context(EpochSourceSnafu { name: &self.name })?
                .epoch()),
        }
    }

    fn sample(&self) -> Result<Sample, StopConditionError> {
        let value = self
            .stop
            .evaluate()
            .context(EvaluationSnafu { name: &self.name })?;
        Ok(Sample {
            epoch: self.current_epoch()?,
            value,
        })
    }

    /// Current value of the goal; apsides are sought where the radial rate is zero
    pub fn goal_value(&self) -> Result<f64, StopConditionError> {
        match (&self.kind, &self.goal) {
            (StopKind::Apoapsis | StopKind::Periapsis, _) => Ok(0.0),
            (_, Goal::Value(value)) => Ok(*value),
            (_, Goal::Quantity(quantity)) => quantity
                .evaluate()
                .context(InvalidGoalSnafu { name: &self.name }),
        }
    }

    /// Maps a sample into the window centered on the goal for cyclic quantities
    fn comparable(&self, value: f64, goal: f64) -> f64 {
        match self.kind {
            StopKind::Cyclic { min, max } => remap_about(value, goal, max - min),
            _ => value,
        }
    }

    fn crossed(&self, prev: f64, curr: f64, goal: f64) -> Result<bool, StopConditionError> {
        let backward = self.config.backward;
        match self.kind {
            StopKind::Plain => Ok(brackets(prev, curr, goal)),
            StopKind::Time(_) => Ok(time_crossed(prev, curr, goal, backward)),
            StopKind::Cyclic { min, max } => Ok(cyclic_crossed(prev, curr, goal, max - min)),
            StopKind::Apoapsis => {
                if apsis_crossed(Apsis::Apoapsis, prev, curr, backward) {
                    self.apsis_allowed(Apsis::Apoapsis)
                } else {
                    Ok(false)
                }
            }
            StopKind::Periapsis => {
                if apsis_crossed(Apsis::Periapsis, prev, curr, backward) {
                    self.apsis_allowed(Apsis::Periapsis)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Checks the orbit shape when the radial rate changes sign
    fn apsis_allowed(&self, apsis: Apsis) -> Result<bool, StopConditionError> {
        let Some(eccentricity) = &self.eccentricity else {
            return Ok(false);
        };
        let ecc = eccentricity
            .evaluate()
            .context(EvaluationSnafu { name: &self.name })?;

        if ecc < self.config.min_apsis_eccentricity {
            warn!(
                "{}: eccentricity {ecc:e} is below {:e}, {apsis:?} is ill defined and ignored",
                self.name, self.config.min_apsis_eccentricity
            );
            return Ok(false);
        }

        match apsis {
            Apsis::Apoapsis => Ok(ecc < 1.0),
            Apsis::Periapsis => match (self.config.max_periapsis_radius_km, &self.radius) {
                (Some(max_rp), Some(radius)) => {
                    let rmag = radius
                        .evaluate()
                        .context(EvaluationSnafu { name: &self.name })?;
                    Ok(rmag <= max_rp)
                }
                _ => Ok(true),
            },
        }
    }

    /// Samples the stop quantity and returns whether it reached its goal since the previous sample.
    pub fn evaluate(&mut self) -> Result<bool, StopConditionError> {
        self.ensure_validated()?;
        if !self.active {
            return Ok(false);
        }

        let current = self.sample()?;
        let goal = self.goal_value()?;
        self.buffer.push(current);

        let Some(previous) = self.previous.replace(current) else {
            self.status = ConditionStatus::Armed;
            return Ok(false);
        };

        let Some(crossing) = self.count_step(previous, current, goal)? else {
            self.status = ConditionStatus::StillWaiting;
            return Ok(false);
        };

        self.record(crossing);
        if !self.is_time_valued() {
            self.stop_epoch = None;
        }
        info!(
            "{self} reached between {} and {}",
            previous.epoch, current.epoch
        );
        Ok(true)
    }

    /// Stores a sample in the buffer. Steps between consecutive samples are tested for a crossing
    /// as in [`evaluate`](Self::evaluate), but the stop epoch is only resolved once the buffer is
    /// full, and this returns true at that point. Each crossing is reported once.
    pub fn add_to_buffer(&mut self) -> Result<bool, StopConditionError> {
        self.ensure_validated()?;
        if !self.active {
            return Ok(false);
        }

        let current = self.sample()?;
        let goal = self.goal_value()?;
        let previous = self.buffer.newest();
        self.buffer.push(current);
        self.previous = Some(current);

        let Some(previous) = previous else {
            self.status = ConditionStatus::Armed;
            return Ok(false);
        };

        if let Some(crossing) = self.count_step(previous, current, goal)? {
            self.pending = Some(crossing);
        }

        let Some(crossing) = self.pending.filter(|_| self.buffer.is_full()) else {
            self.status = ConditionStatus::StillWaiting;
            return Ok(false);
        };

        let epoch = self.resolve(&crossing)?;
        self.pending = None;
        self.record(crossing);
        self.stop_epoch = Some(epoch);
        info!("{self} reached at {epoch}");
        Ok(true)
    }

    /// Tests one step for a crossing and counts it. Returns the crossing once the repeat count
    /// is reached.
    fn count_step(
        &mut self,
        previous: Sample,
        current: Sample,
        goal: f64,
    ) -> Result<Option<Crossing>, StopConditionError> {
        // A sample exactly on the goal brackets both steps around it, count it once
        let repeated = self.last_was_crossing && self.comparable(previous.value, goal) == goal;
        let crossed = !repeated && self.crossed(previous.value, current.value, goal)?;
        self.last_was_crossing = crossed;

        if !crossed {
            return Ok(None);
        }

        self.crossings += 1;
        if self.crossings < self.config.repeat_count {
            debug!(
                "{self}: crossing {} of {} at {}",
                self.crossings, self.config.repeat_count, current.epoch
            );
            return Ok(None);
        }

        Ok(Some(Crossing {
            previous,
            current,
            goal,
        }))
    }

    fn record(&mut self, crossing: Crossing) {
        match self.kind {
            StopKind::Time(unit) => {
                self.stop_interval = (crossing.goal - crossing.previous.value) * unit;
                self.stop_epoch = Some(crossing.previous.epoch + self.stop_interval);
            }
            _ => {
                self.stop_interval = crossing.current.epoch - crossing.previous.epoch;
            }
        }
        self.crossing = Some(crossing);
        self.status = ConditionStatus::GoalMet;
    }

    /// Buffered samples around a crossing over which the stop quantity varies continuously.
    ///
    /// The run ends before the next step which brackets the goal again, so the crossing is the
    /// most recent bracketing segment. Cyclic quantities stop at the wrap around the far side of
    /// the cycle. A crossing no longer in the buffer is resolved from its two samples.
    fn samples_around(&self, crossing: &Crossing) -> Vec<Sample> {
        let goal = crossing.goal;
        let samples: Vec<Sample> = self.buffer.iter().collect();
        let Some(start) = samples
            .windows(2)
            .rposition(|pair| pair[0] == crossing.previous && pair[1] == crossing.current)
        else {
            return vec![crossing.previous, crossing.current];
        };

        let continuous = |a: &Sample, b: &Sample| match self.kind {
            StopKind::Cyclic { min, max } => {
                let step = self.comparable(b.value, goal) - self.comparable(a.value, goal);
                step.abs() <= 0.5 * (max - min)
            }
            _ => true,
        };

        let mut first = start;
        while first > 0 && continuous(&samples[first - 1], &samples[first]) {
            first -= 1;
        }

        let mut last = start + 1;
        while last + 1 < samples.len() {
            let (a, b) = (&samples[last], &samples[last + 1]);
            let again = brackets(
                self.comparable(a.value, goal),
                self.comparable(b.value, goal),
                goal,
            );
            if again || !continuous(a, b) {
                break;
            }
            last += 1;
        }

        samples[first..=last].to_vec()
    }

    fn resolve(&self, crossing: &Crossing) -> Result<Epoch, StopConditionError> {
        let goal = crossing.goal;
        if let StopKind::Time(unit) = self.kind {
            return Ok(crossing.previous.epoch + (goal - crossing.previous.value) * unit);
        }

        let samples = self.samples_around(crossing);
        ensure!(
            samples.len() >= self.interpolator.required_points(),
            InsufficientSamplesSnafu {
                name: &self.name,
                count: samples.len(),
            }
        );
        let origin = samples[0].epoch;

        // Interpolate the time (in seconds past the oldest sample) as a function of the value
        let points: Vec<(f64, f64)> = samples
            .iter()
            .map(|s| {
                (
                    self.comparable(s.value, goal),
                    (s.epoch - origin).to_seconds(),
                )
            })
            .collect();

        match self.interpolator.interpolate(&points, goal) {
            Ok(offset_s) => Ok(origin + offset_s * Unit::Second),
            Err(source) => {
                error!("{}: {source}", self.name);
                Err(StopConditionError::Interpolation {
                    name: self.name.clone(),
                    source,
                })
            }
        }
    }

    /// Epoch at which the stop quantity reached its goal, interpolated from the buffered samples
    /// around the last crossing unless it was already resolved.
    pub fn stop_epoch(&mut self) -> Result<Epoch, StopConditionError> {
        self.ensure_validated()?;
        if let Some(epoch) = self.stop_epoch {
            return Ok(epoch);
        }
        let Some(crossing) = self.crossing else {
            return GoalNotBracketedSnafu {
                name: &self.name,
                goal: self.goal_value()?,
            }
            .fail();
        };
        let epoch = self.resolve(&crossing)?;
        self.stop_epoch = Some(epoch);
        Ok(epoch)
    }

    /// Step which produced the crossing. For time valued quantities, the time from the previous
    /// sample to the goal.
    pub fn stop_interval(&self) -> Duration {
        self.stop_interval
    }

    /// Forgets all samples and crossings, the configuration and validation are kept.
    pub fn reset(&mut self) {
        self.previous = None;
        self.buffer.clear();
        self.crossings = 0;
        self.last_was_crossing = false;
        self.stop_epoch = None;
        self.stop_interval = Duration::ZERO;
        self.crossing = None;
        self.pending = None;
        if self.status != ConditionStatus::Uninitialized {
            self.status = ConditionStatus::Validated;
        }
    }

    /// Suspends (or resumes) evaluation, skipped steps leave the sample history untouched
    pub fn skip_evaluation(&mut self, skip: bool) {
        self.active = !skip;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ConditionStatus {
        self.status
    }

    pub fn kind(&self) -> StopKind {
        self.kind
    }

    pub fn is_time_valued(&self) -> bool {
        matches!(self.kind, StopKind::Time(_))
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(self.kind, StopKind::Cyclic { .. })
    }

    pub fn is_apsis(&self) -> bool {
        matches!(self.kind, StopKind::Apoapsis | StopKind::Periapsis)
    }

    pub fn config(&self) -> &StopConditionConfig {
        &self.config
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    /// Number of crossings seen since the last reset
    pub fn crossings(&self) -> usize {
        self.crossings
    }

    pub fn previous(&self) -> Option<Sample> {
        self.previous
    }

    /// Buffered samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.buffer.iter()
    }
}

impl fmt::Display for StopCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StopKind::Apoapsis | StopKind::Periapsis => write!(f, "{} ({})", self.name, self.stop),
            _ => write!(f, "{} ({} = {})", self.name, self.stop, self.goal),
        }
    }
}
