//! Kinetic execution strategies for the virtual lab.
//!
//! Two interchangeable engines produce a [`KineticTrace`]: a fixed-step
//! Michaelis-Menten integrator (compiled with the `event-engine` feature) and a
//! closed-form curve evaluator that is always available.

pub mod closed_form;
#[cfg(feature = "event-engine")]
pub mod event_stepped;
pub mod params;

use super::bias::Bias;
use super::config::{ConfigError, EnginePreference, MAX_LAB_DURATION};
use super::error::SimulationError;
use super::progress::ProgressReporter;
use crate::core::models::kinetics::{EngineKind, KineticMetrics, KineticSample};
use rand::Rng;

pub const EVENT_ENGINE_AVAILABLE: bool = cfg!(feature = "event-engine");

/// Raw engine output before it is wrapped into a `KineticRun`.
#[derive(Debug, Clone, PartialEq)]
pub struct KineticTrace {
    pub samples: Vec<KineticSample>,
    pub events: Vec<String>,
    pub metrics: KineticMetrics,
}

/// Resolves a preference against the engines compiled into this build.
pub fn select(preference: EnginePreference) -> Result<EngineKind, ConfigError> {
    match preference {
        EnginePreference::ClosedForm => Ok(EngineKind::ClosedForm),
        EnginePreference::EventStepped if EVENT_ENGINE_AVAILABLE => Ok(EngineKind::EventStepped),
        EnginePreference::EventStepped => Err(ConfigError::invalid(
            "engine",
            "the event-stepped engine is not available in this build",
        )),
        EnginePreference::Auto if EVENT_ENGINE_AVAILABLE => Ok(EngineKind::EventStepped),
        EnginePreference::Auto => Ok(EngineKind::ClosedForm),
    }
}

pub fn simulate(
    engine: EngineKind,
    bias: Bias<'_>,
    duration: f64,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<KineticTrace, SimulationError> {
    if !(duration.is_finite() && duration > 0.0 && duration <= MAX_LAB_DURATION) {
        return Err(ConfigError::invalid(
            "duration",
            format!("must be in (0, {MAX_LAB_DURATION}], got {duration}"),
        )
        .into());
    }
    match engine {
        EngineKind::EventStepped => simulate_event_stepped(bias, duration, reporter),
        EngineKind::ClosedForm => {
            closed_form::simulate(params::curve_factors_for(bias), duration, rng, reporter)
        }
    }
}

#[cfg(feature = "event-engine")]
fn simulate_event_stepped(
    bias: Bias<'_>,
    duration: f64,
    reporter: &ProgressReporter,
) -> Result<KineticTrace, SimulationError> {
    event_stepped::simulate(params::constants_for(bias), duration, reporter)
}

#[cfg(not(feature = "event-engine"))]
fn simulate_event_stepped(
    _bias: Bias<'_>,
    _duration: f64,
    _reporter: &ProgressReporter,
) -> Result<KineticTrace, SimulationError> {
    Err(SimulationError::InternalSimulation(
        "event-stepped engine requested but not compiled in".into(),
    ))
}
