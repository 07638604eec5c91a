use super::KineticTrace;
use super::params::CurveFactors;
use crate::core::models::kinetics::{KineticMetrics, KineticSample};
use crate::engine::error::SimulationError;
use crate::engine::noise::{jitter, round_to};
use crate::engine::progress::{Progress, ProgressReporter};
use rand::Rng;

pub const SAMPLES_PER_UNIT: f64 = 6.0;

const ACTIVITY_PLATEAU: f64 = 100.0;
const PRODUCT_PLATEAU: f64 = 80.0;
const ACTIVITY_STEEPNESS: f64 = 0.5;
const PRODUCT_STEEPNESS: f64 = 0.3;
const STABILITY_DECAY: f64 = 0.02;

const ACTIVITY_NOISE: f64 = 5.0;
const STABILITY_NOISE: f64 = 3.0;
const PRODUCT_NOISE: f64 = 4.0;

fn logistic(plateau: f64, steepness: f64, midpoint: f64, t: f64) -> f64 {
    plateau / (1.0 + (-steepness * (t - midpoint)).exp())
}

/// Evaluates the activity, stability and product curves directly on an even grid.
pub fn simulate(
    factors: CurveFactors,
    duration: f64,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<KineticTrace, SimulationError> {
    let intervals = ((SAMPLES_PER_UNIT * duration).floor() as u64).max(1);
    let step = duration / intervals as f64;

    reporter.report(Progress::TaskStart {
        total_steps: intervals + 1,
    });
    let mut samples = Vec::with_capacity(intervals as usize + 1);
    for i in 0..=intervals {
        let t = i as f64 * step;

        let activity = logistic(
            ACTIVITY_PLATEAU * factors.activity,
            ACTIVITY_STEEPNESS,
            duration / 2.0,
            t,
        ) + jitter(rng, ACTIVITY_NOISE);
        let stability = factors.stability_base * (-STABILITY_DECAY * t).exp() * 100.0
            + jitter(rng, STABILITY_NOISE);
        let product = logistic(
            PRODUCT_PLATEAU * factors.activity,
            PRODUCT_STEEPNESS,
            duration / 3.0,
            t,
        ) + jitter(rng, PRODUCT_NOISE);

        samples.push(KineticSample {
            time: round_to(t, 1),
            activity: round_to(activity, 1).max(0.0),
            stability: round_to(stability, 1).clamp(0.0, 100.0),
            product: round_to(product, 1).max(0.0),
            substrate: None,
            active_enzyme: None,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    let metrics = metrics(&samples)?;
    Ok(KineticTrace {
        samples,
        events: Vec::new(),
        metrics,
    })
}

fn metrics(samples: &[KineticSample]) -> Result<KineticMetrics, SimulationError> {
    let last = samples
        .last()
        .ok_or_else(|| SimulationError::InternalSimulation("Empty kinetic series".into()))?;
    if !(last.activity.is_finite() && last.stability.is_finite() && last.product.is_finite()) {
        return Err(SimulationError::InternalSimulation(
            "Non-finite value in closed-form series".into(),
        ));
    }
    let max_activity = samples.iter().map(|s| s.activity).fold(0.0, f64::max);

    Ok(KineticMetrics {
        max_activity: round_to(max_activity, 1),
        final_stability: last.stability,
        final_product: last.product,
        efficiency: round_to(last.activity / 100.0 * last.stability / 100.0 * 100.0, 1),
        substrate_consumed: None,
    })
}
