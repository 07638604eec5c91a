//! The bioreactor digital twin: bias-driven parameter adjustment, the 25-sample
//! growth/production/viability integration, and status alerts.

pub mod adjust;
pub mod alerts;
pub mod integrate;

use super::bias::Bias;
use super::config::BioreactorSetup;
use super::error::SimulationError;
use super::noise::round_to;
use super::progress::ProgressReporter;
use crate::core::models::bioreactor::{Alert, ReactorMetrics, ReactorSample};
use adjust::Adjustment;
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ReactorTrace {
    pub adjustment: Adjustment,
    pub samples: Vec<ReactorSample>,
    pub metrics: ReactorMetrics,
    pub alerts: Vec<Alert>,
}

pub fn simulate(
    setup: &BioreactorSetup,
    bias: Bias<'_>,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<ReactorTrace, SimulationError> {
    let adjustment = adjust::adjust(setup.params.rate_constant, bias);
    debug!(
        k = setup.params.rate_constant,
        k_adjusted = adjustment.rate_constant,
        viability_base = adjustment.viability_base,
        bias = bias.label(),
        "Adjusted reactor parameters."
    );

    let samples = integrate::integrate(setup, &adjustment, rng, reporter)?;
    let last = samples
        .last()
        .ok_or_else(|| SimulationError::InternalSimulation("Empty reactor series".into()))?;

    let metrics = metrics(&samples, last)?;
    let alerts = alerts::evaluate(last, setup.params.ph);

    Ok(ReactorTrace {
        adjustment,
        samples,
        metrics,
        alerts,
    })
}

fn metrics(samples: &[ReactorSample], last: &ReactorSample) -> Result<ReactorMetrics, SimulationError> {
    if last.biomass <= 0.0 {
        return Err(SimulationError::InternalSimulation(format!(
            "Cannot compute process efficiency: final biomass is {}",
            last.biomass
        )));
    }
    let max_biomass = samples.iter().map(|s| s.biomass).fold(f64::MIN, f64::max);

    Ok(ReactorMetrics {
        max_biomass: round_to(max_biomass, 2),
        final_product: round_to(last.product, 2),
        final_viability: round_to(last.viability, 1),
        efficiency: round_to(last.product / last.biomass * 100.0, 1),
    })
}
