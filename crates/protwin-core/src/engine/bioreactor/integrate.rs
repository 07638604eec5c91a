use super::adjust::Adjustment;
use crate::core::models::bioreactor::{HorizonPolicy, ReactorSample};
use crate::engine::config::BioreactorSetup;
use crate::engine::error::SimulationError;
use crate::engine::noise::{jitter, round_to};
use crate::engine::progress::{Progress, ProgressReporter};
use rand::Rng;

pub const SAMPLE_COUNT: usize = 25;
pub const NOMINAL_HORIZON: f64 = 48.0;

const INTERVALS: usize = SAMPLE_COUNT - 1;
const BIOMASS_SCALE: f64 = 20.0;
const BIOMASS_MIDPOINT: f64 = 24.0;
const PRODUCT_SCALE: f64 = 15.0;
const PRODUCT_STEEPNESS: f64 = 0.15;
const PRODUCT_MIDPOINT: f64 = 20.0;
const VIABILITY_DECAY: f64 = 0.003;
const VIABILITY_FLOOR: f64 = 80.0;
const OXYGEN_PER_BIOMASS: f64 = 0.5;
const OXYGEN_FLOOR: f64 = 10.0;

fn logistic(plateau: f64, steepness: f64, midpoint: f64, t: f64) -> f64 {
    plateau / (1.0 + (-steepness * (t - midpoint)).exp())
}

/// Produces the fixed 25-sample series.
///
/// Curves are always evaluated on the nominal 48-hour grid; the horizon policy
/// only decides which time stamps the samples carry.
pub fn integrate(
    setup: &BioreactorSetup,
    adjustment: &Adjustment,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<Vec<ReactorSample>, SimulationError> {
    let k = adjustment.rate_constant;
    if !k.is_finite() || k <= 0.0 {
        return Err(SimulationError::InternalSimulation(format!(
            "Adjusted rate constant {k} is not positive"
        )));
    }

    let y0 = setup.initial_biomass;
    let base = &setup.params;
    let step = NOMINAL_HORIZON / INTERVALS as f64;

    reporter.report(Progress::TaskStart {
        total_steps: SAMPLE_COUNT as u64,
    });
    let mut samples = Vec::with_capacity(SAMPLE_COUNT);
    for i in 0..SAMPLE_COUNT {
        let t = i as f64 * step;
        let time = match setup.horizon {
            HorizonPolicy::Nominal => t,
            HorizonPolicy::RequestedWindow => {
                setup.window.start() + i as f64 * setup.window.span() / INTERVALS as f64
            }
        };

        let biomass = round_to(
            logistic(BIOMASS_SCALE * (1.0 + k), k, BIOMASS_MIDPOINT, t) + jitter(rng, 0.5),
            2,
        )
        .max(y0);
        let product = round_to(
            (logistic(PRODUCT_SCALE * k, PRODUCT_STEEPNESS, PRODUCT_MIDPOINT, t)
                + jitter(rng, 0.3))
            .max(0.0),
            2,
        );
        let viability = round_to(
            (adjustment.viability_base * (-VIABILITY_DECAY * t).exp() + jitter(rng, 2.0))
                .max(VIABILITY_FLOOR),
            1,
        );
        let oxygen = round_to(
            (base.oxygen - OXYGEN_PER_BIOMASS * biomass + jitter(rng, 3.0)).max(OXYGEN_FLOOR),
            1,
        );
        let ph = round_to(base.ph + jitter(rng, 0.2), 2);
        let temperature = round_to(base.temperature + jitter(rng, 1.0), 1);

        let sample = ReactorSample {
            time,
            biomass,
            product,
            viability,
            oxygen,
            ph,
            temperature,
        };
        if ![biomass, product, viability, oxygen, ph, temperature, time]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(SimulationError::InternalSimulation(format!(
                "Non-finite reactor sample at t={time}"
            )));
        }
        samples.push(sample);
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bioreactor::ReactorBaseParams;
    use crate::engine::bioreactor::adjust;
    use crate::engine::bias::Bias;
    use crate::engine::config::BioreactorSetupBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup(y0: f64, window: &[f64], horizon: HorizonPolicy) -> BioreactorSetup {
        BioreactorSetupBuilder::new()
            .initial_biomass(y0)
            .window(window)
            .horizon(horizon)
            .params(ReactorBaseParams {
                rate_constant: 0.1,
                temperature: 37.0,
                ph: 7.2,
                oxygen: 40.0,
            })
            .build()
            .unwrap()
    }

    fn run(setup: &BioreactorSetup, seed: u64) -> Vec<ReactorSample> {
        let mut rng = StdRng::seed_from_u64(seed);
        let adjustment = adjust::adjust(setup.params.rate_constant, Bias::None);
        integrate(setup, &adjustment, &mut rng, &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn nominal_horizon_covers_48_hours_in_two_hour_steps() {
        let samples = run(&setup(1.0, &[0.0, 10.0], HorizonPolicy::Nominal), 1);
        assert_eq!(samples.len(), SAMPLE_COUNT);
        assert_eq!(samples[1].time, 2.0);
        assert_eq!(samples.last().unwrap().time, 48.0);
    }

    #[test]
    fn requested_window_relabels_sample_times() {
        let samples = run(&setup(1.0, &[10.0, 34.0], HorizonPolicy::RequestedWindow), 1);
        assert_eq!(samples.len(), SAMPLE_COUNT);
        assert_eq!(samples[0].time, 10.0);
        assert_eq!(samples[12].time, 22.0);
        assert_eq!(samples.last().unwrap().time, 34.0);
    }

    #[test]
    fn biomass_never_drops_below_the_inoculum() {
        for seed in 0..20 {
            for y0 in [0.0, 1.0, 7.5, 30.0] {
                let samples = run(&setup(y0, &[0.0, 48.0], HorizonPolicy::Nominal), seed);
                assert!(samples.iter().all(|s| s.biomass >= y0));
            }
        }
    }

    #[test]
    fn floors_apply_to_viability_and_oxygen() {
        let samples = run(&setup(30.0, &[0.0, 48.0], HorizonPolicy::Nominal), 3);
        assert!(samples.iter().all(|s| s.viability >= 80.0 && s.oxygen >= 10.0));
        assert!(samples.iter().all(|s| s.product >= 0.0));
    }

    #[test]
    fn non_positive_adjusted_rate_is_an_internal_error() {
        let s = setup(1.0, &[0.0, 48.0], HorizonPolicy::Nominal);
        let adjustment = Adjustment {
            rate_constant: 0.0,
            viability_base: 95.0,
            efficiency: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            integrate(&s, &adjustment, &mut rng, &ProgressReporter::new()),
            Err(SimulationError::InternalSimulation(_))
        ));
    }
}
