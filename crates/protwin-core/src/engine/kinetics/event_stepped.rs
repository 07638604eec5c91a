use super::KineticTrace;
use crate::core::models::kinetics::{KineticConstants, KineticMetrics, KineticSample};
use crate::engine::error::SimulationError;
use crate::engine::noise::round_to;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::VecDeque;
use tracing::{debug, trace};

pub const TIME_STEP: f64 = 0.1;
pub const INITIAL_ENZYME: f64 = 1.0;
pub const INITIAL_SUBSTRATE: f64 = 1000.0;

/// Decay is applied once per time unit.
const DECAY_EVERY_TICKS: u64 = 10;
/// State is sampled every half time unit.
const SAMPLE_EVERY_TICKS: u64 = 5;
const EVENT_LOG_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy)]
struct ReactorState {
    enzyme: f64,
    substrate: f64,
    product: f64,
}

impl ReactorState {
    fn initial() -> Self {
        Self {
            enzyme: INITIAL_ENZYME,
            substrate: INITIAL_SUBSTRATE,
            product: 0.0,
        }
    }

    fn is_finite(&self) -> bool {
        self.enzyme.is_finite() && self.substrate.is_finite() && self.product.is_finite()
    }

    /// Fraction of the maximal rate `kcat * E0`, as a percentage.
    fn activity(&self, km: f64) -> f64 {
        let saturation = if self.substrate > 0.0 {
            self.substrate / (km + self.substrate)
        } else {
            0.0
        };
        self.enzyme / INITIAL_ENZYME * saturation * 100.0
    }

    fn stability(&self) -> f64 {
        self.enzyme / INITIAL_ENZYME * 100.0
    }

    fn sample(&self, time: f64, km: f64) -> KineticSample {
        KineticSample {
            time: round_to(time, 1),
            activity: round_to(self.activity(km).max(0.0), 1),
            stability: round_to(self.stability().clamp(0.0, 100.0), 1),
            product: round_to(self.product, 1),
            substrate: Some(round_to(self.substrate, 1)),
            active_enzyme: Some(round_to(self.enzyme, 4)),
        }
    }
}

struct EventLog {
    entries: VecDeque<String>,
}

impl EventLog {
    fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(EVENT_LOG_CAPACITY + 1),
        }
    }

    fn push(&mut self, entry: String) {
        self.entries.push_back(entry);
        if self.entries.len() > EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }
    }
}

/// Integrates Michaelis-Menten kinetics at a fixed 0.1 step with first-order
/// enzyme decay once per time unit.
///
/// Substrate consumption and enzyme loss are clamped to the available stock, so
/// neither quantity goes negative.
pub fn simulate(
    constants: KineticConstants,
    duration: f64,
    reporter: &ProgressReporter,
) -> Result<KineticTrace, SimulationError> {
    let KineticConstants {
        kcat,
        km,
        decay_rate,
    } = constants;
    if !(kcat.is_finite() && km.is_finite() && decay_rate.is_finite())
        || kcat < 0.0
        || km <= 0.0
        || decay_rate < 0.0
    {
        return Err(SimulationError::InternalSimulation(format!(
            "Kinetic constants out of range: kcat={kcat}, km={km}, decay={decay_rate}"
        )));
    }

    let total_ticks = (duration / TIME_STEP + 1e-9).floor() as u64;
    debug!(kcat, km, decay_rate, total_ticks, "Starting event-stepped integration.");

    let mut state = ReactorState::initial();
    let mut events = EventLog::new();
    let mut samples = Vec::with_capacity((total_ticks / SAMPLE_EVERY_TICKS + 2) as usize);
    samples.push(state.sample(0.0, km));

    reporter.report(Progress::TaskStart {
        total_steps: total_ticks,
    });
    for tick in 1..=total_ticks {
        let time = tick as f64 * TIME_STEP;

        if state.substrate > 0.0 && state.enzyme > 0.0 {
            let rate = kcat * state.enzyme * state.substrate / (km + state.substrate);
            let consumed = (rate * TIME_STEP).min(state.substrate);
            if consumed > 0.0 {
                state.substrate -= consumed;
                state.product += consumed;
                events.push(format!("t={time:.1}: Reacción v={rate:.2}"));
            }
        }

        if tick % DECAY_EVERY_TICKS == 0 {
            let loss = (state.enzyme * decay_rate).min(state.enzyme);
            if loss > 0.0 {
                state.enzyme -= loss;
                events.push(format!("t={time:.1}: Degradación enzimática -{loss:.4}"));
            }
        }

        if !state.is_finite() {
            return Err(SimulationError::InternalSimulation(format!(
                "Non-finite reactor state at t={time:.1}"
            )));
        }

        if tick % SAMPLE_EVERY_TICKS == 0 || tick == total_ticks {
            let sample = state.sample(time, km);
            trace!(t = sample.time, activity = sample.activity, "Sampled state.");
            samples.push(sample);
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    let metrics = metrics(&samples, &state)?;
    Ok(KineticTrace {
        samples,
        events: events.entries.into(),
        metrics,
    })
}

fn metrics(samples: &[KineticSample], state: &ReactorState) -> Result<KineticMetrics, SimulationError> {
    let last = samples
        .last()
        .ok_or_else(|| SimulationError::InternalSimulation("Empty kinetic series".into()))?;
    let max_activity = samples.iter().map(|s| s.activity).fold(0.0, f64::max);

    Ok(KineticMetrics {
        max_activity: round_to(max_activity, 1),
        final_stability: last.stability,
        final_product: last.product,
        efficiency: round_to(max_activity / 100.0 * last.stability / 100.0 * 100.0, 1),
        substrate_consumed: Some(round_to(INITIAL_SUBSTRATE - state.substrate, 1)),
    })
}
