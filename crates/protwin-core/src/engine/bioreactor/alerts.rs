use crate::core::models::bioreactor::{Alert, ReactorSample};

pub const VIABILITY_THRESHOLD: f64 = 90.0;
pub const PRODUCTION_THRESHOLD: f64 = 10.0;
pub const PH_TOLERANCE: f64 = 0.5;

/// Evaluates the three status categories on the final sample.
pub fn evaluate(last: &ReactorSample, input_ph: f64) -> Vec<Alert> {
    vec![
        Alert::Viability {
            optimal: last.viability > VIABILITY_THRESHOLD,
        },
        Alert::Production {
            high: last.product > PRODUCTION_THRESHOLD,
        },
        Alert::Ph {
            stable: (last.ph - input_ph).abs() < PH_TOLERANCE,
        },
    ]
}
