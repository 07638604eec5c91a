use proptest::prelude::*;
use protwin::core::models::bioreactor::HorizonPolicy;
use protwin::workflows::bioreactor::{simulate_bioreactor, try_simulate_bioreactor};
use protwin::workflows::lab::simulate_lab;
use protwin::workflows::score::score_sequence;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use std::collections::BTreeSet;

const SHARED_SCORE_KEYS: &[&str] = &[
    "modelo_usado",
    "confianza",
    "especialidad",
    "secuencia",
    "longitud",
    "tiempo_estimado",
];

fn keys(value: &Value) -> BTreeSet<String> {
    value
        .as_object()
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default()
}

fn attribute_keys(value: &Value) -> BTreeSet<String> {
    keys(value)
        .into_iter()
        .filter(|k| !SHARED_SCORE_KEYS.contains(&k.as_str()))
        .collect()
}

fn sequence_strategy() -> impl Strategy<Value = String> {
    "[ACDEFGHIKLMNPQRSTVWY*]{1,300}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lab_series_is_non_empty_and_ordered(duration in 0.01f64..30.0, seed in any::<u64>(), closed in any::<bool>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let engine = if closed { "closed-form" } else { "auto" };
        let outcome = simulate_lab(&json!({"duracion": duration, "engine": engine}), None, None, &mut rng);
        let run = outcome.into_result().map_err(|e| TestCaseError::fail(e.error))?;

        prop_assert!(!run.time_series.is_empty());
        for pair in run.time_series.windows(2) {
            prop_assert!(pair[0].time <= pair[1].time, "{} > {}", pair[0].time, pair[1].time);
        }
    }

    #[test]
    fn non_positive_duration_always_fails(duration in -1_000.0f64..=0.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = simulate_lab(&json!({"duracion": duration}), None, None, &mut rng);
        let value = serde_json::to_value(&outcome).unwrap();
        prop_assert_eq!(&value["estado"], "fallo");
        prop_assert!(value.get("error").is_some());
    }

    #[test]
    fn bioreactor_has_25_samples_above_the_inoculum(
        start in -100.0f64..100.0,
        span in 0.001f64..500.0,
        k in 0.001f64..2.0,
        y0 in 0.0f64..50.0,
        requested in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let horizon = if requested { HorizonPolicy::RequestedWindow } else { HorizonPolicy::Nominal };
        let run = try_simulate_bioreactor(
            y0,
            &[start, start + span],
            &json!({"k": k}),
            None,
            None,
            horizon,
            &mut rng,
        );
        let run = run.map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(run.time_series.len(), 25);
        prop_assert!(run.time_series.iter().all(|s| s.biomass >= y0));
        prop_assert!(run.final_metrics.max_biomass >= y0);
    }

    #[test]
    fn bioreactor_without_rate_constant_fails(other in 0.0f64..10.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = simulate_bioreactor(1.0, &[0.0, 48.0], &json!({"otra_clave": other}), None, None, &mut rng);
        prop_assert!(outcome.is_failed());
    }

    #[test]
    fn confidence_is_a_probability(sequence in sequence_strategy(), model in "[a-d]|esm2|protbert|prottrans|alphafold|xyz", seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let score = score_sequence(&sequence, &model, &mut rng).unwrap();
        prop_assert!((0.0..=1.0).contains(&score.confidence));
        prop_assert_eq!(score.length, sequence.len());
    }

    #[test]
    fn different_models_have_disjoint_attribute_schemas(sequence in sequence_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let schemas: Vec<BTreeSet<String>> = ["a", "b", "c", "d"]
            .iter()
            .map(|m| attribute_keys(&serde_json::to_value(score_sequence(&sequence, m, &mut rng).unwrap()).unwrap()))
            .collect();

        for (i, a) in schemas.iter().enumerate() {
            prop_assert!(!a.is_empty());
            for b in &schemas[i + 1..] {
                prop_assert!(a.is_disjoint(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn repeated_calls_keep_the_same_keys(sequence in sequence_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let first = serde_json::to_value(score_sequence(&sequence, "b", &mut rng).unwrap()).unwrap();
        let second = serde_json::to_value(score_sequence(&sequence, "b", &mut rng).unwrap()).unwrap();
        prop_assert_eq!(keys(&first), keys(&second));

        let lab_a = serde_json::to_value(simulate_lab(&json!({"duracion": 2}), Some(sequence.as_str()), None, &mut rng)).unwrap();
        let lab_b = serde_json::to_value(simulate_lab(&json!({"duracion": 2}), Some(sequence.as_str()), None, &mut rng)).unwrap();
        prop_assert_eq!(keys(&lab_a), keys(&lab_b));
    }
}
