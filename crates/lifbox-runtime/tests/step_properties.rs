use lifbox_runtime::{
    lif_box_feed_forward_step, lif_box_feed_forward_step_traced, LIFBoxFeedForwardState,
    LIFBoxParameters, SurrogateMethod, Tensor, DEFAULT_DT,
};
use proptest::prelude::*;

fn population(values: &[f32]) -> LIFBoxFeedForwardState {
    LIFBoxFeedForwardState::new(Tensor::from_slice(values))
}

fn method() -> impl Strategy<Value = SurrogateMethod> {
    prop::sample::select(SurrogateMethod::ALL.to_vec())
}

proptest! {
    #[test]
    fn below_threshold_keeps_decayed_voltage(
        v in prop::collection::vec(-2.0f32..0.5, 1..16),
        input in -2.0f32..2.0,
        dt in 1e-4f32..1e-3,
    ) {
        let p = LIFBoxParameters::default();
        let state = population(&v);
        let input = Tensor::scalar(input);

        let (z, next, trace) = lif_box_feed_forward_step_traced(&input, &state, &p, dt).unwrap();
        for ((&z, &v_new), &v_decayed) in z.iter().zip(next.v.iter()).zip(trace.v_decayed().iter()) {
            if v_decayed < 1.0 {
                prop_assert_eq!(z, 0.0);
                prop_assert_eq!(v_new, v_decayed);
            }
        }
    }

    #[test]
    fn above_threshold_resets(
        v in prop::collection::vec(1.0f32..3.0, 1..16),
        input in 1.0f32..5.0,
        v_reset in -1.0f32..0.5,
        method in method(),
    ) {
        let p = LIFBoxParameters::default()
            .with_v_reset(Tensor::scalar(v_reset))
            .with_method(method);
        let state = population(&v);

        let (z, next, trace) =
            lif_box_feed_forward_step_traced(&Tensor::scalar(input), &state, &p, DEFAULT_DT).unwrap();
        for ((&z, &v_new), &v_decayed) in z.iter().zip(next.v.iter()).zip(trace.v_decayed().iter()) {
            prop_assert!(v_decayed >= 1.0);
            prop_assert_eq!(z, 1.0);
            prop_assert_eq!(v_new, v_reset);
        }
    }

    #[test]
    fn resting_neuron_stays_at_rest(
        n in 1usize..32,
        dt in 1e-5f32..1.0,
        tau_mem_inv in 0.0f32..1e4,
    ) {
        let p = LIFBoxParameters::default().with_tau_mem_inv(Tensor::scalar(tau_mem_inv));
        let mut state = LIFBoxFeedForwardState::zeros(&[n]);
        let input = Tensor::zeros(&[n]);

        for _ in 0..10 {
            let (z, next) = lif_box_feed_forward_step(&input, &state, &p, dt).unwrap();
            prop_assert_eq!(z.sum(), 0.0);
            prop_assert!(next.v.iter().all(|&v| v == 0.0));
            state = next;
        }
    }

    #[test]
    fn frozen_membrane_ignores_input(
        v in prop::collection::vec(-5.0f32..0.99, 1..16),
        input in -100.0f32..100.0,
        dt in 1e-4f32..1e-2,
    ) {
        let p = LIFBoxParameters::default().with_tau_mem_inv(Tensor::scalar(0.0));
        let state = population(&v);

        let (z, next) = lif_box_feed_forward_step(&Tensor::scalar(input), &state, &p, dt).unwrap();
        prop_assert_eq!(z.sum(), 0.0);
        prop_assert_eq!(next.v.to_vec(), v);
    }

    #[test]
    fn spikes_are_binary_and_voltage_finite(
        v in prop::collection::vec(-10.0f32..10.0, 1..32),
        input in -50.0f32..50.0,
        method in method(),
    ) {
        let p = LIFBoxParameters::default().with_method(method);
        let state = population(&v);

        let (z, next) = lif_box_feed_forward_step(&Tensor::scalar(input), &state, &p, DEFAULT_DT).unwrap();
        prop_assert!(z.iter().all(|&s| s == 0.0 || s == 1.0));
        prop_assert!(next.v.all_finite());
    }

    #[test]
    fn step_is_deterministic(
        v in prop::collection::vec(-2.0f32..2.0, 1..16),
        input in -5.0f32..5.0,
    ) {
        let p = LIFBoxParameters::default();
        let state = population(&v);
        let input = Tensor::scalar(input);

        let first = lif_box_feed_forward_step(&input, &state, &p, DEFAULT_DT).unwrap();
        let second = lif_box_feed_forward_step(&input, &state, &p, DEFAULT_DT).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn constant_input_fires_periodically() {
    let p = LIFBoxParameters::default();
    let input = Tensor::from_slice(&[2.0]);
    let mut state = LIFBoxFeedForwardState::zeros(&[1]);
    let mut spike_steps = Vec::new();

    for step in 0..35 {
        let (z, next) = lif_box_feed_forward_step(&input, &state, &p, DEFAULT_DT).unwrap();
        if z.to_vec()[0] == 1.0 {
            spike_steps.push(step);
            assert_eq!(next.v.to_vec(), vec![0.0]);
        } else {
            assert!(next.v.to_vec()[0] < 1.0);
        }
        state = next;
    }

    // The drive approaches v_leak + input = 2.0 and crosses 1.0 every seventh step
    assert_eq!(spike_steps, vec![6, 13, 20, 27, 34]);
}

#[test]
fn unrolled_gradient_reaches_earlier_input() {
    // Backpropagate the final voltage through two steps without spikes
    let p = LIFBoxParameters::default().with_method(SurrogateMethod::Heaviside);
    let state = LIFBoxFeedForwardState::zeros(&[1]);
    let input = Tensor::from_slice(&[1.0]);

    let (_, s1, trace1) = lif_box_feed_forward_step_traced(&input, &state, &p, DEFAULT_DT).unwrap();
    let (_, _, trace2) = lif_box_feed_forward_step_traced(&input, &s1, &p, DEFAULT_DT).unwrap();

    let g2 = trace2
        .backward(&Tensor::scalar(0.0), &Tensor::scalar(1.0), &p)
        .unwrap();
    let g1 = trace1.backward(&Tensor::scalar(0.0), &g2.v, &p).unwrap();

    // d v2 / d i1 = rate * (1 - rate) with rate = dt * tau_mem_inv = 0.1
    assert!((g1.input.to_vec()[0] - 0.09).abs() < 1e-5);
}
