use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lifbox_runtime::{
    lif_box_feed_forward_step, lif_box_feed_forward_step_traced, LIFBoxFeedForwardState,
    LIFBoxParameters, Tensor, DEFAULT_DT,
};

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("lif_box_feed_forward_step");
    let p = LIFBoxParameters::default();

    for &n in &[64usize, 1024, 16384] {
        let state = LIFBoxFeedForwardState::zeros(&[n]);
        let input = Tensor::full(&[n], 2.0);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("forward", n), &n, |b, &_n| {
            b.iter(|| lif_box_feed_forward_step(&input, &state, &p, DEFAULT_DT).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("forward_backward", n), &n, |b, &_n| {
            let grad = Tensor::scalar(1.0);
            b.iter(|| {
                let (_, _, trace) =
                    lif_box_feed_forward_step_traced(&input, &state, &p, DEFAULT_DT).unwrap();
                trace.backward(&grad, &grad, &p).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
