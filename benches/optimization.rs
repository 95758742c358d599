
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use smbo::space::{Dimension, Space, Value};
use smbo::surrogate::SurrogateKind;
use smbo::{Minimizer, dummy_minimize};

fn branin_space() -> Space {
    Space::new(vec![
        Dimension::real(-5.0, 10.0).unwrap(),
        Dimension::real(0.0, 15.0).unwrap(),
    ])
    .unwrap()
}

fn branin(x: &[Value]) -> Result<f64, smbo::Error> {
    Ok(test_functions::branin(&test_functions::reals(x)))
}

fn bench_estimators_branin(c: &mut Criterion) {
    let mut group = c.benchmark_group("branin_by_estimator");
    group.sample_size(10);

    for kind in [
        SurrogateKind::RandomForest,
        SurrogateKind::ExtraTrees,
        SurrogateKind::GradientBoostedQuantile,
    ] {
        group.bench_with_input(BenchmarkId::new("estimator", kind), &kind, |b, &kind| {
            b.iter(|| {
                Minimizer::new(branin_space())
                    .n_calls(30)
                    .random_state(42)
                    .base_estimator(kind)
                    .n_points(500)
                    .run(branin)
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_hart6(c: &mut Criterion) {
    let mut group = c.benchmark_group("hart6");
    group.sample_size(10);
    let space = Space::from_bounds(&[(0.0, 1.0); 6]).unwrap();

    for n_calls in [20, 40] {
        group.bench_with_input(BenchmarkId::new("n_calls", n_calls), &n_calls, |b, &n| {
            b.iter(|| {
                Minimizer::new(space.clone())
                    .n_calls(n)
                    .random_state(42)
                    .n_points(500)
                    .run(|x: &[Value]| {
                        Ok::<_, smbo::Error>(test_functions::hart6(&test_functions::reals(x)))
                    })
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_random_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_baseline");
    group.sample_size(10);

    group.bench_function("branin_100", |b| {
        b.iter(|| dummy_minimize(branin_space(), 100, Some(42), &mut [], branin).unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_estimators_branin,
    bench_hart6,
    bench_random_baseline
);
criterion_main!(benches);
