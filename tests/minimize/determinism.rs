use smbo::Minimizer;
use smbo::space::{Dimension, InitialPoints, Space, Value};
use smbo::surrogate::SurrogateKind;

use super::{bench1, line};

fn run(kind: SurrogateKind, seed: u64) -> Vec<Vec<Value>> {
    Minimizer::new(line(-2.0, 2.0))
        .n_calls(12)
        .n_random_starts(4)
        .random_state(seed)
        .base_estimator(kind)
        .n_points(200)
        .run(bench1)
        .unwrap()
        .x_iters
}

#[test]
fn same_seed_same_trajectory() {
    for &kind in SurrogateKind::ALL {
        assert_eq!(run(kind, 7), run(kind, 7), "{kind}");
    }
}

#[test]
fn different_seeds_differ() {
    assert_ne!(
        run(SurrogateKind::ExtraTrees, 1),
        run(SurrogateKind::ExtraTrees, 2)
    );
}

#[test]
fn initial_designs_are_reproducible() {
    let space = Space::new(vec![
        Dimension::real(0.0, 1.0).unwrap(),
        Dimension::integer(-3, 3).unwrap(),
        Dimension::categorical(["a", "b", "c"]).unwrap(),
    ])
    .unwrap();
    for design in [InitialPoints::Random, InitialPoints::Lhs] {
        let trajectory = || {
            Minimizer::new(space.clone())
                .n_calls(6)
                .n_random_starts(6)
                .initial_points(design)
                .random_state(5)
                .run(|x: &[Value]| Ok::<_, smbo::Error>(x[0].as_f64().unwrap()))
                .unwrap()
                .x_iters
        };
        assert_eq!(trajectory(), trajectory(), "{design:?}");
    }
}
