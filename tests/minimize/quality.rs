use smbo::Minimizer;
use smbo::space::{Dimension, Point, Space, Value};
use smbo::surrogate::SurrogateKind;

use super::{bench1, bench2, bench3, bench4, branin, hart6, line, reals};

const TREE_KINDS: [SurrogateKind; 3] = [
    SurrogateKind::ExtraTrees,
    SurrogateKind::RandomForest,
    SurrogateKind::GradientBoostedQuantile,
];

/// Consecutive draws of one uniform stream, ten per surrogate in
/// `TREE_KINDS` order.
const WARM_START_DRAWS: [[f64; 10]; 3] = [
    [
        0.548_813_503_927_324_8,
        0.715_189_366_372_419_5,
        0.602_763_376_071_643_9,
        0.544_883_182_996_896_9,
        0.423_654_799_338_904_7,
        0.645_894_113_066_656_1,
        0.437_587_211_262_692_5,
        0.891_773_000_782_079_8,
        0.963_662_760_501_029_3,
        0.383_441_518_825_777_7,
    ],
    [
        0.791_725_038_082_664_6,
        0.528_894_919_752_904_5,
        0.568_044_561_093_932_3,
        0.925_596_638_292_661,
        0.071_036_058_197_886_94,
        0.087_129_299_701_540_71,
        0.020_218_397_440_325_72,
        0.832_619_845_547_938,
        0.778_156_750_949_850_5,
        0.870_012_148_246_819_2,
    ],
    [
        0.978_618_342_232_764,
        0.799_158_564_216_723_6,
        0.461_479_362_252_931_85,
        0.780_529_176_286_455_5,
        0.118_274_425_868_933_22,
        0.639_921_021_327_523_8,
        0.143_353_287_409_046_4,
        0.944_668_917_049_583_9,
        0.521_848_321_750_071_7,
        0.414_661_939_990_523_6,
    ],
];

/// Runs `kind` with seeds 0, 1 and 2 and requires each run to end within
/// `margin` of `y_opt`.
#[allow(clippy::too_many_arguments)]
fn check_minimize(
    kind: SurrogateKind,
    objective: fn(&[Value]) -> Result<f64, smbo::Error>,
    y_opt: f64,
    space: &Space,
    margin: f64,
    n_calls: usize,
    n_random_starts: usize,
    x0: &[Point],
) {
    for seed in 0..3 {
        let result = Minimizer::new(space.clone())
            .n_calls(n_calls)
            .n_random_starts(n_random_starts)
            .x0(x0.to_vec())
            .random_state(seed)
            .base_estimator(kind)
            .run(objective)
            .unwrap();
        assert_eq!(result.func_vals.len(), n_calls);
        assert!(
            result.fun < y_opt + margin,
            "{kind} with seed {seed} reached {} (target {})",
            result.fun,
            y_opt + margin
        );
    }
}

#[test]
fn tree_surrogates_minimize_the_parabola() {
    for kind in TREE_KINDS {
        check_minimize(kind, bench1, 0.0, &line(-2.0, 2.0), 0.05, 25, 5, &[]);
    }
}

#[test]
fn tree_surrogates_leave_the_shallow_basin() {
    for (kind, draws) in TREE_KINDS.into_iter().zip(WARM_START_DRAWS) {
        let (left, right) = draws.split_at(5);
        let x0: Vec<f64> = left
            .iter()
            .map(|u| -6.0 + 6.0 * u)
            .chain(right.iter().map(|u| 6.0 * u))
            .collect();
        check_minimize(kind, bench2, -5.0, &line(-6.0, 6.0), 0.05, 100, 0, &reals(&x0));
    }
}

#[test]
fn tree_surrogates_find_the_damped_sine_minimum() {
    for kind in TREE_KINDS {
        check_minimize(kind, bench3, -0.9, &line(-2.0, 2.0), 0.05, 25, 10, &[]);
    }
}

#[test]
fn tree_surrogates_pick_the_best_category() {
    let space = Space::new(vec![
        Dimension::categorical(["-2", "-1", "0", "1", "2"]).unwrap(),
    ])
    .unwrap();
    for kind in TREE_KINDS {
        check_minimize(kind, bench4, 0.0, &space, 0.05, 10, 10, &[]);
    }
}

#[test]
fn tree_surrogates_descend_hartmann6() {
    let space = Space::from_bounds(&[(0.0, 1.0); 6]).unwrap();
    for kind in TREE_KINDS {
        check_minimize(kind, hart6, -3.32, &space, 1.0, 50, 10, &[]);
    }
}

#[test]
fn tree_surrogates_reach_a_branin_minimum() {
    let space = Space::from_bounds(&[(-5.0, 10.0), (0.0, 15.0)]).unwrap();
    for kind in TREE_KINDS {
        let n_calls = if kind == SurrogateKind::ExtraTrees { 125 } else { 200 };
        check_minimize(kind, branin, 0.39, &space, 0.15, n_calls, 10, &[]);
    }
}
