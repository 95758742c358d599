use smbo::space::Value;
use smbo::{Error, Minimizer, Phase};

use super::{bench1, bench2, line, reals};

const X0: [f64; 10] = [-6.0, -4.5, -3.0, -1.5, 0.0, 1.2, 2.4, 3.6, 4.8, 6.0];

#[test]
fn warm_start_finds_the_deep_basin() {
    let result = Minimizer::new(line(-6.0, 6.0))
        .n_calls(30)
        .n_random_starts(0)
        .x0(reals(&X0))
        .random_state(0)
        .run(bench2)
        .unwrap();
    assert_eq!(result.func_vals.len(), 30);
    assert_eq!(&result.x_iters[..10], reals(&X0).as_slice());
    assert!(result.fun < -4.95, "fun = {}", result.fun);
}

#[test]
fn precomputed_values_are_not_re_evaluated() {
    let y0: Vec<f64> = X0.iter().map(|&x| bench2(&[Value::Real(x)]).unwrap()).collect();
    let mut calls = 0;
    let result = Minimizer::new(line(-6.0, 6.0))
        .n_calls(15)
        .n_random_starts(0)
        .x0(reals(&X0))
        .y0(y0.clone())
        .random_state(1)
        .run(|x: &[Value]| {
            calls += 1;
            bench2(x)
        })
        .unwrap();
    assert_eq!(calls, 5);
    assert_eq!(result.func_vals.len(), 15);
    assert_eq!(&result.func_vals[..10], y0.as_slice());
}

#[test]
fn mismatched_y0_is_rejected() {
    let err = Minimizer::new(line(-2.0, 2.0))
        .x0(reals(&[0.0, 1.0]))
        .y0(vec![0.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::WarmStartLengthMismatch { x0: 2, y0: 1 }));
}

#[test]
fn x0_outside_the_space_is_rejected() {
    let err = Minimizer::new(line(-2.0, 2.0))
        .x0(reals(&[0.0, 3.0]))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::OutOfDomain { .. }));
}

#[test]
fn warm_start_is_evaluated_in_order_before_anything_else() {
    let mut opt = Minimizer::new(line(-2.0, 2.0))
        .n_calls(6)
        .n_random_starts(4)
        .x0(reals(&[0.5, -0.5]))
        .random_state(2)
        .n_points(50)
        .build()
        .unwrap();
    assert_eq!(opt.phase(), Phase::WarmStart);
    assert_eq!(opt.ask().unwrap(), vec![Value::Real(0.5)]);
    opt.tell(vec![Value::Real(0.5)], 0.25).unwrap();
    assert_eq!(opt.ask().unwrap(), vec![Value::Real(-0.5)]);
    opt.tell(vec![Value::Real(-0.5)], 0.25).unwrap();
    assert_eq!(opt.phase(), Phase::RandomSampling);
    while !opt.phase().is_terminal() {
        let x = opt.ask().unwrap();
        let y = bench1(&x).unwrap();
        opt.tell(x, y).unwrap();
    }
    assert_eq!(opt.result().len(), 6);
}
