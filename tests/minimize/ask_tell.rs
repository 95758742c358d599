use smbo::space::Value;
use smbo::{Error, ErrorKind, Minimizer, Phase, RunStatus};

use super::{bench1, line};

#[test]
fn ask_tell_matches_run() {
    let build = || {
        Minimizer::new(line(-2.0, 2.0))
            .n_calls(10)
            .n_random_starts(3)
            .random_state(21)
            .n_points(100)
    };
    let mut opt = build().build().unwrap();
    while opt.phase() != Phase::Done {
        let x = opt.ask().unwrap();
        let y = bench1(&x).unwrap();
        opt.tell(x, y).unwrap();
    }
    let driven = build().run(bench1).unwrap();
    assert_eq!(opt.result().x_iters, driven.x_iters);
    assert_eq!(opt.into_result().func_vals, driven.func_vals);
}

#[test]
fn tell_accepts_points_that_were_not_asked() {
    let mut opt = Minimizer::new(line(-2.0, 2.0))
        .n_calls(4)
        .n_random_starts(2)
        .random_state(0)
        .n_points(50)
        .build()
        .unwrap();
    opt.tell(vec![Value::Real(1.5)], 2.25).unwrap();
    opt.tell(vec![Value::Real(0.1)], 0.01).unwrap();
    assert_eq!(opt.phase(), Phase::ModelGuided);
    assert_eq!(opt.result().x, vec![Value::Real(0.1)]);
    assert_eq!(opt.remaining(), 2);
}

#[test]
fn exhausted_optimizer_refuses_more_work() {
    let mut opt = Minimizer::new(line(-2.0, 2.0)).n_calls(1).build().unwrap();
    let x = opt.ask().unwrap();
    opt.tell(x.clone(), 1.0).unwrap();
    assert_eq!(opt.phase(), Phase::Done);
    let err = opt.tell(x, 1.0).unwrap_err();
    assert!(matches!(err, Error::BudgetExhausted(1)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn stopping_keeps_the_history() {
    let mut opt = Minimizer::new(line(-2.0, 2.0))
        .n_calls(10)
        .random_state(3)
        .build()
        .unwrap();
    for _ in 0..3 {
        let x = opt.ask().unwrap();
        let y = bench1(&x).unwrap();
        opt.tell(x, y).unwrap();
    }
    opt.stop();
    let result = opt.into_result();
    assert_eq!(result.status, RunStatus::Stopped);
    assert_eq!(result.func_vals.len(), 3);
}

#[test]
fn wrong_arity_is_a_domain_error() {
    let mut opt = Minimizer::new(line(-2.0, 2.0)).build().unwrap();
    let err = opt
        .tell(vec![Value::Real(0.0), Value::Real(1.0)], 0.0)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 1,
            got: 2
        }
    ));
}
