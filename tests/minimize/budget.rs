use smbo::{Error, ErrorKind, Minimizer, Phase, RunStatus, dummy_minimize};

use super::{bench1, line, reals};

#[test]
fn zero_calls_is_a_configuration_error() {
    let err = Minimizer::new(line(-2.0, 2.0))
        .n_calls(0)
        .run(bench1)
        .unwrap_err();
    assert!(matches!(err, Error::ZeroCalls));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn random_starts_must_fit_the_budget() {
    let err = Minimizer::new(line(-2.0, 2.0))
        .n_calls(5)
        .n_random_starts(6)
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::TooManyRandomStarts {
            n_random_starts: 6,
            n_calls: 5
        }
    ));
}

#[test]
fn warm_start_points_must_fit_the_budget() {
    let err = Minimizer::new(line(-2.0, 2.0))
        .n_calls(2)
        .n_random_starts(0)
        .x0(reals(&[0.0, 0.5, 1.0]))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::TooManyInitialPoints { .. }));
}

#[test]
fn no_evaluation_happens_on_invalid_configuration() {
    let mut calls = 0;
    let err = Minimizer::new(line(-2.0, 2.0))
        .n_calls(3)
        .n_random_starts(4)
        .run(|_| {
            calls += 1;
            Ok::<_, Error>(0.0)
        })
        .unwrap_err();
    assert!(matches!(err, Error::TooManyRandomStarts { .. }));
    assert_eq!(calls, 0);
}

#[test]
fn x0_counts_towards_random_starts() {
    let mut opt = Minimizer::new(line(-2.0, 2.0))
        .n_calls(10)
        .n_random_starts(5)
        .x0(reals(&[1.0, -1.0]))
        .random_state(0)
        .n_points(50)
        .build()
        .unwrap();
    let mut phases = Vec::new();
    while !opt.phase().is_terminal() {
        phases.push(opt.phase());
        let x = opt.ask().unwrap();
        let y = bench1(&x).unwrap();
        opt.tell(x, y).unwrap();
    }
    let count = |p: Phase| phases.iter().filter(|&&q| q == p).count();
    assert_eq!(count(Phase::WarmStart), 2);
    assert_eq!(count(Phase::RandomSampling), 3);
    assert_eq!(count(Phase::ModelGuided), 5);
}

#[test]
fn random_search_never_fits_a_model() {
    let result = dummy_minimize(line(-2.0, 2.0), 15, Some(4), &mut [], bench1).unwrap();
    assert_eq!(result.func_vals.len(), 15);
    assert!(result.models.is_empty());
    assert_eq!(result.status, RunStatus::Completed);
    assert!(result.predict(&result.x).unwrap().is_none());
}

#[test]
fn single_call_budget() {
    let result = Minimizer::new(line(-2.0, 2.0))
        .n_calls(1)
        .random_state(9)
        .run(bench1)
        .unwrap();
    assert_eq!(result.func_vals.len(), 1);
    assert_eq!(result.fun, result.func_vals[0]);
}

#[test]
fn invalid_acquisition_parameters_are_rejected() {
    let err = Minimizer::new(line(-2.0, 2.0))
        .acquisition(smbo::acquisition::Acquisition::Lcb { kappa: -1.0 })
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = Minimizer::new(line(-2.0, 2.0))
        .n_points(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { .. }));
}
