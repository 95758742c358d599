use core::time::Duration;

use smbo::callback::{
    Callback, DeadlineStopper, Decision, DeltaXStopper, DeltaYStopper, TimerCallback,
};
use smbo::space::{Space, Value};
use smbo::{ErrorKind, Minimizer, OptimizeResult, RunStatus, dummy_minimize};

fn line() -> Space {
    Space::from_bounds(&[(-2.0, 2.0)]).unwrap()
}

fn square(x: &[Value]) -> Result<f64, smbo::Error> {
    Ok(x[0].as_f64().unwrap().powi(2))
}

fn history(func_vals: &[f64]) -> OptimizeResult {
    let x_iters = func_vals
        .iter()
        .map(|&v| vec![Value::Real(v.clamp(-2.0, 2.0))])
        .collect();
    OptimizeResult::from_observations(line(), x_iters, func_vals.to_vec()).unwrap()
}

#[test]
fn timer_records_one_duration_per_call() {
    let mut timer = TimerCallback::new();
    let result = Minimizer::new(line())
        .n_calls(10)
        .random_state(1)
        .callback(&mut timer)
        .run(|x: &[Value]| {
            std::thread::sleep(Duration::from_millis(1));
            square(x)
        })
        .unwrap();
    assert_eq!(result.func_vals.len(), 10);
    assert_eq!(timer.iter_time().len(), 10);
    assert!(timer.iter_time_secs().iter().sum::<f64>() > 0.0);
    assert!(timer.total() >= Duration::from_millis(10));
}

#[test]
fn delta_y_stops_when_the_best_values_agree() {
    let mut stopper = DeltaYStopper::new(0.2, 3).unwrap();
    let result = history(&[0.0, 1.0, 2.0, 3.0, 4.0, 0.1, 0.19]);
    assert_eq!(stopper.after_evaluation(&result), Decision::Stop);
}

#[test]
fn delta_y_continues_while_the_best_values_are_spread() {
    let mut stopper = DeltaYStopper::new(0.2, 3).unwrap();
    let result = history(&[0.0, 1.0, 2.0, 3.0, 4.0, 0.1]);
    assert_eq!(stopper.after_evaluation(&result), Decision::Continue);
}

#[test]
fn delta_y_is_undetermined_with_too_few_values() {
    let mut stopper = DeltaYStopper::new(0.2, 3).unwrap();
    assert_eq!(
        stopper.after_evaluation(&history(&[0.0, 1.0])),
        Decision::Undetermined
    );
}

#[test]
fn delta_y_ends_a_flat_run() {
    let mut stopper = DeltaYStopper::new(0.5, 3).unwrap();
    let result = dummy_minimize(line(), 20, Some(0), &mut [&mut stopper], |_: &[Value]| {
        Ok::<_, smbo::Error>(1.0)
    })
    .unwrap();
    assert_eq!(result.func_vals.len(), 3);
    assert_eq!(result.status, RunStatus::Stopped);
}

#[test]
fn delta_y_requires_at_least_one_best_value() {
    let err = DeltaYStopper::new(0.5, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("n_best"), "{err}");
}

#[test]
fn delta_x_stops_on_repeated_points() {
    let mut stopper = DeltaXStopper::new(0.01);
    let result = Minimizer::new(line())
        .n_calls(10)
        .n_random_starts(0)
        .x0(vec![vec![Value::Real(1.0)], vec![Value::Real(1.0)]])
        .callback(&mut stopper)
        .random_state(0)
        .run(square)
        .unwrap();
    assert_eq!(result.status, RunStatus::Stopped);
    assert_eq!(result.func_vals.len(), 2);
}

#[test]
fn deadline_stops_before_the_budget() {
    let mut deadline = DeadlineStopper::new(Duration::from_millis(40));
    let result = dummy_minimize(line(), 1000, Some(3), &mut [&mut deadline], |x: &[Value]| {
        std::thread::sleep(Duration::from_millis(5));
        square(x)
    })
    .unwrap();
    assert_eq!(result.status, RunStatus::Stopped);
    assert!(result.func_vals.len() < 1000);
    assert!(deadline.remaining() <= Duration::from_millis(40));
}

#[test]
fn several_callbacks_all_run() {
    let mut timer = TimerCallback::new();
    let mut seen = Vec::new();
    let mut record = |r: &OptimizeResult| {
        seen.push(r.func_vals.len());
        Decision::Undetermined
    };
    dummy_minimize(line(), 4, Some(2), &mut [&mut timer, &mut record], square).unwrap();
    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert_eq!(timer.iter_time().len(), 4);
}
