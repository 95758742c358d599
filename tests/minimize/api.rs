use smbo::space::{Dimension, Space, Value};
use smbo::surrogate::{BaseEstimator, Prediction, Surrogate, SurrogateKind, Task};
use smbo::{Error, ErrorKind, Minimizer, forest_minimize, gbrt_minimize, minimize};

use super::{bench1, line};

#[derive(Clone, Debug)]
struct Classifier;

impl Surrogate for Classifier {
    fn fit(&mut self, _x: &[Vec<f64>], _y: &[f64]) -> smbo::Result<()> {
        Ok(())
    }

    fn predict(&self, _x: &[f64]) -> Prediction {
        Prediction::default()
    }

    fn task(&self) -> Task {
        Task::Classification
    }

    fn name(&self) -> &str {
        "logistic"
    }

    fn box_clone(&self) -> Box<dyn Surrogate> {
        Box::new(self.clone())
    }
}

#[test]
fn every_estimator_uses_the_whole_budget() {
    for &kind in SurrogateKind::ALL {
        let result = Minimizer::new(line(-2.0, 2.0))
            .n_calls(8)
            .n_random_starts(3)
            .random_state(0)
            .base_estimator(kind)
            .n_points(200)
            .run(bench1)
            .unwrap();
        assert_eq!(result.func_vals.len(), 8, "{kind}");
        assert_eq!(result.x_iters.len(), 8, "{kind}");
        let min = result.func_vals.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(result.fun, min, "{kind}");
        assert_eq!(result.x, result.x_iters[result.best_index().unwrap()]);
        assert_eq!(result.models.len(), 5, "{kind}");
    }
}

#[test]
fn unknown_estimator_names_the_valid_set() {
    let err = Minimizer::new(line(-2.0, 2.0))
        .base_estimator("abc")
        .run(bench1)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEstimator);
    let msg = err.to_string();
    assert!(msg.starts_with("Valid values for the base_estimator parameter"));
    for &kind in SurrogateKind::ALL {
        assert!(msg.contains(kind.as_str()), "{msg}");
    }
}

#[test]
fn non_estimator_value_is_rejected() {
    let err = BaseEstimator::from_any(Box::new(42_i32)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEstimator);
    assert!(
        err.to_string()
            .starts_with("The base_estimator parameter has to either be a string or a regressor")
    );
}

#[test]
fn classifier_is_rejected_with_the_capability_message() {
    let err = Minimizer::new(line(-2.0, 2.0))
        .base_estimator(BaseEstimator::model(Classifier))
        .run(bench1)
        .unwrap_err();
    assert!(matches!(err, Error::EstimatorCapability { .. }));
    assert!(
        err.to_string()
            .starts_with("The base_estimator parameter has to either be a string or a regressor")
    );

    let boxed: Box<dyn Surrogate> = Box::new(Classifier);
    let dynamic = BaseEstimator::from_any(Box::new(boxed)).unwrap();
    assert!(matches!(
        dynamic.resolve(),
        Err(Error::EstimatorCapability { .. })
    ));
}

#[test]
fn estimator_errors_surface_before_the_space_is_used() {
    let constant = |_: &[Value]| Ok::<_, Error>(0.0);

    let err = Minimizer::new(Space::empty())
        .base_estimator("abc")
        .run(constant)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownEstimator { .. }));
    assert!(
        err.to_string()
            .starts_with("Valid values for the base_estimator parameter")
    );

    let err = BaseEstimator::from_any(Box::new(42_i32)).unwrap_err();
    let also = Minimizer::new(Space::empty())
        .base_estimator(BaseEstimator::model(Classifier))
        .run(constant)
        .unwrap_err();
    for err in [err, also] {
        assert_eq!(err.kind(), ErrorKind::InvalidEstimator);
        assert!(
            err.to_string()
                .starts_with("The base_estimator parameter has to either be a string or a regressor"),
            "{err}"
        );
    }
}

#[test]
fn identifiers_are_accepted_dynamically() {
    let named = BaseEstimator::from_any(Box::new("rf")).unwrap();
    assert_eq!(named.resolve().unwrap().name(), "rf");
    let owned = BaseEstimator::from_any(Box::new(String::from("gbrt"))).unwrap();
    assert_eq!(owned.resolve().unwrap().name(), "gbrt");
}

#[test]
fn free_functions_pick_their_surrogate() {
    let result = forest_minimize(line(-2.0, 2.0), 6, Some(1), "rf", &mut [], bench1).unwrap();
    assert_eq!(result.models.last().unwrap().name(), "rf");

    let result = gbrt_minimize(line(-2.0, 2.0), 6, Some(1), &mut [], bench1).unwrap();
    assert_eq!(result.models.last().unwrap().name(), "gbrt");

    let result = minimize(line(-2.0, 2.0), 6, Some(1), &mut [], bench1).unwrap();
    assert_eq!(result.models.last().unwrap().name(), "et");
}

#[test]
fn mixed_space_runs_end_to_end() {
    let space = Space::new(vec![
        Dimension::real(-1.0, 1.0).unwrap(),
        Dimension::integer(0, 4).unwrap(),
        Dimension::categorical(["0", "1", "2"]).unwrap(),
    ])
    .unwrap();
    let result = Minimizer::new(space.clone())
        .n_calls(12)
        .n_random_starts(4)
        .random_state(3)
        .n_points(100)
        .run(|x: &[Value]| {
            let r = x[0].as_f64().unwrap();
            let i = x[1].as_f64().unwrap();
            let c = super::test_functions::bench4(x[2].as_str().unwrap());
            Ok::<_, Error>(r * r + i + c)
        })
        .unwrap();
    assert_eq!(result.func_vals.len(), 12);
    assert!(result.x_iters.iter().all(|p| space.contains(p)));
    let prediction = result.predict(&result.x).unwrap().unwrap();
    assert!(prediction.mean.is_finite());
    assert!(prediction.std >= 0.0);
}

#[test]
fn predict_rejects_points_outside_the_space() {
    let result = minimize(line(-2.0, 2.0), 6, Some(0), &mut [], bench1).unwrap();
    let err = result.predict(&[Value::Real(5.0)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
}

#[cfg(feature = "gp")]
#[test]
fn gp_minimize_finds_the_bowl() {
    let result = smbo::gp_minimize(line(-2.0, 2.0), 15, Some(0), &mut [], bench1).unwrap();
    assert_eq!(result.func_vals.len(), 15);
    assert!(result.fun < 0.1, "fun = {}", result.fun);
}
