#[path = "../../benches/test_functions.rs"]
#[allow(dead_code)]
mod test_functions;

mod api;
mod ask_tell;
mod budget;
mod determinism;
mod quality;
mod warm_start;

use smbo::space::{Space, Value};

fn line(low: f64, high: f64) -> Space {
    Space::from_bounds(&[(low, high)]).unwrap()
}

fn bench1(x: &[Value]) -> Result<f64, smbo::Error> {
    Ok(test_functions::bench1(&test_functions::reals(x)))
}

fn bench2(x: &[Value]) -> Result<f64, smbo::Error> {
    Ok(test_functions::bench2(&test_functions::reals(x)))
}

fn bench3(x: &[Value]) -> Result<f64, smbo::Error> {
    Ok(test_functions::bench3(&test_functions::reals(x)))
}

fn bench4(x: &[Value]) -> Result<f64, smbo::Error> {
    Ok(test_functions::bench4(x[0].as_str().unwrap_or_default()))
}

fn branin(x: &[Value]) -> Result<f64, smbo::Error> {
    Ok(test_functions::branin(&test_functions::reals(x)))
}

fn hart6(x: &[Value]) -> Result<f64, smbo::Error> {
    Ok(test_functions::hart6(&test_functions::reals(x)))
}

fn reals(values: &[f64]) -> Vec<Vec<Value>> {
    values.iter().map(|&v| vec![Value::Real(v)]).collect()
}
