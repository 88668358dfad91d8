#![allow(
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

mod basics;
mod builder;
mod convergence;
mod rejection;
mod replay;

/// Closest point to `target` on the current slider, as a slider position.
pub(crate) fn project(session: &sequential_line_search::Session, target: &[f64]) -> f64 {
    let a = session.parameters_from_slider(0.0).unwrap();
    let b = session.parameters_from_slider(1.0).unwrap();
    let d: Vec<f64> = b.iter().zip(&a).map(|(b, a)| b - a).collect();
    let proj: f64 = d
        .iter()
        .zip(target.iter().zip(&a))
        .map(|(d, (t, a))| d * (t - a))
        .sum();
    let len_sq: f64 = d.iter().map(|d| d * d).sum();
    (proj / len_sq).clamp(0.0, 1.0)
}

pub(crate) fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
