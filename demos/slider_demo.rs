//! Simulated user: drive a session toward a known target.
//!
//! Each iteration reads the two slider ends, answers with the point on the
//! slider closest to the target, and finally prints the best estimate.
//!
//! Run with: `cargo run --example slider_demo`

use sequential_line_search::prelude::*;

fn main() -> sequential_line_search::Result<()> {
    let target = [0.1, 0.2, 0.3, 0.4, 0.5];
    println!("target: {target:?}");

    let mut sls = SessionHandle::new();
    sls.init(target.len())?;

    for _ in 0..10 {
        let a = sls.get_parameters_from_slider(0.0)?;
        let b = sls.get_parameters_from_slider(1.0)?;
        println!("{a:.3?} {b:.3?}");

        // proj = <b - a, target - a>, len_sq = |b - a|^2
        let d: Vec<f64> = b.iter().zip(&a).map(|(b, a)| b - a).collect();
        let proj: f64 = d
            .iter()
            .zip(target.iter().zip(&a))
            .map(|(d, (t, a))| d * (t - a))
            .sum();
        let len_sq: f64 = d.iter().map(|d| d * d).sum();

        let x = (proj / len_sq).clamp(0.0, 1.0);
        println!("{x:.3}");
        sls.proceed_optimization(x)?;
    }

    println!("best: {:.3?}", sls.get_x_max()?);
    Ok(())
}

