use sequential_line_search::Session;

use super::{distance, project};

fn run(target: &[f64], iterations: usize, seed: u64) -> (f64, f64) {
    let mut session = Session::builder(target.len())
        .seed(seed)
        .n_candidates(128)
        .build()
        .unwrap();
    let initial = distance(session.x_max(), target);
    for _ in 0..iterations {
        let t = project(&session, target);
        session.proceed_optimization(t).unwrap();
    }
    assert_eq!(session.n_observations(), iterations);
    (initial, distance(session.x_max(), target))
}

#[test]
fn test_converges_toward_target_in_two_dimensions() {
    let target = [0.3, 0.7];
    let (initial, last) = run(&target, 30, 42);
    assert!(last < 0.15, "distance after 30 iterations: {last} (initial {initial})");
}

#[test]
fn test_converges_to_target_in_five_dimensions() {
    let target = [0.1, 0.2, 0.3, 0.4, 0.5];
    for seed in 0..5 {
        let mut session = Session::with_seed(target.len(), seed).unwrap();
        for _ in 0..50 {
            let t = project(&session, &target);
            session.proceed_optimization(t).unwrap();
        }
        let last = distance(session.x_max(), &target);
        assert!(last < 0.05, "seed {seed}: distance after 50 iterations: {last}");
    }
}

#[test]
fn test_best_estimate_never_moves_away_from_target() {
    let target = [0.25, 0.75, 0.5];
    let mut session = Session::builder(3).seed(5).n_candidates(64).build().unwrap();
    let mut best = f64::INFINITY;
    for _ in 0..15 {
        let t = project(&session, &target);
        session.proceed_optimization(t).unwrap();
        let d = distance(session.x_max(), &target);
        assert!(d <= best + 1e-9, "distance grew from {best} to {d}");
        best = d;
    }
}
