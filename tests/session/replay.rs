use sequential_line_search::Session;
use sequential_line_search::preference::PreferenceModel;

use super::project;

const POSITIONS: [f64; 6] = [0.5, 0.1, 0.9, 0.35, 1.0, 0.0];

#[test]
fn test_same_seed_and_feedback_reproduce_the_session() {
    let mut a = Session::builder(3).seed(77).n_candidates(64).build().unwrap();
    let mut b = Session::builder(3).seed(77).n_candidates(64).build().unwrap();
    for t in POSITIONS {
        a.proceed_optimization(t).unwrap();
        b.proceed_optimization(t).unwrap();
        assert_eq!(a.slider(), b.slider());
        assert_eq!(a.x_max(), b.x_max());
    }
    assert_eq!(a.model().unwrap().latent(), b.model().unwrap().latent());
}

#[test]
fn test_posterior_is_a_function_of_the_history() {
    let mut session = Session::builder(2).seed(8).n_candidates(64).build().unwrap();
    for t in POSITIONS {
        session.proceed_optimization(t).unwrap();
    }
    let model = session.model().unwrap();
    let data = session.preference_data();
    let config = sequential_line_search::preference::RegressorConfig::default();
    let refit = PreferenceModel::fit(&data, 2, &config).unwrap();
    assert_eq!(refit.latent(), model.latent());
    for x in [[0.1, 0.1], [0.5, 0.9], [0.8, 0.3]] {
        assert_eq!(refit.predict(&x), model.predict(&x));
    }
}

#[test]
fn test_rejected_calls_do_not_disturb_replay() {
    let target = [0.6, 0.2];
    let mut clean = Session::with_seed(2, 5).unwrap();
    let mut noisy = Session::with_seed(2, 5).unwrap();
    for _ in 0..4 {
        let t = project(&clean, &target);
        clean.proceed_optimization(t).unwrap();
        assert!(noisy.proceed_optimization(-1.0).is_err());
        noisy.proceed_optimization(t).unwrap();
    }
    assert_eq!(clean.x_max(), noisy.x_max());
    assert_eq!(clean.slider(), noisy.slider());
}
