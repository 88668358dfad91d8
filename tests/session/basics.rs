use sequential_line_search::{Error, Session, Warning};

fn seeded(dim: usize) -> Session {
    Session::builder(dim).seed(42).n_candidates(64).build().unwrap()
}

#[test]
fn test_x_max_has_session_dimension() {
    for dim in 1..=8 {
        let session = Session::new(dim).unwrap();
        assert_eq!(session.x_max().len(), dim);
        assert_eq!(session.dimension(), dim);
        for v in session.x_max() {
            assert!((0.0..=1.0).contains(v));
        }
    }
}

#[test]
fn test_zero_dimensions_rejected() {
    assert!(matches!(Session::new(0), Err(Error::InvalidDimension(0))));
    assert!(matches!(
        Session::with_seed(0, 1),
        Err(Error::InvalidDimension(0))
    ));
}

#[test]
fn test_slider_boundaries_map_to_ends() {
    let mut session = seeded(4);
    for t in [0.0, 0.3, 1.0] {
        let a = session.parameters_from_slider(0.0).unwrap();
        let b = session.parameters_from_slider(1.0).unwrap();
        assert_eq!(a, session.slider().end_0());
        assert_eq!(b, session.slider().end_1());
        assert_ne!(a, b, "slider ends must differ");
        session.proceed_optimization(t).unwrap();
    }
}

#[test]
fn test_slider_interpolates_linearly() {
    let session = seeded(3);
    let a = session.parameters_from_slider(0.0).unwrap();
    let b = session.parameters_from_slider(1.0).unwrap();
    let mid = session.parameters_from_slider(0.25).unwrap();
    for i in 0..3 {
        let expected = 0.75 * a[i] + 0.25 * b[i];
        assert!((mid[i] - expected).abs() < 1e-12);
    }
}

#[test]
fn test_read_operations_are_idempotent() {
    let mut session = seeded(5);
    session.proceed_optimization(0.4).unwrap();

    let x1 = session.x_max().to_vec();
    let x2 = session.x_max().to_vec();
    assert_eq!(x1, x2);

    let p1 = session.parameters_from_slider(0.7).unwrap();
    let p2 = session.parameters_from_slider(0.7).unwrap();
    assert_eq!(p1, p2);
    assert_eq!(session.n_observations(), 1);
}

#[test]
fn test_each_valid_step_adds_exactly_one_observation() {
    let mut session = seeded(3);
    for (i, t) in [0.0, 1.0, 0.5, 0.999, 0.001, 0.0, 1.0].into_iter().enumerate() {
        session.proceed_optimization(t).unwrap();
        assert_eq!(session.n_observations(), i + 1);
        assert_eq!(session.iteration(), i + 1);
        assert!((session.observations()[i].position() - t).abs() < f64::EPSILON);
    }
}

#[test]
fn test_observation_history_is_append_only() {
    let mut session = seeded(2);
    session.proceed_optimization(0.2).unwrap();
    let first = session.observations()[0].clone();
    session.proceed_optimization(0.8).unwrap();
    session.proceed_optimization(0.6).unwrap();
    assert_eq!(session.observations()[0], first);
}

#[test]
fn test_slider_stays_in_unit_box() {
    let mut session = seeded(3);
    for t in [1.0, 1.0, 0.0, 1.0, 0.5] {
        session.proceed_optimization(t).unwrap();
        for v in session.slider().end_0().iter().chain(session.slider().end_1()) {
            assert!((0.0..=1.0).contains(v), "slider component {v} outside [0, 1]");
        }
        for v in session.x_max() {
            assert!((0.0..=1.0).contains(v));
        }
    }
}

#[test]
fn test_x_max_is_latest_choice_under_consistent_feedback() {
    let mut session = seeded(2);
    for t in [0.6, 0.4, 0.7] {
        let chosen = session.parameters_from_slider(t).unwrap();
        session.proceed_optimization(t).unwrap();
        let dist: f64 = chosen
            .iter()
            .zip(session.x_max())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(dist < 1e-9, "x_max {:?} should be the chosen point {chosen:?}", session.x_max());
    }
}

#[test]
fn test_single_dimension_session() {
    let mut session = seeded(1);
    for _ in 0..10 {
        let t = super::project(&session, &[0.8]);
        session.proceed_optimization(t).unwrap();
    }
    assert_eq!(session.x_max().len(), 1);
    assert!((session.x_max()[0] - 0.8).abs() < 0.05, "x_max = {:?}", session.x_max());
}

#[test]
fn test_singular_covariance_reported_through_session_warnings() {
    let mut session = Session::builder(2)
        .seed(3)
        .n_candidates(32)
        .lengthscale(1e9)
        .noise_variance(1e-20)
        .build()
        .unwrap();
    assert!(session.warnings().is_empty());

    session.proceed_optimization(0.5).unwrap();
    assert_eq!(session.n_observations(), 1);
    assert!(
        session
            .warnings()
            .iter()
            .any(|w| matches!(w, Warning::NumericalInstability { .. })),
        "warnings: {:?}",
        session.warnings()
    );
    assert!(session.warnings()[0].to_string().contains("jitter"));
    assert_eq!(session.warnings(), session.model().unwrap().warnings());
}

#[test]
fn test_default_session_has_no_warnings() {
    let mut session = seeded(3);
    session.proceed_optimization(0.3).unwrap();
    assert!(session.warnings().is_empty());
}
