use sequential_line_search::{Error, Session};

fn seeded() -> Session {
    let mut session = Session::builder(3).seed(9).n_candidates(64).build().unwrap();
    session.proceed_optimization(0.5).unwrap();
    session
}

#[test]
fn test_out_of_range_positions_rejected_without_side_effects() {
    let mut session = seeded();
    let slider = session.slider().clone();
    let x_max = session.x_max().to_vec();
    let y_max = session.y_max();

    for bad in [1.5, -0.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = session.proceed_optimization(bad).unwrap_err();
        assert!(matches!(err, Error::InvalidSliderValue(_)), "{bad}: {err}");

        assert_eq!(session.n_observations(), 1);
        assert_eq!(session.iteration(), 1);
        assert_eq!(session.slider(), &slider);
        assert_eq!(session.x_max(), x_max.as_slice());
        assert_eq!(session.y_max(), y_max);
    }
}

#[test]
fn test_parameters_from_slider_rejects_out_of_range() {
    let session = seeded();
    assert!(matches!(
        session.parameters_from_slider(1.5),
        Err(Error::InvalidSliderValue(v)) if (v - 1.5).abs() < f64::EPSILON
    ));
    assert!(matches!(
        session.parameters_from_slider(-0.1),
        Err(Error::InvalidSliderValue(_))
    ));
}

#[test]
fn test_session_usable_after_rejection() {
    let mut session = seeded();
    assert!(session.proceed_optimization(2.0).is_err());
    session.proceed_optimization(0.25).unwrap();
    assert_eq!(session.n_observations(), 2);
}

#[test]
fn test_error_messages() {
    let err = Session::new(0).unwrap_err();
    assert!(err.to_string().contains("invalid dimension"));

    let session = seeded();
    let err = session.parameters_from_slider(-0.1).unwrap_err();
    assert!(err.to_string().contains("-0.1"));
}
