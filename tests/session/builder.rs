use sequential_line_search::acquisition::{AcquisitionFunction, SliderOrigin};
use sequential_line_search::kernel::Kernel;
use sequential_line_search::{Error, Session};

#[test]
fn test_builder_with_all_options() {
    let mut session = Session::builder(2)
        .seed(3)
        .kernel(Kernel::Matern52)
        .signal_variance(1.0)
        .lengthscale(0.3)
        .noise_variance(0.01)
        .btl_scale(0.05)
        .fit_hyperparameters(true)
        .acquisition(AcquisitionFunction::UpperConfidenceBound { kappa: 1.5 })
        .n_candidates(32)
        .enlarge_slider(false)
        .slider_origin(SliderOrigin::MeanMaximizer)
        .build()
        .unwrap();

    session.proceed_optimization(0.5).unwrap();
    session.proceed_optimization(0.2).unwrap();
    let model = session.model().unwrap();
    assert_eq!(model.surrogate().kernel(), Kernel::Matern52);
    assert_eq!(model.params().lengthscales.len(), 2);
}

#[test]
fn test_initial_slider_is_used() {
    let session = Session::builder(2)
        .seed(1)
        .enlarge_slider(false)
        .initial_slider(vec![0.1, 0.2], vec![0.9, 0.8])
        .build()
        .unwrap();
    assert_eq!(session.parameters_from_slider(0.0).unwrap(), vec![0.1, 0.2]);
    assert_eq!(session.parameters_from_slider(1.0).unwrap(), vec![0.9, 0.8]);
}

#[test]
fn test_identical_initial_ends_fall_back_to_opposite_corner() {
    let session = Session::builder(3)
        .seed(1)
        .enlarge_slider(false)
        .initial_slider(vec![0.2, 0.7, 0.5], vec![0.2, 0.7, 0.5])
        .build()
        .unwrap();
    assert_eq!(session.slider().end_1(), &[1.0, 0.0, 0.0]);
}

#[test]
fn test_initial_slider_validation() {
    let err = Session::builder(2)
        .initial_slider(vec![0.1, 0.2, 0.3], vec![0.9, 0.8])
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 2,
            got: 3
        }
    ));

    let err = Session::builder(2)
        .initial_slider(vec![0.1, 0.2], vec![1.2, 0.8])
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::OutOfDomain { index: 0, .. }));
}

#[test]
fn test_invalid_hyperparameters_rejected() {
    let cases = [
        Session::builder(2).lengthscale(0.0).build(),
        Session::builder(2).signal_variance(-1.0).build(),
        Session::builder(2).noise_variance(f64::NAN).build(),
        Session::builder(2).btl_scale(0.0).build(),
        Session::builder(2).n_candidates(0).build(),
        Session::builder(2)
            .acquisition(AcquisitionFunction::UpperConfidenceBound { kappa: -1.0 })
            .build(),
    ];
    for result in cases {
        assert!(matches!(
            result,
            Err(Error::InvalidHyperparameter { .. })
        ));
    }
}

#[test]
fn test_seed_makes_initial_slider_reproducible() {
    let a = Session::with_seed(4, 123).unwrap();
    let b = Session::with_seed(4, 123).unwrap();
    let c = Session::with_seed(4, 124).unwrap();
    assert_eq!(a.slider(), b.slider());
    assert_ne!(a.slider(), c.slider());
}
