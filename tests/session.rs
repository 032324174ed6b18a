use regression_lab::{
    config::LabConfig,
    report::{JsonSink, ReportSink},
    session::Session,
    LabError,
};

fn session() -> Session {
    let config = LabConfig::from_json_str(
        r#"{
            "data": { "seed": 7 },
            "training": { "epochs": 100, "learning_rate": 0.1 }
        }"#,
    )
    .unwrap();
    Session::new(config).unwrap()
}

#[test]
fn full_cycle_reports_to_a_sink() {
    let mut session = session();
    let mut sink = JsonSink::new(Vec::new());

    let run = session.train().unwrap().clone();
    sink.training_run(&run).unwrap();
    let evaluation = session.predict_unseen().unwrap().clone();
    sink.evaluation(&evaluation).unwrap();

    let weight_error = run.parameter_error(2.0, 1.0).weight;
    assert!(weight_error < 0.3, "weight error {weight_error}");
    assert!(evaluation.r2() > 0.9, "r2 {}", evaluation.r2());
    assert_eq!(evaluation.inputs().len(), 20);
    assert_eq!(evaluation.bands().total(), 20);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert!(out.lines().all(|line| line.starts_with("{\"kind\":")));
}

#[test]
fn reset_forgets_the_model() {
    let mut session = session();
    session.train().unwrap();
    assert!(session.predict_one(3.0).is_ok());

    session.reset();

    assert!(matches!(session.predict_one(3.0), Err(LabError::NotTrained)));
    assert!(matches!(session.predict_unseen(), Err(LabError::NotTrained)));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut config = LabConfig::default();
    config.training.learning_rate = -0.1;
    assert!(matches!(
        Session::new(config),
        Err(LabError::ConfigurationError(_))
    ));
}
