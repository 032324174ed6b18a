use std::{env, io};

use anyhow::Context;
use log::{info, warn};

use regression_lab::{
    comparison::ComparisonRunner,
    config::LabConfig,
    data::DataGenerator,
    report::{JsonSink, LogSink, ReportSink},
    session::Session,
    training::ModelTrainer,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1) {
        Some(path) => LabConfig::from_path(&path)
            .with_context(|| format!("failed to load the config at {path}"))?,
        None => {
            info!("no config given, using the defaults");
            LabConfig::default()
        }
    };

    let mut log_sink = LogSink::new();
    let mut json_sink = JsonSink::new(io::stdout().lock());
    let mut sinks: [&mut dyn ReportSink; 2] = [&mut log_sink, &mut json_sink];

    let mut session = Session::new(config.clone())?;

    if let Err(e) = session.predict_one(config.data.x_max) {
        warn!("{e}, train the model first");
    }

    let run = session.train().context("training failed")?.clone();
    for sink in sinks.iter_mut() {
        sink.training_run(&run)?;
    }

    let error = run.parameter_error(config.data.slope, config.data.intercept);
    info!(
        "learned y = {:.4}x + {:.4}, weight error {:.4}, bias error {:.4}",
        run.parameters().weight,
        run.parameters().bias,
        error.weight,
        error.bias
    );
    if let Some(r2) = session.training_r2() {
        info!("training accuracy (r2): {:.2}%", r2 * 100.0);
    }

    let evaluation = session.predict_unseen()?.clone();
    for sink in sinks.iter_mut() {
        sink.evaluation(&evaluation)?;
    }

    let point = session.predict_one(config.data.eval_x_max)?;
    info!(
        "x = {} -> predicted {:.4}, expected {:.4}, error {:.4}",
        point.input, point.predicted, point.expected, point.abs_error
    );
    session.reset();

    let data = &config.data;
    let mut generator = match data.seed {
        Some(seed) => DataGenerator::seeded(seed),
        None => DataGenerator::from_entropy(),
    };
    let training_set =
        generator.generate_training_set(data.train_samples, data.line(), data.x_max, data.noise)?;
    let evaluation_set =
        generator.generate_evaluation_set(data.eval_samples, data.line(), data.eval_x_max)?;

    let trainer = ModelTrainer::new(config.training.trainer_options(data.seed))?;
    let runner = ComparisonRunner::new(trainer, config.comparison.mode);
    let report = runner
        .run_with_evaluation(
            &config.comparison.run_configs(),
            &training_set,
            &evaluation_set,
            config.training.epochs,
        )
        .context("learning rate comparison failed")?;

    for sink in sinks.iter_mut() {
        sink.comparison(&report)?;
    }

    Ok(())
}
