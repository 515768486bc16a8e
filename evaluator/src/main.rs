use std::{env, io};

use evaluator::{EvalConfig, EvalInput, Evaluator};
use log::info;

fn main() -> io::Result<()> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "usage: patch-eval <input.json>"))?;

    let config = EvalConfig::from_env()?;
    info!("evaluating {path} with batch size {}", config.batch_size);

    let (dataset, task) = EvalInput::from_path(&path)?.into_parts()?;
    let report = Evaluator::new(config).run(&task, &dataset)?;

    let values = serde_json::to_string_pretty(&report.values()).map_err(io::Error::other)?;
    println!("{values}");

    Ok(())
}
