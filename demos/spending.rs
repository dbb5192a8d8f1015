//! Cross-validated spending predictions with a bootstrap interval.

// cargo run --release --example spending
// cargo run --release --example spending resources/spending.csv 8

use cvboot::{Pipeline, PipelineConfig};
use std::env;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(String::as_str).unwrap_or("resources/spending.csv");
    let num_threads = match args.get(2) {
        Some(s) => s.parse::<usize>()?,
        None => 4,
    };

    for parallel in [false, true] {
        let cfg = PipelineConfig::default()
            .set_num_threads(num_threads)
            .set_parallel(parallel);
        let report = Pipeline::new(cfg).run_csv(path)?;

        println!("parallel: {}", parallel);
        println!("rows: {}, features: {}", report.n_rows, report.n_features);
        for s in &report.fold_summaries {
            println!(
                "  fold {}: rmse {:.2}, mae {:.2}, missing {}",
                s.fold, s.rmse, s.mae, s.missing_predictions
            );
        }
        println!(
            "mean prediction {:.2}, 95% CI [{:.2}, {:.2}]",
            report.interval.estimate, report.interval.lower, report.interval.upper
        );
        println!("cv: {:.3}s, bootstrap: {:.3}s", report.cv_seconds, report.bootstrap_seconds);
    }
    Ok(())
}
