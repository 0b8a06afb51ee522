use std::env;
use std::path::PathBuf;

use pawmatch_eval::{EvaluateOptions, EvaluationEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut run_dir: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--run" => run_dir = args.next().map(PathBuf::from),
            "--out" => out_dir = args.next().map(PathBuf::from),
            _ => {
                if run_dir.is_none() {
                    run_dir = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let run_dir = run_dir.ok_or("missing --run directory")?;

    let engine = EvaluationEngine::new(EvaluateOptions { out_dir });
    let result = engine.run(&run_dir)?;

    println!("metrics_path={}", result.metrics_path.display());
    println!("report_path={}", result.report_path.display());
    Ok(())
}
