// src/bin/check_dir.rs

use anyhow::{anyhow, Result};
use catalogcheck::{batch, logging, Validator, ValidatorConfig};
use std::{env, path::PathBuf, process, time::Instant};
use tracing::info;

fn main() -> Result<()> {
    logging::init("info");

    // 1) <GLOB> <OUT_DIR> [--config FILE]
    let mut args = env::args().skip(1);
    let mut positional = Vec::new();
    let mut config: Option<PathBuf> = None;
    while let Some(a) = args.next() {
        match a.as_str() {
            "--config" | "-c" => {
                config = Some(PathBuf::from(
                    args.next().ok_or_else(|| anyhow!("missing value for --config"))?,
                ));
            }
            _ => positional.push(a),
        }
    }
    let [pattern, out_dir] = <[String; 2]>::try_from(positional)
        .map_err(|_| anyhow!("usage: check_dir <GLOB> <OUT_DIR> [--config FILE]"))?;

    // 2) collect inputs
    let paths = batch::find_files(&pattern)?;
    if paths.is_empty() {
        return Err(anyhow!("No files match '{}'", pattern));
    }
    info!("{} files to check", paths.len());

    // 3) validate in parallel, then write reports
    let validator = Validator::new(ValidatorConfig::resolve(config.as_deref())?);
    let start = Instant::now();
    let outcomes = batch::check_files(&paths, &validator);
    let summary = batch::write_reports(&PathBuf::from(out_dir), &outcomes)?;

    for f in &summary.files {
        let status = if f.is_valid { "ok" } else { "INVALID" };
        println!("{:<8} {:>5} problem(s)  {}", status, f.problems, f.file);
    }
    println!(
        "→ {} valid, {} invalid in {:?}",
        summary.valid_files,
        summary.invalid_files,
        start.elapsed()
    );

    if !summary.all_valid() {
        process::exit(1);
    }
    Ok(())
}
