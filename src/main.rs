use anyhow::{anyhow, Result};
use catalogcheck::{
    logging,
    source::{self, Source},
    OutputFormat, Validator, ValidatorConfig,
};
use reqwest::Client;
use std::{env, path::PathBuf, process};
use tracing::{error, info};

const USAGE: &str = "\
usage: catalogcheck <SOURCE> [--format text|json|yaml] [--config FILE]
                    [--quoted] [--strict-urls] [--require-rows]

SOURCE is a file path, an http(s) URL, or - for stdin.
Exit status: 0 valid, 1 problems found, 2 error.";

#[derive(Debug, Default)]
struct Args {
    source: Option<String>,
    format: OutputFormat,
    config: Option<PathBuf>,
    quoted: bool,
    strict_urls: bool,
    require_rows: bool,
}

fn parse_args(mut it: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--format" | "-f" => {
                args.format = it
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --format"))?
                    .parse()?;
            }
            "--config" | "-c" => {
                let v = it.next().ok_or_else(|| anyhow!("missing value for --config"))?;
                args.config = Some(PathBuf::from(v));
            }
            "--quoted" => args.quoted = true,
            "--strict-urls" => args.strict_urls = true,
            "--require-rows" => args.require_rows = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            s if s.starts_with('-') && s != "-" => return Err(anyhow!("unknown flag: {}", s)),
            _ if args.source.is_none() => args.source = Some(a.clone()),
            _ => return Err(anyhow!("unexpected argument: {}", a)),
        }
    }
    Ok(args)
}

fn build_config(args: &Args) -> Result<ValidatorConfig> {
    let mut cfg = ValidatorConfig::resolve(args.config.as_deref())?;
    if args.quoted {
        cfg.tokenizer = catalogcheck::TokenizerMode::Quoted;
    }
    if args.strict_urls {
        cfg.url_check = catalogcheck::UrlCheck::Strict;
    }
    if args.require_rows {
        cfg.require_data_rows = true;
    }
    Ok(cfg)
}

async fn run() -> Result<bool> {
    let args = parse_args(env::args().skip(1))?;
    let raw = args
        .source
        .as_deref()
        .ok_or_else(|| anyhow!("missing SOURCE\n\n{}", USAGE))?;
    let src = Source::parse(raw)?;
    let validator = Validator::new(build_config(&args)?);

    let text = source::load(&Client::new(), &src).await?;
    let result = validator.validate(&text);
    print!("{}", result.render(args.format)?);
    if args.format != OutputFormat::Text {
        println!();
    }

    info!(source = %src, valid = result.is_valid, "done");
    Ok(result.is_valid)
}

#[tokio::main]
async fn main() {
    logging::init("info");

    let code = match run().await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            2
        }
    };
    process::exit(code);
}
