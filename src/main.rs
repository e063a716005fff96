use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{error, LevelFilter};

use textmetrics::{
    evaluate_all_blocking, EvalConfig, EvalFiles, LocalFiles, Metric, SubwordScheme,
    DEFAULT_SUBWORD_MARKER,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Score generated text with BLEU, distinct-n and entropy", long_about = None)]
struct Cli {
    /// Reference text, one sentence per line
    #[arg(long, value_name = "PATH", default_value = "reference.tsv")]
    reference_file: PathBuf,

    /// Generated text, line-aligned with the reference
    #[arg(long, value_name = "PATH", default_value = "hypothesis.tsv")]
    hypothesis_file: PathBuf,

    /// Training corpus of source<TAB>target lines, used by entropy
    #[arg(long, value_name = "PATH", default_value = "train.tsv")]
    train_corpus_file: PathBuf,

    /// Marker stripped from every line after subword reversion
    #[arg(long, default_value = DEFAULT_SUBWORD_MARKER)]
    subword_token: String,

    /// Subword segmentation to revert (bpe or spm)
    #[arg(long)]
    subword_option: Option<SubwordScheme>,

    /// Comma-separated metrics
    #[arg(long, default_value = "bleu-1,bleu-2,bleu-3,bleu-4,distinct-1,distinct-2,entropy")]
    metrics: String,

    /// Maximum number of metrics scored at once
    #[arg(long, default_value_t = 16)]
    threads: usize,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    quiet: u8,
}

fn init_logging(verbose: u8, quiet: u8) {
    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let metrics = Metric::parse_list(&cli.metrics).context("invalid --metrics")?;
    let config = EvalConfig::new()
        .with_subword_marker(cli.subword_token)
        .with_subword_scheme(cli.subword_option)
        .with_metrics(metrics)
        .with_workers(cli.threads);
    let files = EvalFiles::new(cli.reference_file, cli.hypothesis_file)
        .with_train_corpus(cli.train_corpus_file);

    let results = evaluate_all_blocking(&config, &files, Arc::new(LocalFiles))
        .context("unable to run metrics")?;

    let mut scores: Vec<String> = vec![];
    let mut failures = 0;
    for (metric, result) in results {
        match result {
            Ok(score) => {
                println!("\n\t{} -> {}", metric, score.aggregate);
                scores.push(score.aggregate.to_string());
            }
            Err(e) => {
                error!("{}: {}", metric, e);
                scores.push("NaN".to_string());
                failures += 1;
            }
        }
    }
    println!("\n{}", scores.join("\t"));

    if failures > 0 {
        bail!("{} metric(s) failed", failures);
    }
    Ok(())
}
