use clap::Parser;
use semred::annotate::RuleAnnotator;
use semred::config::Config;
use semred::pipeline::Pipeline;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "semred",
    about = "Semantic reduction: add raw, stopword-filtered and lemmatized text columns to a CSV"
)]
struct Cli {
    /// Input CSV (default: from config or nationality.csv)
    input: Option<PathBuf>,

    /// Output CSV, overwritten if present
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the column holding the text
    #[arg(short, long)]
    text_column: Option<String>,

    /// Rows per batch
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Stop the main pass after this many rows
    #[arg(long)]
    row_cap: Option<usize>,

    /// Rows shown in the sanity-check sample
    #[arg(long)]
    sample_rows: Option<usize>,

    /// Field delimiter (single ASCII character)
    #[arg(long)]
    delimiter: Option<char>,

    /// Keep original letter case
    #[arg(long)]
    no_lowercase: bool,

    /// Drop punctuation tokens from the stopword and lemma columns
    #[arg(long)]
    no_punctuation: bool,

    /// Do not replace URLs with <URL>
    #[arg(long)]
    keep_urls: bool,

    /// Do not replace @mentions with <USER>
    #[arg(long)]
    keep_users: bool,

    /// Do not flatten line breaks
    #[arg(long)]
    keep_newlines: bool,

    /// Apply NFKC Unicode normalization first
    #[arg(long)]
    nfkc: bool,

    /// Skip the sanity-check sample
    #[arg(long)]
    skip_sample: bool,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn load_config(path: &PathBuf) -> Config {
    Config::from_file(path).unwrap_or_else(|e| die(&format!("cannot load {}: {}", path.display(), e)))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config
    let mut config = if let Some(ref config_path) = cli.config {
        load_config(config_path)
    } else {
        let defaults = ["semred.config.json", "config/semred.config.json"];
        let mut loaded = None;
        for p in &defaults {
            let path = PathBuf::from(p);
            if path.is_file() {
                loaded = Some(load_config(&path));
                break;
            }
        }
        loaded.unwrap_or_default()
    };

    // CLI overrides
    if let Some(input) = cli.input {
        config.input = input;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(column) = cli.text_column {
        config.text_column = column;
    }
    if let Some(n) = cli.batch_size {
        config.batch_size = n;
    }
    if cli.row_cap.is_some() {
        config.row_cap = cli.row_cap;
    }
    if let Some(n) = cli.sample_rows {
        config.sample_rows = n;
    }
    if let Some(d) = cli.delimiter {
        config.delimiter = d;
    }
    if cli.no_lowercase {
        config.lowercase = false;
    }
    if cli.no_punctuation {
        config.keep_punctuation = false;
    }
    if cli.keep_urls {
        config.normalize_urls = false;
    }
    if cli.keep_users {
        config.normalize_users = false;
    }
    if cli.keep_newlines {
        config.flatten_newlines = false;
    }
    if cli.nfkc {
        config.unicode_nfkc = true;
    }

    let annotator = RuleAnnotator::new(&config).unwrap_or_else(|e| die(&e.to_string()));
    let pipeline = Pipeline::new(&config, &annotator).unwrap_or_else(|e| die(&e.to_string()));

    if !cli.skip_sample {
        let report = pipeline.sample().unwrap_or_else(|e| die(&e.to_string()));
        println!("\n{}\n", report);
    }

    let summary = pipeline.run().unwrap_or_else(|e| die(&e.to_string()));
    eprintln!(
        "processed {} row(s) in {} batch(es) -> {} ({:.1}s)",
        summary.rows,
        summary.batches,
        summary.output.display(),
        summary.elapsed.as_secs_f64()
    );
}
