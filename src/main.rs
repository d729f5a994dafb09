use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use csv2matrix::{convert_file, ConvertConfig};

/// Convert a CSV table into a sparse matrix file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated input table
    input: PathBuf,

    /// Matrix file to write; labels go to <OUTPUT>.lbls
    output: PathBuf,

    /// Treat the first record as data instead of a header
    #[arg(long)]
    no_header: bool,

    /// 1-based columns to leave out of the matrix, e.g. `-x 1,9`
    #[arg(short = 'x', long, value_delimiter = ',')]
    exclude: Vec<usize>,

    /// Save the (single) excluded column as a labels file
    #[arg(short, long)]
    save_labels: bool,

    /// Recode saved labels as 0, 1, 2, ... and write a map file
    #[arg(short, long)]
    categorical: bool,

    /// JSON file with base options; flags given here take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn convert_config(&self) -> Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ConvertConfig::default(),
        };
        if self.no_header {
            config.header = false;
        }
        if !self.exclude.is_empty() {
            config.exclude_columns = self.exclude.iter().copied().collect();
        }
        config.save_labels |= self.save_labels;
        config.categorical |= self.categorical;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = args.convert_config()?;
    let summary = convert_file(&args.input, &args.output, &config).with_context(|| {
        format!(
            "converting {} to {}",
            args.input.display(),
            args.output.display()
        )
    })?;

    match &summary.category_map {
        Some(map) => println!(
            "{} rows x {} columns, {} non-zeros, {} labels in {} categories",
            summary.rows,
            summary.effective_cols,
            summary.nonzeros,
            summary.labels_written,
            map.len()
        ),
        None => println!(
            "{} rows x {} columns, {} non-zeros, {} labels",
            summary.rows, summary.effective_cols, summary.nonzeros, summary.labels_written
        ),
    }
    Ok(())
}
