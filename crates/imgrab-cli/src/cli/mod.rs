//! CLI for the imgrab batch image downloader.

mod prompt;
mod run;

use anyhow::Result;
use clap::Parser;
use imgrab_core::config::{self, Input};
use std::path::PathBuf;

/// Download a batch of images from the configured endpoint.
#[derive(Debug, Parser)]
#[command(name = "imgrab")]
#[command(about = "imgrab: parallel image batch downloader", long_about = None)]
pub struct Cli {
    /// Path to the JSON input file (keys: Count, Parallelism, SavePath).
    #[arg(long, default_value = "Input.json", value_name = "FILE")]
    pub input: PathBuf,

    /// Number of images to download (overrides the input file).
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,

    /// Maximum parallel downloads (overrides the input file).
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Output directory (overrides the input file).
    #[arg(long, value_name = "DIR")]
    pub save_path: Option<String>,

    /// Clear an existing output directory without asking.
    #[arg(long)]
    pub yes: bool,
}

impl Cli {
    /// Resolve the run input: complete flag overrides first, then the JSON
    /// file (with partial overrides applied), then the interactive prompt.
    fn resolve_input(&self) -> Input {
        if let (Some(count), Some(parallelism), Some(save_path)) =
            (self.count, self.jobs, self.save_path.clone())
        {
            let input = Input {
                count,
                parallelism,
                save_path,
            };
            if input.is_valid() {
                return input;
            }
        }

        if let Some(mut input) = Input::load_from_path(&self.input) {
            if let Some(count) = self.count {
                input.count = count;
            }
            if let Some(parallelism) = self.jobs {
                input.parallelism = parallelism;
            }
            if let Some(save_path) = &self.save_path {
                input.save_path = save_path.clone();
            }
            if input.is_valid() {
                return input;
            }
        }

        println!("{} is not a valid input.", self.input.display());
        println!("Entering custom prompt mode.");
        prompt::prompt_for_input()
    }
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    let input = cli.resolve_input();
    run::run_batch_command(&cfg, &input, cli.yes).await
}
