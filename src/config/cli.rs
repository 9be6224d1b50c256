use crate::config::toml_config::AppConfig;
use crate::core::formats::PuzzleFormat;
use crate::domain::model::{PuzzleId, PuzzleRequest, SourceKind};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "nonogram-fetch")]
#[command(about = "Download nonogram puzzles from webpbn.com and nonograms.org as NON or XML")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines instead of compact text
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Save the puzzle to `<output-path>/<id>.<format>`
    Download(FetchArgs),
    /// Print the puzzle file to stdout
    Content(FetchArgs),
}

impl Command {
    pub fn args(&self) -> &FetchArgs {
        match self {
            Command::Download(args) | Command::Content(args) => args,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Puzzle id on the selected source
    pub id: u64,

    #[arg(long, value_enum, default_value_t = SourceKind::Webpbn)]
    pub source: SourceKind,

    #[arg(long, value_enum, default_value_t = PuzzleFormat::Non)]
    pub format: PuzzleFormat,

    /// Ask webpbn to append the intended solution
    #[arg(long)]
    pub include_solution: bool,

    /// Output directory, overrides `output.path`
    #[arg(long)]
    pub output_path: Option<String>,

    /// WebDriver endpoint used for nonograms.org, overrides `nonograms_org.webdriver_url`
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

impl FetchArgs {
    pub fn request(&self) -> PuzzleRequest {
        PuzzleRequest {
            id: PuzzleId(self.id),
            source: self.source,
            format: self.format,
            include_solution: self.include_solution,
        }
    }

    /// Command line values win over the configuration file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.nonograms_org.webdriver_url = url.clone();
        }
    }
}
