//! `go-record`: load game records and write them back out.
//!
//! - `go-record normalize <input> [-o <output>]` - re-emit a record the way
//!   the session writes it (stdout without `-o`)
//! - `go-record inspect <input>` - print the load report as JSON

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use go_record::{ReadPolicy, RecordConfig, Session};
use go_record_worker::{WorkerError, config_from_env, spawn};

#[derive(Parser)]
#[command(name = "go-record")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board size; overrides GO_RECORD_BOARD_SIZE
    #[arg(long, global = true)]
    board_size: Option<u8>,
    /// Komi used when the record has none
    #[arg(long, global = true)]
    komi: Option<f64>,
    /// Fail on the first unusable move instead of skipping it
    #[arg(long, global = true)]
    strict: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a record and write it back in normalized form
    Normalize {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a record and print what the load did
    Inspect { input: PathBuf },
}

impl Cli {
    fn apply(&self, config: &mut RecordConfig) {
        if let Some(size) = self.board_size {
            config.board_size = size;
        }
        if let Some(komi) = self.komi {
            config.komi = komi;
        }
        if self.strict {
            config.read_policy = ReadPolicy::Strict;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "go_record=info,go_record_worker=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), WorkerError> {
    let mut config = config_from_env()?;
    cli.apply(&mut config);
    let session = Session::new(config)?;
    let (worker, join) = spawn(session);

    let result = match cli.command {
        Commands::Normalize { input, output } => {
            worker.load_from_path(input).await?;
            match output {
                Some(path) => worker.save_to_path(path).await,
                None => worker.snapshot_to_text().await.map(|text| println!("{text}")),
            }
        }
        Commands::Inspect { input } => {
            let report = worker.load_from_path(input).await?;
            let json = serde_json::to_string_pretty(&report)?;
            println!("{json}");
            Ok(())
        }
    };

    worker.shutdown()?;
    join.await.map_err(|_| WorkerError::Closed)?;
    result
}
