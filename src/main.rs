use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use splitflow_config::{JobDef, SchedulerSettings};
use splitflow_scheduler::{JobRun, JobRunner};

/// Splitflow - run a master branch, then fan out sibling branches in parallel
#[derive(Parser)]
#[command(name = "splitflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Log filter used when RUST_LOG is not set
  #[arg(long, global = true, default_value = "info")]
  log_level: String,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a job definition file
  Run {
    /// Path to the job file (JSON)
    job_file: PathBuf,

    #[command(flatten)]
    overrides: SchedulerArgs,
  },

  /// Run the built-in parallel-steps job
  Demo {
    #[command(flatten)]
    overrides: SchedulerArgs,
  },
}

#[derive(clap::Args)]
struct SchedulerArgs {
  /// Maximum number of sibling branches running at once
  #[arg(long)]
  max_concurrent: Option<usize>,

  /// Stop waiting for siblings after this many milliseconds
  #[arg(long)]
  deadline_ms: Option<u64>,
}

impl SchedulerArgs {
  fn settings(&self) -> SchedulerSettings {
    SchedulerSettings {
      max_concurrent_branches: self.max_concurrent,
      deadline_ms: self.deadline_ms,
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  init_tracing(&cli.log_level);

  match cli.command {
    Some(Commands::Run {
      job_file,
      overrides,
    }) => {
      let def = JobDef::load(&job_file)
        .with_context(|| format!("failed to load job file: {}", job_file.display()))?;
      run_job(def, &overrides)?;
    }
    Some(Commands::Demo { overrides }) => {
      run_job(JobDef::parallel_steps(), &overrides)?;
    }
    None => {
      println!("splitflow - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing(default_filter: &str) {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();
}

fn run_job(mut def: JobDef, overrides: &SchedulerArgs) -> Result<()> {
  def.scheduler = def.scheduler.merge(&overrides.settings());

  let rt = tokio::runtime::Runtime::new()?;
  let run = rt.block_on(async { run_job_async(def).await })?;

  // Print the run record as JSON
  println!("{}", serde_json::to_string_pretty(&run)?);

  run.into_result().context("job run failed")?;
  Ok(())
}

async fn run_job_async(def: JobDef) -> Result<JobRun> {
  info!(
    job = %def.name,
    siblings = def.branches.len(),
    "loaded job"
  );

  let runner = JobRunner::from_def(&def).context("failed to build job runner")?;
  Ok(runner.run().await)
}
