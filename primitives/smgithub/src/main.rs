//! smgithub - Daily Commit Limiter
//!
//! Counts today's pushes to `master`/`main` on a GitHub user's public event
//! feed and blocks `github.com` in `/etc/hosts` once the configured daily limit
//! is reached. Under the limit, a previous block is commented out again.
//!
//! Each run is a single check; schedule it with cron or a systemd timer.
//!
//! # Usage
//!
//! ```bash
//! # Write /etc/smgithub.conf (limit defaults to 3)
//! sudo smgithub init --username octocat --limit 5
//!
//! # Check and toggle the block
//! sudo smgithub
//!
//! # Show count and current state without changing anything
//! smgithub status
//! ```
//!
//! # Exit Status
//!
//! - `0` the hosts entry matches the decision (or `init` succeeded)
//! - `1` root is required, or any error (network, config, broken hosts entry)

mod check;
mod config;
mod decision;
mod privilege;

use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hosts_block::{DEFAULT_DOMAIN, DEFAULT_HOSTS_PATH, HostsFile};
use push_events::{DEFAULT_API_BASE, GithubEvents};
use tracing::error;
use tracing_subscriber::EnvFilter;

use check::Check;
use config::{Config, DEFAULT_CONFIG_PATH, DEFAULT_LIMIT};
use privilege::Privilege;

/// Blocks github.com once today's commit count reaches a daily limit.
#[derive(Parser, Debug)]
#[command(name = "smgithub", version)]
#[command(about = "Blocks github.com once today's commit count reaches a daily limit")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Configuration file.
    #[arg(long, global = true, env = "SMGITHUB_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Hosts file to manage.
    #[arg(long, global = true, env = "SMGITHUB_HOSTS", default_value = DEFAULT_HOSTS_PATH)]
    hosts: PathBuf,

    /// Base URL of the GitHub REST API.
    #[arg(long, global = true, env = "SMGITHUB_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Optional GitHub token, raises the anonymous rate limit.
    #[arg(long, global = true, env = "SMGITHUB_GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the configuration file and exit.
    Init {
        /// GitHub username whose public events are counted.
        #[arg(short, long)]
        username: String,

        /// Commits per day before github.com is blocked.
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
    },

    /// Print today's count and the hosts entry state without changing anything.
    Status,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let status_only = match cli.command {
        Some(Command::Init { username, limit }) => {
            let config = Config::new(username, limit)?;
            config.save(&cli.config)?;
            println!("Wrote {}.", cli.config.display());
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Status) => true,
        None => false,
    };

    let config = Config::load(&cli.config)?;
    let source = GithubEvents::new(&cli.api_base, &config.username, cli.token)
        .context("failed to build HTTP client")?;
    let hosts = HostsFile::new(&cli.hosts, DEFAULT_DOMAIN);

    let check = Check {
        config: &config,
        source: &source,
        hosts: &hosts,
        privilege: Privilege::current(),
        today: chrono::Local::now().date_naive(),
        tz: &chrono::Local,
    };
    let mut stdout = io::stdout();

    if status_only {
        check.status(&mut stdout).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = check.enforce(&mut stdout).await?;
    Ok(ExitCode::from(outcome.exit_status()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
