//! CLI for rangefetch: fetch N bytes by range requests and verify their SHA-256.

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use rangefetch_core::config::{self, RangeFetchConfig};
use rangefetch_core::{
    ChunkPolicy, Completion, CurlRangeSource, ExpectedDigest, RangeFetchVerifier, Verdict,
};
use std::path::PathBuf;

/// Process exit code when the digest does not match.
pub const EXIT_MISMATCH: i32 = 3;

/// Process exit code for fatal errors (config, HTTP, transport).
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for the outcome of [`run`]. Usage errors never get here: clap
/// exits with 2 while parsing.
pub fn exit_code(result: &Result<Verdict>) -> i32 {
    match result {
        Ok(verdict) if verdict.is_match() => 0,
        Ok(_) => EXIT_MISMATCH,
        Err(_) => EXIT_FAILURE,
    }
}

/// Top-level CLI for rangefetch.
#[derive(Debug, Parser)]
#[command(name = "rangefetch")]
#[command(about = "Fetch bytes with HTTP Range requests and verify their SHA-256", long_about = None)]
pub struct Cli {
    /// Number of bytes to download.
    #[arg(value_name = "NUMBER_OF_BYTES", value_parser = clap::value_parser!(u64).range(1..))]
    pub total_bytes: u64,

    /// Expected SHA-256 of the downloaded bytes (64 hex characters, any case).
    #[arg(value_name = "EXPECTED_SHA256")]
    pub expected_sha256: String,

    /// Ask for the whole remaining range in one request instead of fixed-size chunks.
    #[arg(long, conflicts_with = "chunk_size")]
    pub whole: bool,

    /// Bytes per request when fetching in chunks (overrides the config file).
    #[arg(long, value_name = "BYTES", value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: Option<u64>,

    /// Config file to use instead of ~/.config/rangefetch/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over the config file.
    pub fn chunk_policy(&self, cfg: &RangeFetchConfig) -> ChunkPolicy {
        if self.whole {
            ChunkPolicy::Whole
        } else if let Some(size) = self.chunk_size {
            ChunkPolicy::Fixed(size)
        } else {
            cfg.chunk_policy()
        }
    }
}

pub fn run_from_args() -> Result<Verdict> {
    let cli = Cli::parse();
    run(&cli)
}

/// Fetch, print progress and the verification summary, return the verdict.
pub fn run(cli: &Cli) -> Result<Verdict> {
    let cfg = config::load(cli.config.as_deref())?;
    tracing::debug!("loaded config: {:?}", cfg);

    let expected = ExpectedDigest::parse(&cli.expected_sha256);
    if !expected.is_well_formed() {
        eprintln!("warning: expected digest is not a 64-character hex SHA-256; it cannot match");
    }

    let policy = cli.chunk_policy(&cfg);
    tracing::info!(
        "fetching {} bytes from {} ({:?})",
        cli.total_bytes,
        cfg.endpoint,
        policy
    );
    let source = CurlRangeSource::new(cfg.endpoint.clone(), cfg.timeouts());
    let mut verifier = RangeFetchVerifier::new(source, policy);
    let report = verifier
        .fetch_and_verify(cli.total_bytes, &expected, |progress| {
            println!("{}", progress)
        })
        .with_context(|| format!("fetch from {}", cfg.endpoint))?;

    if report.completion == Completion::EndedEarly {
        eprintln!("{}", report::early_end_line(&report));
    }
    for line in report::summary_lines(&report) {
        println!("{}", line);
    }
    Ok(report.verdict)
}
