use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use warden_config::SecretVault;
use warden_core::{Result, WardenError};
use warden_llm::OpenAiProposer;
use warden_memory::{ArtifactIndex, AuditLog, ContextRetrieval};
use warden_runtime::{execute_approved_block, load_blocks, propose_recon_blocks, write_blocks,
    ProposalLoop};

use crate::approval::ConsoleApproval;
use crate::setup;

const DEFAULT_SESSION_DIR: &str = "./warden-session";
const API_KEY_NAME: &str = "OPENAI_API_KEY";

/// Warden — mode-gated, scope-checked command execution with an audit trail
#[derive(Parser)]
#[command(name = "warden", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Session output directory
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the session setup wizard (or load the existing session)
    Init,
    /// Show the session at a glance
    Status,
    /// Write deterministic read-only recon blocks for the session scope
    Propose,
    /// Mark a proposed block as approved
    Approve {
        /// Block id from proposed_blocks.json
        block_id: String,
    },
    /// Execute an approved block through the guard pipeline
    Exec {
        /// Block id from proposed_blocks.json
        block_id: String,
        /// Per-command timeout in seconds
        #[arg(short, long, default_value = "20")]
        timeout: u64,
    },
    /// Run the proposer-driven loop: propose → approve → execute → iterate
    Run {
        /// Objective to pursue (e.g. "assess host 10.0.0.1")
        #[arg(short = 'g', long)]
        objective: String,
        /// Proposer model name
        #[arg(long, default_value = "gpt-5")]
        model: String,
    },
    /// Store the proposer API key in the secret vault
    KeyInit {
        /// Key value; prompted for when omitted
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Index session artifacts for retrieval
    Index,
    /// Search indexed session artifacts
    Search {
        query: String,
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },
    /// Show recent audit log entries
    Logs {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Output raw JSON lines
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or("info")
        };
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
            )
            .with_target(false)
            .init();

        let root = self
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR));

        match self.command {
            Commands::Init => {
                let store = setup::load_or_init(&root)?;
                println!("{} {}", style("Session ready:").green(), store.root().display());
                Ok(())
            }
            Commands::Status => cmd_status(&root),
            Commands::Propose => cmd_propose(&root),
            Commands::Approve { block_id } => cmd_approve(&root, &block_id),
            Commands::Exec { block_id, timeout } => cmd_exec(&root, &block_id, timeout).await,
            Commands::Run { objective, model } => cmd_run(&root, &objective, &model).await,
            Commands::KeyInit { api_key } => cmd_key_init(api_key),
            Commands::Index => cmd_index(&root).await,
            Commands::Search { query, top_k } => cmd_search(&root, &query, top_k).await,
            Commands::Logs { limit, json } => cmd_logs(&root, limit, json),
        }
    }
}

fn cmd_status(root: &std::path::Path) -> Result<()> {
    let store = setup::load_or_init(root)?;
    let cfg = store.config();
    println!("{}", style("Session").bold());
    println!("  mode:        {}", cfg.mode);
    println!("  output dir:  {}", cfg.output_dir.display());
    println!("  domains:     {}", cfg.scope.domains.join(", "));
    println!("  hosts:       {}", cfg.scope.hosts.join(", "));
    println!(
        "  paths:       {}",
        cfg.scope
            .paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  out of scope:{}", cfg.scope.out_of_scope.join(", "));
    println!("  kill switch: {}", cfg.kill_switch);
    Ok(())
}

fn cmd_propose(root: &std::path::Path) -> Result<()> {
    let store = setup::load_or_init(root)?;
    let blocks = propose_recon_blocks(store.config());
    if blocks.is_empty() {
        println!("Scope has no domains or hosts — nothing to propose.");
        return Ok(());
    }
    write_blocks(&store, &blocks)?;

    println!("{}", style("Proposed command blocks").bold());
    for block in &blocks {
        println!("  {} — {}", style(&block.id).cyan(), block.intent);
        for cmd in &block.commands {
            println!("      {cmd}");
        }
    }
    println!(
        "{} {}",
        style("Saved:").green(),
        store.blocks_path().display()
    );
    Ok(())
}

fn cmd_approve(root: &std::path::Path, block_id: &str) -> Result<()> {
    let store = setup::load_or_init(root)?;
    // Only known blocks can be approved.
    let blocks = load_blocks(&store)?;
    if !blocks.iter().any(|b| b.id == block_id) {
        return Err(WardenError::Session(format!(
            "block id {block_id} not found in {}",
            store.blocks_path().display()
        )));
    }
    std::fs::write(store.approval_marker(block_id), "approved")?;
    println!("{} {}", style("Approved:").green(), block_id);
    Ok(())
}

async fn cmd_exec(root: &std::path::Path, block_id: &str, timeout_secs: u64) -> Result<()> {
    let store = setup::load_or_init(root)?;
    let blocks = load_blocks(&store)?;
    let block = blocks
        .iter()
        .find(|b| b.id == block_id)
        .ok_or_else(|| WardenError::Session(format!("block id {block_id} not found")))?;

    println!(
        "{} {} — {}",
        style("Executing").cyan(),
        style(&block.id).bold(),
        block.intent
    );
    let obs = execute_approved_block(&store, block, Duration::from_secs(timeout_secs)).await?;

    println!(
        "{} {} exit={} bytes={}",
        style("Observation").bold(),
        obs.block_id,
        obs.exit_code,
        obs.bytes_out
    );
    for line in obs.key_lines.iter().take(40) {
        println!("{line}");
    }
    println!(
        "{} {}",
        style("Logs saved under").green(),
        store.logs_dir().display()
    );
    Ok(())
}

async fn cmd_run(root: &std::path::Path, objective: &str, model: &str) -> Result<()> {
    let store = setup::load_or_init(root)?;

    let api_key = SecretVault::new().get(API_KEY_NAME)?.ok_or_else(|| {
        WardenError::Secret("proposer API key not found — run `warden key-init` first".into())
    })?;
    let proposer = Arc::new(OpenAiProposer::new(api_key, model.to_string()));

    let retrieval = Arc::new(ArtifactIndex::new());
    retrieval.index_session(store.root()).await?;

    let summary = ProposalLoop::new(&store, proposer, Arc::new(ConsoleApproval))
        .with_retrieval(retrieval)
        .run(objective)
        .await?;

    if summary.objective_met {
        println!("{}", style("Objective complete.").green());
    } else if summary.aborted {
        println!("{}", style("Session aborted.").red());
    } else {
        println!("{}", style("Loop ended without completion.").yellow());
    }
    println!(
        "  cycles={} executed={} skipped={}",
        summary.cycles, summary.blocks_executed, summary.blocks_skipped
    );
    Ok(())
}

fn cmd_key_init(api_key: Option<String>) -> Result<()> {
    let key = match api_key {
        Some(k) => k,
        None => dialoguer::Password::new()
            .with_prompt("Proposer API key")
            .interact()
            .map_err(|e| WardenError::Secret(format!("key prompt failed: {e}")))?,
    };
    let backend = SecretVault::new().set(API_KEY_NAME, &key)?;
    println!(
        "{} stored via {} backend",
        style("API key").green(),
        backend.as_str()
    );
    Ok(())
}

async fn cmd_index(root: &std::path::Path) -> Result<()> {
    let store = setup::load_or_init(root)?;
    let index = ArtifactIndex::new();
    let count = index.index_session(store.root()).await?;
    println!("{} {} documents", style("Indexed").green(), count);
    Ok(())
}

async fn cmd_search(root: &std::path::Path, query: &str, top_k: usize) -> Result<()> {
    let store = setup::load_or_init(root)?;
    let index = ArtifactIndex::new();
    index.index_session(store.root()).await?;
    let hits = index.search(query, top_k).await?;
    if hits.is_empty() {
        println!("No matches for: {query}");
        return Ok(());
    }
    println!("{}", style(format!("Results for: {query}")).bold());
    for hit in hits {
        let snippet: String = hit.text.chars().take(200).collect();
        println!(
            "  {:.4}  {}  {}",
            hit.score,
            style(hit.source).cyan(),
            snippet.replace('\n', " ")
        );
    }
    Ok(())
}

fn cmd_logs(root: &std::path::Path, limit: usize, json: bool) -> Result<()> {
    let store = setup::load_or_init(root)?;
    let events = AuditLog::new(store.audit_path()).tail(limit)?;
    for event in events {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!(
                "{}  {:<11}  {}  {}",
                event.ts.format("%Y-%m-%d %H:%M:%S"),
                format!("{:?}", event.kind).to_lowercase(),
                event.block_id.as_deref().unwrap_or("-"),
                event.summary
            );
        }
    }
    Ok(())
}
