use chrono::Utc;
use std::fs;
use tracing::info;

use warden_config::{SessionConfig, SessionStore};
use warden_core::{CommandBlock, Result, WardenError};

/// Atomically persist the proposed-blocks file: a JSON array of block
/// records, written to a temp sibling and renamed into place.
pub fn write_blocks(store: &SessionStore, blocks: &[CommandBlock]) -> Result<()> {
    let path = store.blocks_path();
    let body = serde_json::to_string_pretty(blocks)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &body)?;
    fs::rename(&tmp, &path)?;
    info!(count = blocks.len(), path = %path.display(), "proposed blocks written");
    Ok(())
}

/// Read the proposed-blocks file back for approval or execution.
pub fn load_blocks(store: &SessionStore) -> Result<Vec<CommandBlock>> {
    let path = store.blocks_path();
    if !path.is_file() {
        return Err(WardenError::Session(format!(
            "no proposed blocks found at {} — run `warden propose` first",
            path.display()
        )));
    }
    let raw = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Deterministic read-only recon blocks for everything in scope: DNS,
/// WHOIS, and an HTTP HEAD probe per domain; HEAD probes per host. Used
/// by `warden propose` — no model involved.
pub fn propose_recon_blocks(cfg: &SessionConfig) -> Vec<CommandBlock> {
    let stamp = Utc::now().format("%Y%m%d");
    let mut blocks = Vec::new();
    let mut seq = 1usize;

    for domain in &cfg.scope.domains {
        let mut block = CommandBlock::new(
            format!("CB-{stamp}-{seq:03}"),
            format!("DNS/WHOIS/HEAD for {domain}"),
            vec![
                format!("dig +short {domain}"),
                format!("whois {domain}"),
                format!("curl -I --max-time 10 https://{domain}"),
            ],
        );
        block.scope_check = format!("{domain} is in scope domains");
        block.expected_observation =
            "Resolved A/AAAA records; registrar metadata; HTTP server headers".into();
        blocks.push(block);
        seq += 1;
    }

    for host in &cfg.scope.hosts {
        let mut block = CommandBlock::new(
            format!("CB-{stamp}-{seq:03}"),
            format!("HEAD probes for host {host}"),
            vec![
                format!("curl -I --max-time 10 http://{host}"),
                format!("curl -I --max-time 10 https://{host}"),
            ],
        );
        block.scope_check = format!("{host} is in scope hosts");
        block.expected_observation = "HTTP status line and response headers".into();
        blocks.push(block);
        seq += 1;
    }

    blocks
}
