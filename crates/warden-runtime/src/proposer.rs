use serde_json::Value;
use tracing::{debug, warn};

use warden_config::SessionConfig;
use warden_core::{ChatMessage, ChatRole, CommandBlock, MemoryNote, Result, RiskTier};
use warden_llm::{extract_block_array, Proposer};
use warden_memory::{ContextRetrieval, Journal};

/// Journal notes handed to the proposer each cycle.
const RECENT_NOTES: usize = 50;
/// Journal notes scanned when falling back to history recovery.
const HISTORY_NOTES: usize = 500;
/// Retrieval snippets attached to a proposal request.
const CONTEXT_SNIPPETS: usize = 4;
/// Characters of each snippet shown to the proposer.
const SNIPPET_CHARS: usize = 500;

/// The instruction that defines the proposer contract: a JSON array of
/// command-block objects and nothing else.
pub fn build_system_prompt(cfg: &SessionConfig) -> String {
    format!(
        "You are a safe-by-design security research copilot operating in {} mode. \
         Stay inside the authorized scope and rules of engagement. Propose read-only \
         commands first.\n\
         Output format: return ONLY a JSON array of command blocks (no markdown \
         fences, no prose). Each block must include keys: id, intent, scope_check, \
         commands (array of strings), expected_observation, risk.\n\
         Example: [ {{\"id\":\"1\",\"intent\":\"...\",\"scope_check\":\"...\",\
         \"commands\":[\"cmd\"],\"expected_observation\":\"...\",\"risk\":\"low\"}} ].\n\
         Await approval before execution. Iterate until the objective is met.",
        cfg.mode
    )
}

/// Coerce one raw proposer object into a [`CommandBlock`], tolerating the
/// usual model sloppiness: a missing id, a single command given as a bare
/// string, risk spelled `"Low:"` or `"med"`.
pub fn normalize_block(raw: &Value, idx: usize) -> CommandBlock {
    let id = raw["id"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("AI-{idx:03}"));

    let commands = match &raw["commands"] {
        Value::Array(items) => items
            .iter()
            .map(|c| match c {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(single) => vec![single.clone()],
        _ => Vec::new(),
    };

    let risk_raw = raw["risk"].as_str().unwrap_or("low").trim().to_lowercase();
    let risk = if risk_raw.starts_with("med") {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };

    let mut block = CommandBlock::new(id, text_field(raw, "intent"), commands);
    block.scope_check = text_field(raw, "scope_check");
    block.expected_observation = text_field(raw, "expected_observation");
    block.risk = risk;
    if let Value::Array(items) = &raw["preconditions"] {
        block.preconditions = items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
    }
    if let Some(rollback) = raw["rollback"].as_str() {
        if !rollback.is_empty() {
            block.rollback = rollback.to_string();
        }
    }
    block
}

fn text_field(raw: &Value, key: &str) -> String {
    raw[key].as_str().unwrap_or_default().to_string()
}

/// Ask the proposer for the next batch of blocks.
///
/// Recovery is layered cheapest-first: one retry with an explicit
/// correction, then a scan of recent history for the last parseable
/// batch, then an empty result — the loop decides what to do with
/// nothing. A proposer transport failure is treated the same as an
/// unparseable reply; it never propagates.
pub async fn propose_blocks(
    proposer: &dyn Proposer,
    journal: &Journal,
    retrieval: Option<&dyn ContextRetrieval>,
    cfg: &SessionConfig,
    objective: &str,
) -> Result<Vec<CommandBlock>> {
    let mut messages = vec![ChatMessage::system(build_system_prompt(cfg))];
    for note in journal.load(Some(RECENT_NOTES))? {
        messages.push(ChatMessage::from(&note));
    }
    if let Some(snippets) = gather_context(retrieval, objective).await {
        messages.push(ChatMessage::system(snippets));
    }
    messages.push(ChatMessage::user(format!(
        "Objective: {objective}. Propose the next safe step as a JSON array of blocks."
    )));

    let mut data = match proposer.chat(&messages).await {
        Ok(text) => {
            journal.append(&MemoryNote::assistant(text.as_str()))?;
            extract_block_array(&text)
        }
        Err(e) => {
            warn!(error = %e, "proposer call failed");
            None
        }
    };

    if data.is_none() {
        debug!("reply not parseable, retrying with correction");
        let correction = vec![
            ChatMessage::system(build_system_prompt(cfg)),
            ChatMessage::user(
                "Your previous reply was not valid JSON. Return ONLY a JSON array of \
                 blocks as specified.",
            ),
        ];
        data = match proposer.chat(&correction).await {
            Ok(text) => {
                journal.append(&MemoryNote::assistant(text.as_str()))?;
                extract_block_array(&text)
            }
            Err(e) => {
                warn!(error = %e, "proposer retry failed");
                None
            }
        };
    }

    if data.is_none() {
        debug!("retry exhausted, scanning history for the last valid batch");
        for note in journal.load(Some(HISTORY_NOTES))?.iter().rev() {
            if note.role != ChatRole::Assistant {
                continue;
            }
            if let Some(recovered) = extract_block_array(&note.content) {
                data = Some(recovered);
                break;
            }
        }
    }

    let blocks = data
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, raw)| normalize_block(raw, i + 1))
        .collect();
    Ok(blocks)
}

/// Best-effort retrieval context. A failed or empty search attaches
/// nothing; the failure is logged, never fatal.
async fn gather_context(
    retrieval: Option<&dyn ContextRetrieval>,
    objective: &str,
) -> Option<String> {
    let retrieval = retrieval?;
    match retrieval.search(objective, CONTEXT_SNIPPETS).await {
        Ok(hits) if !hits.is_empty() => {
            let parts: Vec<String> = hits
                .iter()
                .map(|h| {
                    let text: String = h.text.chars().take(SNIPPET_CHARS).collect();
                    format!("Source: {}\n{}", h.source, text)
                })
                .collect();
            Some(format!(
                "Relevant context from prior artifacts:\n\n{}",
                parts.join("\n\n")
            ))
        }
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "context retrieval failed, proposing without it");
            None
        }
    }
}
