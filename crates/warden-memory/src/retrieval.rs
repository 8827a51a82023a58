use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use warden_core::Result;

/// One ranked piece of context returned by a retrieval backend.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub score: f64,
    pub source: String,
    pub text: String,
}

/// The Context Retrieval Service contract: ranked text snippets for a
/// query over prior session artifacts. The only ordering guarantee is
/// descending score. Backends may be remote and slow; a failed call must
/// never corrupt session state.
#[async_trait]
pub trait ContextRetrieval: Send + Sync {
    /// (Re-)index the artifacts under a session root. Returns how many
    /// documents the index now holds.
    async fn index_session(&self, root: &Path) -> Result<usize>;

    /// Top `top_k` snippets for the query, best first.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<Snippet>>;
}

/// Session artifact files and directories worth indexing.
const ARTIFACT_PATHS: &[&str] = &[
    "logs",
    "evidence",
    "journal.md",
    "audit.jsonl",
    "memory/messages.jsonl",
];

/// Files larger than this are skipped rather than loaded whole.
const MAX_FILE_BYTES: u64 = 5_000_000;

/// Target chunk size; files are split on line boundaries near this size.
const CHUNK_BYTES: usize = 1024;

struct Doc {
    source: String,
    text: String,
}

/// Local retrieval backend: chunks session artifacts and ranks them by
/// query-word overlap. Deliberately simple — ranking quality is a
/// replaceable concern, the contract is what matters.
#[derive(Default)]
pub struct ArtifactIndex {
    docs: RwLock<Vec<Doc>>,
}

impl ArtifactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn gather(root: &Path) -> Vec<Doc> {
        let mut docs = Vec::new();
        for rel in ARTIFACT_PATHS {
            let path = root.join(rel);
            if path.is_file() {
                Self::add_file(&mut docs, root, &path);
            } else if path.is_dir() {
                for entry in WalkDir::new(&path)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                {
                    Self::add_file(&mut docs, root, entry.path());
                }
            }
        }
        docs
    }

    fn add_file(docs: &mut Vec<Doc>, root: &Path, path: &Path) {
        let Ok(meta) = path.metadata() else { return };
        if meta.len() > MAX_FILE_BYTES {
            return;
        }
        let Ok(raw) = std::fs::read_to_string(path) else {
            return;
        };
        if raw.trim().is_empty() {
            return;
        }
        let source = path
            .strip_prefix(root)
            .unwrap_or(path)
            .display()
            .to_string();
        for chunk in chunk_lines(&raw) {
            docs.push(Doc {
                source: source.clone(),
                text: chunk,
            });
        }
    }
}

/// Split text on line boundaries into chunks of roughly `CHUNK_BYTES`.
fn chunk_lines(raw: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in raw.lines() {
        if !current.is_empty() && current.len() + line.len() > CHUNK_BYTES {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl ContextRetrieval for ArtifactIndex {
    async fn index_session(&self, root: &Path) -> Result<usize> {
        let docs = Self::gather(root);
        let count = docs.len();
        *self.docs.write() = docs;
        debug!(count, root = %root.display(), "session artifacts indexed");
        Ok(count)
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<Snippet>> {
        let query_lower = query.to_lowercase();
        let words: Vec<&str> = query_lower
            .split_whitespace()
            .filter(|w| w.len() >= 2)
            .collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let docs = self.docs.read();
        let mut hits: Vec<Snippet> = docs
            .iter()
            .filter_map(|doc| {
                let text_lower = doc.text.to_lowercase();
                let matched = words.iter().filter(|w| text_lower.contains(**w)).count();
                if matched == 0 {
                    return None;
                }
                Some(Snippet {
                    score: matched as f64 / words.len() as f64,
                    source: doc.source.clone(),
                    text: doc.text.clone(),
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        Ok(hits)
    }
}
