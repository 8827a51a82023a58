use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use warden_config::Scope;

// Extraction order is priority order: URLs first, then bare hostnames,
// then bare IPv4 addresses.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})").unwrap());
static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})\b").unwrap());
static IP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:(?:\d{1,3}\.){3}\d{1,3})\b").unwrap());

/// Scope verdict for one raw command string.
#[derive(Debug, Clone)]
pub struct ScopeCheck {
    pub in_scope: bool,
    pub reason: String,
}

impl ScopeCheck {
    fn ok() -> Self {
        Self {
            in_scope: true,
            reason: "in scope".into(),
        }
    }

    fn fail(reason: String) -> Self {
        Self {
            in_scope: false,
            reason,
        }
    }
}

/// Decide whether every target and absolute path a command references is
/// covered by the session scope.
///
/// The check is opt-in: a command that references no extractable network
/// target and no absolute path is in scope by default, so local
/// introspection commands (`id`, `whoami`, …) always pass.
pub fn check_scope(scope: &Scope, cmd: &str) -> ScopeCheck {
    let targets = extract_targets(cmd);

    if !targets.is_empty() {
        let denied: Vec<&String> = targets
            .iter()
            .filter(|t| scope.out_of_scope.iter().any(|d| d == *t))
            .collect();
        if let Some(first) = denied.first() {
            // Denylist precedence: an explicit out-of-scope entry wins
            // even when the same target also appears in an allow set.
            return ScopeCheck::fail(format!("target {first} is explicitly out of scope"));
        }

        let any_allowed = targets.iter().any(|t| {
            scope
                .domains
                .iter()
                .any(|d| t == d || t.ends_with(&format!(".{d}")))
                || scope.hosts.iter().any(|h| h == t)
        });
        if !any_allowed {
            return ScopeCheck::fail(format!(
                "no referenced target is in allowed scope: {}",
                targets.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
    }

    // Absolute paths must resolve under an allowed root; relative paths
    // are always permitted.
    for raw in extract_absolute_paths(cmd) {
        let resolved = normalize(Path::new(&raw));
        let under_allowed_root = scope.paths.iter().any(|root| {
            let root = normalize(root);
            resolved.starts_with(&root)
        });
        if !under_allowed_root {
            return ScopeCheck::fail(format!(
                "absolute path {raw} is not under an allowed root"
            ));
        }
    }

    ScopeCheck::ok()
}

/// Candidate network targets referenced by the command text.
fn extract_targets(cmd: &str) -> BTreeSet<String> {
    let mut targets = BTreeSet::new();
    for caps in URL_RE.captures_iter(cmd) {
        targets.insert(caps[1].to_string());
    }
    for caps in HOST_RE.captures_iter(cmd) {
        targets.insert(caps[1].to_string());
    }
    for m in IP_RE.find_iter(cmd) {
        targets.insert(m.as_str().to_string());
    }
    targets
}

/// Tokens that start at the path root. Falls back to whitespace splitting
/// when shell tokenization fails.
fn extract_absolute_paths(cmd: &str) -> Vec<String> {
    let tokens = shlex::split(cmd)
        .unwrap_or_else(|| cmd.split_whitespace().map(str::to_string).collect());
    tokens.into_iter().filter(|t| t.starts_with('/')).collect()
}

/// Resolve symlinks when the path exists; otherwise fold `.`/`..`
/// segments lexically so a nonexistent path still normalizes.
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
