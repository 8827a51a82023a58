use warden_core::RiskTier;

/// Substrings that force the conservative verdict no matter what else the
/// command looks like. Matched case-insensitively against the whole
/// command string, before any tokenization.
const DENY_PATTERNS: &[&str] = &[
    "rm -rf",
    "mkfs",
    "dd of=/dev",
    "reboot",
    "shutdown",
    "nc -e",
    "bash -i >&",
    "chmod -r 777 /",
];

/// Binaries that cannot mutate target state when invoked as the head of a
/// command. curl and wget are listed but only reachable through their
/// metadata-only special cases below.
const READONLY_BINARIES: &[&str] = &[
    "echo", "cat", "head", "tail", "ls", "stat", "file", "strings", "sha256sum", "curl", "wget",
    "dig", "nslookup", "whois", "openssl",
];

/// Risk verdict for one raw command string.
#[derive(Debug, Clone)]
pub struct Classification {
    pub risk: RiskTier,
    /// Whether the command is incapable of mutating target state and is
    /// therefore eligible for automatic execution in AUTO_READONLY mode.
    pub read_only_ok: bool,
    /// Set when a deny pattern matched; approval can never override it.
    pub denied_pattern: Option<String>,
    pub reason: String,
}

impl Classification {
    fn denied(pattern: &str) -> Self {
        Self {
            risk: RiskTier::Medium,
            read_only_ok: false,
            denied_pattern: Some(pattern.to_string()),
            reason: format!("denied pattern: {pattern}"),
        }
    }

    fn low(reason: String) -> Self {
        Self {
            risk: RiskTier::Low,
            read_only_ok: true,
            denied_pattern: None,
            reason,
        }
    }

    fn medium(reason: String) -> Self {
        Self {
            risk: RiskTier::Medium,
            read_only_ok: false,
            denied_pattern: None,
            reason,
        }
    }
}

/// Classify a raw command string. Pure and deterministic: the same input
/// always yields the same verdict.
///
/// Order matters — the deny-pattern scan runs first and is never
/// overridden, even when the head token sits on the read-only allowlist.
pub fn classify(cmd: &str) -> Classification {
    let lowered = cmd.trim().to_lowercase();
    for pattern in DENY_PATTERNS {
        if lowered.contains(pattern) {
            return Classification::denied(pattern);
        }
    }

    let head = head_token(cmd);

    // Network fetchers are read-only only in their metadata-only forms.
    if head == "curl" {
        if cmd.contains(" -I") || cmd.contains(" --head") {
            return Classification::low("curl with --head/-I (metadata only)".into());
        }
        return Classification::medium(
            "curl without --head/-I is not read-only safe by default".into(),
        );
    }
    if head == "wget" {
        if cmd.contains(" --spider") {
            return Classification::low("wget --spider (metadata only)".into());
        }
        return Classification::medium(
            "wget without --spider is not read-only safe by default".into(),
        );
    }

    if READONLY_BINARIES.contains(&head.as_str()) {
        return Classification::low(format!("{head} is on the read-only allowlist"));
    }

    let what = if head.is_empty() { "command" } else { &head };
    Classification::medium(format!("{what} requires approval"))
}

/// Leading token under shell-word-splitting semantics, falling back to
/// naive whitespace splitting when the command does not tokenize (e.g. an
/// unterminated quote).
fn head_token(cmd: &str) -> String {
    match shlex::split(cmd) {
        Some(parts) => parts.into_iter().next().unwrap_or_default(),
        None => cmd
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_pattern_beats_allowlisted_head() {
        // `echo` is allowlisted, but the payload contains a deny pattern.
        let c = classify("echo harmless; rm -rf /var");
        assert_eq!(c.risk, RiskTier::Medium);
        assert!(!c.read_only_ok);
        assert_eq!(c.denied_pattern.as_deref(), Some("rm -rf"));
    }

    #[test]
    fn deny_match_is_case_insensitive() {
        let c = classify("RM -RF /tmp/x");
        assert!(c.denied_pattern.is_some());
    }

    #[test]
    fn curl_head_flag_is_readonly() {
        let c = classify("curl -I https://example.com");
        assert_eq!(c.risk, RiskTier::Low);
        assert!(c.read_only_ok);
    }

    #[test]
    fn bare_curl_needs_approval() {
        let c = classify("curl https://example.com");
        assert_eq!(c.risk, RiskTier::Medium);
        assert!(!c.read_only_ok);
        assert!(c.denied_pattern.is_none());
    }

    #[test]
    fn wget_spider_is_readonly() {
        assert!(classify("wget --spider https://example.com").read_only_ok);
        assert!(!classify("wget https://example.com/a.tar.gz").read_only_ok);
    }

    #[test]
    fn allowlisted_binary_is_low() {
        let c = classify("dig +short example.com");
        assert_eq!(c.risk, RiskTier::Low);
        assert!(c.read_only_ok);
    }

    #[test]
    fn unknown_binary_defaults_to_medium() {
        let c = classify("nmap -sV 10.0.0.1");
        assert_eq!(c.risk, RiskTier::Medium);
        assert!(!c.read_only_ok);
        assert!(c.reason.contains("requires approval"));
    }

    #[test]
    fn unterminated_quote_falls_back_to_whitespace_split() {
        // shlex fails on the dangling quote; the head must still resolve.
        let c = classify("ls \"unterminated");
        assert_eq!(c.risk, RiskTier::Low);
    }

    #[test]
    fn empty_command_requires_approval() {
        let c = classify("   ");
        assert_eq!(c.risk, RiskTier::Medium);
        assert!(c.reason.contains("command requires approval"));
    }

    #[test]
    fn classification_is_deterministic() {
        let a = classify("curl https://example.com");
        let b = classify("curl https://example.com");
        assert_eq!(a.risk, b.risk);
        assert_eq!(a.reason, b.reason);
    }
}
