#[cfg(test)]
mod tests {
    // ── Schema ─────────────────────────────────────────────────

    mod schema {
        use warden_config::SessionConfig;
        use warden_core::Mode;

        fn demo(output_dir: &std::path::Path) -> SessionConfig {
            let mut cfg = SessionConfig::with_output_dir(output_dir.to_path_buf());
            cfg.authorization_doc = "AUTHORIZED TEST (demo)".into();
            cfg.scope.domains = vec!["example.com".into()];
            cfg.scope.hosts = vec!["10.0.0.5".into()];
            cfg.mode = Mode::ExecuteWithApproval;
            cfg
        }

        #[test]
        fn test_json_roundtrip_is_exact() {
            let dir = tempfile::tempdir().unwrap();
            let cfg = demo(dir.path());
            let json = serde_json::to_string_pretty(&cfg).unwrap();
            let restored: SessionConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(restored, cfg);
            // And a second trip produces byte-identical output.
            assert_eq!(serde_json::to_string_pretty(&restored).unwrap(), json);
        }

        #[test]
        fn test_unknown_top_level_field_fails_closed() {
            let raw = r#"{
                "authorization_doc": "x",
                "scope": {},
                "roe": {},
                "output_dir": "/tmp/x",
                "mode": "PLAN_ONLY",
                "kill_switch": "STOP",
                "extra": 1
            }"#;
            assert!(serde_json::from_str::<SessionConfig>(raw).is_err());
        }

        #[test]
        fn test_unknown_scope_field_fails_closed() {
            let raw = r#"{
                "authorization_doc": "x",
                "scope": {"domanis": ["typo.example"]},
                "roe": {},
                "output_dir": "/tmp/x"
            }"#;
            assert!(serde_json::from_str::<SessionConfig>(raw).is_err());
        }

        #[test]
        fn test_invalid_mode_fails_closed() {
            let raw = r#"{
                "authorization_doc": "x",
                "scope": {},
                "roe": {},
                "output_dir": "/tmp/x",
                "mode": "FULL_SEND"
            }"#;
            assert!(serde_json::from_str::<SessionConfig>(raw).is_err());
        }

        #[test]
        fn test_default_scope_allows_relative_root() {
            let cfg = SessionConfig::with_output_dir("/tmp/x".into());
            assert_eq!(cfg.scope.paths, vec![std::path::PathBuf::from(".")]);
        }
    }

    // ── Session store ──────────────────────────────────────────

    mod store {
        use warden_config::{SessionConfig, SessionStore};

        #[test]
        fn test_create_then_load_is_noop() {
            let dir = tempfile::tempdir().unwrap();
            let mut cfg = SessionConfig::with_output_dir(dir.path().to_path_buf());
            cfg.authorization_doc = "demo".into();
            let store = SessionStore::create(cfg.clone()).unwrap();
            drop(store);

            let loaded = SessionStore::load(dir.path()).unwrap();
            assert_eq!(loaded.config(), &cfg);

            // Saving the loaded session changes nothing on disk.
            let before = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
            loaded.save().unwrap();
            let after = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
            assert_eq!(before, after);
        }

        #[test]
        fn test_create_prepares_layout() {
            let dir = tempfile::tempdir().unwrap();
            let cfg = SessionConfig::with_output_dir(dir.path().to_path_buf());
            let store = SessionStore::create(cfg).unwrap();

            assert!(store.logs_dir().is_dir());
            assert!(store.evidence_dir().is_dir());
            assert!(store.journal_path().is_file());
            assert!(store.audit_path().is_file());
        }

        #[test]
        fn test_corrupt_session_rejected_entirely() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("session.json"), "{\"authorization_doc\":").unwrap();
            let err = SessionStore::load(dir.path()).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("session.json"), "got: {msg}");
        }

        #[test]
        fn test_exists() {
            let dir = tempfile::tempdir().unwrap();
            assert!(!SessionStore::exists(dir.path()));
            let cfg = SessionConfig::with_output_dir(dir.path().to_path_buf());
            SessionStore::create(cfg).unwrap();
            assert!(SessionStore::exists(dir.path()));
        }
    }
}
