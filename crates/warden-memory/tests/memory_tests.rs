#[cfg(test)]
mod tests {
    // ── Journal ────────────────────────────────────────────────

    mod journal {
        use warden_core::{ChatRole, MemoryNote};
        use warden_memory::Journal;

        #[test]
        fn test_append_then_load_roundtrips() {
            let dir = tempfile::tempdir().unwrap();
            let journal = Journal::new(dir.path().join("messages.jsonl"));
            journal.append(&MemoryNote::user("Objective: assess example.com")).unwrap();
            journal
                .append(&MemoryNote::assistant("[]").for_block("CB-1"))
                .unwrap();

            let notes = journal.load(None).unwrap();
            assert_eq!(notes.len(), 2);
            assert_eq!(notes[0].role, ChatRole::User);
            assert_eq!(notes[1].meta.get("block_id").unwrap(), "CB-1");
        }

        #[test]
        fn test_corrupt_lines_are_skipped() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("messages.jsonl");
            std::fs::write(
                &path,
                "{\"role\":\"user\",\"content\":\"ok\"}\nnot json at all\n{\"role\":\"assistant\",\"content\":\"also ok\"}\n",
            )
            .unwrap();
            let notes = Journal::new(path).load(None).unwrap();
            assert_eq!(notes.len(), 2);
        }

        #[test]
        fn test_last_n_returns_most_recent() {
            let dir = tempfile::tempdir().unwrap();
            let journal = Journal::new(dir.path().join("messages.jsonl"));
            for i in 0..10 {
                journal.append(&MemoryNote::user(format!("note {i}"))).unwrap();
            }
            let notes = journal.load(Some(3)).unwrap();
            assert_eq!(notes.len(), 3);
            assert_eq!(notes[0].content, "note 7");
            assert_eq!(notes[2].content, "note 9");
        }

        #[test]
        fn test_missing_file_loads_empty() {
            let dir = tempfile::tempdir().unwrap();
            let journal = Journal::new(dir.path().join("nope.jsonl"));
            assert!(journal.load(None).unwrap().is_empty());
        }
    }

    // ── Audit log ──────────────────────────────────────────────

    mod audit {
        use warden_core::{AuditEvent, EventKind};
        use warden_memory::AuditLog;

        #[test]
        fn test_append_is_one_line_per_event() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("audit.jsonl");
            let log = AuditLog::new(path.clone());
            log.append(&AuditEvent::new(EventKind::Proposal, "proposed CB-1").with_block("CB-1"))
                .unwrap();
            log.append(&AuditEvent::new(EventKind::Exec, "ran CB-1").with_block("CB-1"))
                .unwrap();

            let raw = std::fs::read_to_string(&path).unwrap();
            assert_eq!(raw.lines().count(), 2);
            let events = log.tail(10).unwrap();
            assert_eq!(events[0].kind, EventKind::Proposal);
            assert_eq!(events[1].kind, EventKind::Exec);
        }

        #[test]
        fn test_tail_limits_and_keeps_order() {
            let dir = tempfile::tempdir().unwrap();
            let log = AuditLog::new(dir.path().join("audit.jsonl"));
            for i in 0..5 {
                log.append(&AuditEvent::new(EventKind::Note, format!("n{i}"))).unwrap();
            }
            let events = log.tail(2).unwrap();
            assert_eq!(events.len(), 2);
            assert_eq!(events[0].summary, "n3");
            assert_eq!(events[1].summary, "n4");
        }

        #[test]
        fn test_reader_tolerates_future_fields() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("audit.jsonl");
            std::fs::write(
                &path,
                "{\"ts\":\"2026-08-06T00:00:00Z\",\"type\":\"note\",\"summary\":\"old\",\"new_field\":{\"deep\":true}}\n",
            )
            .unwrap();
            let events = AuditLog::new(path).tail(10).unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].summary, "old");
        }
    }

    // ── Artifact index ─────────────────────────────────────────

    mod retrieval {
        use std::path::Path;
        use warden_memory::{ArtifactIndex, ContextRetrieval};

        async fn seeded_index(root: &Path) -> ArtifactIndex {
            std::fs::create_dir_all(root.join("logs")).unwrap();
            std::fs::write(
                root.join("logs/CB-1_0.out"),
                "HTTP/1.1 200 OK\nServer: nginx\nX-Frame-Options: DENY\n",
            )
            .unwrap();
            std::fs::write(
                root.join("logs/CB-2_0.out"),
                "; <<>> DiG <<>> example.com\nexample.com. 300 IN A 93.184.216.34\n",
            )
            .unwrap();
            std::fs::write(root.join("journal.md"), "notes about tls ciphers\n").unwrap();
            let index = ArtifactIndex::new();
            index.index_session(root).await.unwrap();
            index
        }

        #[tokio::test]
        async fn test_index_counts_documents() {
            let dir = tempfile::tempdir().unwrap();
            let index = seeded_index(dir.path()).await;
            let count = index.index_session(dir.path()).await.unwrap();
            assert_eq!(count, 3);
        }

        #[tokio::test]
        async fn test_search_ranks_by_word_overlap() {
            let dir = tempfile::tempdir().unwrap();
            let index = seeded_index(dir.path()).await;

            let hits = index.search("nginx server headers", 5).await.unwrap();
            assert!(!hits.is_empty());
            assert!(hits[0].source.contains("CB-1_0.out"));
            // Scores descend.
            for pair in hits.windows(2) {
                assert!(pair[0].score >= pair[1].score);
            }
        }

        #[tokio::test]
        async fn test_search_misses_return_empty() {
            let dir = tempfile::tempdir().unwrap();
            let index = seeded_index(dir.path()).await;
            assert!(index.search("zzzqqq", 5).await.unwrap().is_empty());
            assert!(index.search("", 5).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_top_k_bounds_results() {
            let dir = tempfile::tempdir().unwrap();
            let index = seeded_index(dir.path()).await;
            let hits = index.search("example com dig", 1).await.unwrap();
            assert!(hits.len() <= 1);
        }
    }
}
