//! # Integration Tests
//!
//! End-to-end tests over the full assembly:
//! plan -> registry -> coordinator -> report.

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::PlanVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        DestinationOutcome, DestinationSelector, TransferBackend, UploadError, UploadRequest,
    };
    use dispatcher::{build_registry, BackendHandle, DispatchCoordinator, TargetRegistry};
    use tokio::time::{sleep, Duration};

    fn payload_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("release.tar.gz");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"artifact bytes").unwrap();
        path
    }

    /// Scripted backend with a spy counter
    struct MockBackend {
        destination: String,
        calls: Arc<AtomicU64>,
        should_fail: bool,
        delay_ms: u64,
    }

    impl MockBackend {
        fn new(destination: &str, calls: Arc<AtomicU64>) -> Self {
            Self {
                destination: destination.to_string(),
                calls,
                should_fail: false,
                delay_ms: 0,
            }
        }

        fn failing(destination: &str, calls: Arc<AtomicU64>) -> Self {
            Self {
                should_fail: true,
                ..Self::new(destination, calls)
            }
        }

        fn delayed(destination: &str, calls: Arc<AtomicU64>, delay_ms: u64) -> Self {
            Self {
                delay_ms,
                ..Self::new(destination, calls)
            }
        }
    }

    impl TransferBackend for MockBackend {
        fn destination(&self) -> &str {
            &self.destination
        }

        async fn transfer(&self, _request: &UploadRequest) -> Result<(), UploadError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.delay_ms > 0 {
                sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.should_fail {
                return Err(UploadError::transfer(&self.destination, "mock failure"));
            }
            Ok(())
        }
    }

    fn registry_of(backends: Vec<MockBackend>) -> TargetRegistry {
        let mut registry = TargetRegistry::new();
        for backend in backends {
            registry.register(BackendHandle::spawn(backend, 4));
        }
        registry
    }

    /// End-to-end run over a plan file: a real dir destination succeeds,
    /// a misconfigured cloud destination reports failed, and the selector
    /// exclusion shows as not attempted.
    #[tokio::test]
    async fn test_e2e_plan_to_report() {
        let work = tempfile::tempdir().unwrap();
        let outbox = work.path().join("outbox");
        let file = payload_file(&work);

        let plan_toml = format!(
            r#"
[[destinations]]
id = "backup"
type = "dir"
path = "{}"

[[destinations]]
id = "dropbox"
type = "dropbox"

[[destinations]]
id = "mirror"
type = "dir"
path = "{}"
"#,
            outbox.display(),
            work.path().join("mirror").display()
        );
        let plan = ConfigLoader::load_from_str(&plan_toml, ConfigFormat::Toml).unwrap();

        let coordinator = DispatchCoordinator::new(build_registry(&plan));
        let request = UploadRequest::new(&file).unwrap();
        let selector = DestinationSelector::only(["backup", "dropbox"]);

        let report = coordinator.run(request, &selector).await.unwrap();

        assert_eq!(report.outcome("backup"), Some(&DestinationOutcome::Succeeded));
        match report.outcome("dropbox").unwrap() {
            DestinationOutcome::Failed { reason } => {
                assert!(reason.contains("token not configured"), "got: {reason}")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            report.outcome("mirror"),
            Some(&DestinationOutcome::NotAttempted)
        );

        // The copy really happened, under the display name (stem)
        assert!(outbox.join("release.tar").exists());

        coordinator.into_registry().shutdown().await;
    }

    /// Default-to-all law: an empty selector targets the whole roster,
    /// and every destination appears exactly once in the report.
    #[tokio::test]
    async fn test_e2e_empty_selector_targets_full_roster() {
        let work = tempfile::tempdir().unwrap();
        let file = payload_file(&work);

        let counters: Vec<Arc<AtomicU64>> =
            (0..3).map(|_| Arc::new(AtomicU64::new(0))).collect();
        let registry = registry_of(vec![
            MockBackend::new("gdrive", Arc::clone(&counters[0])),
            MockBackend::new("dropbox", Arc::clone(&counters[1])),
            MockBackend::new("ftp", Arc::clone(&counters[2])),
        ]);

        let coordinator = DispatchCoordinator::new(registry);
        let request = UploadRequest::new(&file).unwrap();
        let report = coordinator
            .run(request, &DestinationSelector::all())
            .await
            .unwrap();

        assert_eq!(report.len(), 3);
        assert!(report.all_succeeded());
        for counter in &counters {
            assert_eq!(counter.load(Ordering::Relaxed), 1);
        }

        coordinator.into_registry().shutdown().await;
    }

    /// Failure isolation law across the full assembly.
    #[tokio::test]
    async fn test_e2e_failure_isolation() {
        let work = tempfile::tempdir().unwrap();
        let file = payload_file(&work);

        let calls = Arc::new(AtomicU64::new(0));
        let registry = registry_of(vec![
            MockBackend::new("a", Arc::clone(&calls)),
            MockBackend::failing("b", Arc::clone(&calls)),
            MockBackend::new("c", Arc::clone(&calls)),
        ]);

        let coordinator = DispatchCoordinator::new(registry);
        let request = UploadRequest::new(&file).unwrap();
        let report = coordinator
            .run(request, &DestinationSelector::all())
            .await
            .unwrap();

        let (all_succeeded, lines) = report.summarize();
        assert!(!all_succeeded);
        assert_eq!(
            lines,
            vec![
                "A uploaded successfully.",
                "B upload failed.",
                "C uploaded successfully.",
            ]
        );

        coordinator.into_registry().shutdown().await;
    }

    /// Unknown selector ids abort before any backend is invoked.
    #[tokio::test]
    async fn test_e2e_unknown_destination_fails_fast() {
        let work = tempfile::tempdir().unwrap();
        let file = payload_file(&work);

        let calls = Arc::new(AtomicU64::new(0));
        let registry = registry_of(vec![MockBackend::new("a", Arc::clone(&calls))]);

        let coordinator = DispatchCoordinator::new(registry);
        let request = UploadRequest::new(&file).unwrap();
        let err = coordinator
            .run(request, &DestinationSelector::only(["a", "tape"]))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::UnknownDestination { .. }));
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        coordinator.into_registry().shutdown().await;
    }

    /// Report line order equals roster order regardless of which transfer
    /// finishes first.
    #[tokio::test]
    async fn test_e2e_report_order_stable_under_reordered_delays() {
        let work = tempfile::tempdir().unwrap();
        let file = payload_file(&work);

        for delays in [[60, 30, 0], [0, 30, 60]] {
            let registry = registry_of(vec![
                MockBackend::delayed("gdrive", Arc::new(AtomicU64::new(0)), delays[0]),
                MockBackend::delayed("dropbox", Arc::new(AtomicU64::new(0)), delays[1]),
                MockBackend::delayed("ftp", Arc::new(AtomicU64::new(0)), delays[2]),
            ]);

            let coordinator = DispatchCoordinator::new(registry);
            let request = UploadRequest::new(&file).unwrap();
            let report = coordinator
                .run(request, &DestinationSelector::all())
                .await
                .unwrap();

            let (_, lines) = report.summarize();
            assert_eq!(
                lines,
                vec![
                    "Gdrive uploaded successfully.",
                    "Dropbox uploaded successfully.",
                    "Ftp uploaded successfully.",
                ]
            );

            coordinator.into_registry().shutdown().await;
        }
    }

    /// Stateless backends give structurally identical reports run after
    /// run.
    #[tokio::test]
    async fn test_e2e_repeated_runs_identical() {
        let work = tempfile::tempdir().unwrap();
        let file = payload_file(&work);

        let calls = Arc::new(AtomicU64::new(0));
        let registry = registry_of(vec![
            MockBackend::new("a", Arc::clone(&calls)),
            MockBackend::failing("b", Arc::clone(&calls)),
        ]);
        let coordinator = DispatchCoordinator::new(registry);

        let mut reports = Vec::new();
        for _ in 0..3 {
            let request = UploadRequest::new(&file).unwrap();
            reports.push(
                coordinator
                    .run(request, &DestinationSelector::all())
                    .await
                    .unwrap(),
            );
        }

        for pair in reports.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }

        coordinator.into_registry().shutdown().await;
    }
}
