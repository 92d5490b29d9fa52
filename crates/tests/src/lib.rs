//! # Integration Tests
//!
//! Cross-crate end-to-end tests.
//!
//! Covers:
//! - Contract snapshots
//! - Config file -> logger -> sink round trips
//! - Concurrency properties of the async path (exclusive sink access,
//!   exactly-once error reporting, no stalls)

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_defaults() {
        let config = contracts::LoggerConfig::default();
        assert_eq!(config.sink.sink_type, contracts::SinkType::Stdout);
        assert_eq!(config.dispatch.submission_capacity, 1);
    }
}

#[cfg(test)]
mod mock_sinks {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use contracts::{ContractError, LogSink};

    /// Records the enter/exit instant of every write
    #[derive(Clone, Default)]
    pub struct TimelineSink {
        pub spans: Arc<Mutex<Vec<(Instant, Instant)>>>,
        pub lines: Arc<Mutex<Vec<String>>>,
        active: Arc<AtomicUsize>,
        pub overlapped: Arc<AtomicBool>,
    }

    impl TimelineSink {
        /// True when no two recorded writes overlap in time
        pub fn spans_disjoint(&self) -> bool {
            let mut spans = self.spans.lock().unwrap().clone();
            spans.sort_by_key(|(enter, _)| *enter);
            spans.windows(2).all(|pair| pair[0].1 <= pair[1].0)
        }
    }

    impl LogSink for TimelineSink {
        fn name(&self) -> &str {
            "timeline"
        }

        async fn write(&mut self, buf: &[u8]) -> Result<usize, ContractError> {
            let enter = Instant::now();
            if self.active.fetch_add(1, Ordering::SeqCst) != 0 {
                self.overlapped.store(true, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
            self.lines
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(buf).into_owned());
            self.active.fetch_sub(1, Ordering::SeqCst);
            let exit = Instant::now();
            self.spans.lock().unwrap().push((enter, exit));
            Ok(buf.len())
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    /// Fails every write with an io error naming the rejected line
    #[derive(Default)]
    pub struct RejectingSink;

    impl LogSink for RejectingSink {
        fn name(&self) -> &str {
            "rejecting"
        }

        async fn write(&mut self, buf: &[u8]) -> Result<usize, ContractError> {
            let line = String::from_utf8_lossy(buf);
            Err(ContractError::Io(std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                line.trim_end().to_string(),
            )))
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use alog::{format_message, Alog, ContractError, MemorySink};
    use config_loader::{ConfigFormat, ConfigLoader};
    use tokio::time::timeout;

    use crate::mock_sinks::{RejectingSink, TimelineSink};

    fn has_line_prefix(line: &str) -> bool {
        // "[YYYY-MM-DD HH:MM:SS] - "
        line.len() >= 24
            && line.starts_with('[')
            && &line[20..24] == "] - "
            && is_timestamp(&line[1..20])
    }

    fn is_timestamp(stamp: &str) -> bool {
        stamp.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            10 => c == ' ',
            13 | 16 => c == ':',
            _ => c.is_ascii_digit(),
        })
    }

    /// Config file -> logger -> file on disk
    ///
    /// 1. ConfigLoader reads a TOML file selecting a file sink
    /// 2. Logger is built from it and started
    /// 3. Async and direct messages end up in the file after stop
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_config_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("logs").join("app.log");
        let config_path = dir.path().join("alog.toml");
        std::fs::write(
            &config_path,
            format!(
                "[sink]\nsink_type = \"file\"\npath = {:?}\nappend = false\n\n[dispatch]\nsubmission_capacity = 4\n",
                log_path.display().to_string()
            ),
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(&config_path).unwrap();
        let log = Alog::from_config(&config).await.unwrap();
        log.start().unwrap();

        let sender = log.message_channel();
        for i in 0..50 {
            sender.send(format!("async line {i}")).await.unwrap();
        }
        log.write("direct line").await.unwrap();
        log.stop().await;

        let content = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 51);
        assert!(lines.iter().all(|l| has_line_prefix(l)), "{content}");
        assert!(content.ends_with('\n') && !content.ends_with("\n\n"));

        let snapshot = log.metrics();
        assert_eq!(snapshot.write_count, 51);
        assert_eq!(snapshot.bytes_written, content.len() as u64);
    }

    /// The sink never sees two overlapping writes, whichever path they take
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sink_writes_mutually_exclusive() {
        let sink = TimelineSink::default();
        let probe = sink.clone();
        let log = std::sync::Arc::new(Alog::new(sink));
        log.start().unwrap();

        let mut producers = Vec::new();
        for p in 0..4 {
            let sender = log.message_channel();
            producers.push(tokio::spawn(async move {
                for i in 0..25 {
                    sender.send(format!("p{p} m{i}")).await.unwrap();
                }
            }));
        }
        for d in 0..2 {
            let log = std::sync::Arc::clone(&log);
            producers.push(tokio::spawn(async move {
                for i in 0..10 {
                    log.write(&format!("d{d} m{i}")).await.unwrap();
                }
            }));
        }
        for producer in producers {
            producer.await.unwrap();
        }
        log.stop().await;

        assert_eq!(probe.spans.lock().unwrap().len(), 120);
        assert!(!probe.overlapped.load(std::sync::atomic::Ordering::SeqCst));
        assert!(probe.spans_disjoint());
    }

    /// Every message reaches the sink exactly once; the order it arrives in
    /// is whatever order the write tasks won the sink guard
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_async_path_writes_each_message_once() {
        let sink = TimelineSink::default();
        let probe = sink.clone();
        let log = Alog::new(sink);
        log.start().unwrap();

        let sender = log.message_channel();
        let expected: HashSet<String> = (0..100).map(|i| format!("msg {i}")).collect();
        for msg in &expected {
            sender.send(msg.clone()).await.unwrap();
        }
        log.stop().await;

        let lines = probe.lines.lock().unwrap().clone();
        assert_eq!(lines.len(), 100);
        let seen: HashSet<String> = lines
            .iter()
            .map(|l| l[24..].trim_end().to_string())
            .collect();
        assert_eq!(seen, expected);
    }

    /// An always-failing sink yields exactly one error per async message
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_async_failures_reported_exactly_once() {
        let log = Alog::new(RejectingSink);
        let errors = log.error_channel();
        log.start().unwrap();

        let monitor = tokio::spawn(async move {
            let mut rejected = Vec::new();
            while let Some(err) = errors.recv().await {
                match err {
                    ContractError::Io(e) => {
                        assert_eq!(e.kind(), std::io::ErrorKind::StorageFull);
                        rejected.push(e.to_string());
                    }
                    other => panic!("unexpected error: {other:?}"),
                }
            }
            rejected
        });

        let sender = log.message_channel();
        for i in 0..40 {
            sender.send(format!("doomed {i}")).await.unwrap();
        }
        log.stop().await;

        let rejected = timeout(Duration::from_secs(5), monitor)
            .await
            .expect("error channel never closed")
            .unwrap();
        assert_eq!(rejected.len(), 40);
        for i in 0..40 {
            let suffix = format!("] - doomed {i}");
            assert_eq!(
                rejected.iter().filter(|r| r.ends_with(&suffix)).count(),
                1,
                "{suffix}"
            );
        }
        assert_eq!(log.metrics().failure_count, 40);
    }

    /// Direct write failure comes back verbatim and stays off the channel
    #[tokio::test]
    async fn test_direct_write_failure_verbatim() {
        let log = Alog::new(RejectingSink);
        let errors = log.error_channel();

        let err = log.write("x").await.unwrap_err();

        match err {
            ContractError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::StorageFull);
                assert!(e.to_string().ends_with("] - x"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(errors.is_empty());
    }

    /// Ignoring the error channel under constant failure must not stall
    /// submission
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unmonitored_error_channel_no_stall() {
        let log = Alog::new(RejectingSink);
        log.start().unwrap();

        let sender = log.message_channel();
        let result = timeout(Duration::from_secs(5), async {
            for i in 0..2_000 {
                sender.send(format!("ignored {i}")).await.unwrap();
            }
        })
        .await;
        assert!(result.is_ok(), "submission stalled");

        timeout(Duration::from_secs(5), log.stop())
            .await
            .expect("stop stalled");
        assert_eq!(log.error_channel().len(), 2_000);
    }

    /// Direct writes of a, b, c land in order and correctly formatted
    #[tokio::test]
    async fn test_direct_writes_in_order() {
        let view = MemorySink::new("buffer");
        let log = Alog::new(view.clone());

        let mut total = 0;
        for msg in ["a", "b", "c"] {
            total += log.write(msg).await.unwrap();
        }

        let lines = view.lines();
        assert_eq!(lines.len(), 3);
        for (line, msg) in lines.iter().zip(["a", "b", "c"]) {
            assert!(has_line_prefix(line), "{line}");
            assert_eq!(&line[24..], msg);
        }
        assert_eq!(total, view.len());
        assert!(view.contents().ends_with("c\n"));
        assert!(!view.contents().contains("\n\n"));
    }

    /// Direct write byte count equals the formatted line length
    #[tokio::test]
    async fn test_direct_write_byte_count() {
        let log = Alog::new(MemorySink::default());
        let written = log.write("hello").await.unwrap();
        assert_eq!(written, format_message("hello").len());
    }

    /// Plain threads can feed the logger through blocking sends
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_producers() {
        let view = MemorySink::new("buffer");
        let log = Alog::new(view.clone());
        log.start().unwrap();

        let threads: Vec<_> = (0..3)
            .map(|t| {
                let sender = log.message_channel();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        sender.blocking_send(format!("t{t} {i}")).unwrap();
                    }
                })
            })
            .collect();

        tokio::task::spawn_blocking(move || {
            for thread in threads {
                thread.join().unwrap();
            }
        })
        .await
        .unwrap();
        log.stop().await;

        assert_eq!(view.lines().len(), 30);
    }

    /// JSON config selecting a memory sink with a bounded error queue
    #[tokio::test]
    async fn test_json_config_memory_sink() {
        let config = ConfigLoader::load_from_str(
            r#"{ "sink": { "sink_type": "memory", "name": "capture" },
                 "dispatch": { "error_queue_capacity": 8 } }"#,
            ConfigFormat::Json,
        )
        .unwrap();

        let log = Alog::from_config(&config).await.unwrap();
        log.start().unwrap();
        log.message_channel().send("from json config").await.unwrap();
        log.stop().await;

        assert_eq!(log.name(), "capture");
        assert_eq!(log.metrics().write_count, 1);
    }
}
