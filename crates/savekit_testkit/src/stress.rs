//! Stress tests for savekit.
//!
//! These drive many concurrent saves and loads through one manager and
//! check that every file on disk stays readable.

use savekit_codec::Document;
use savekit_core::SaveManager;
use std::path::Path;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {name} ===");
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of concurrent tasks.
    pub tasks: usize,
    /// Operations per task.
    pub operations: usize,
    /// Top-level keys per saved document.
    pub keys: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            tasks: 8,
            operations: 25,
            keys: 32,
        }
    }
}

impl StressConfig {
    /// A small configuration for unit tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            tasks: 4,
            operations: 5,
            keys: 8,
        }
    }
}

/// Builds the document a writer saves: every key holds `writer`, so a
/// torn write mixing two writers is detectable.
pub fn writer_document(writer: usize, keys: usize) -> Document {
    (0..keys)
        .map(|k| (format!("key{k}"), writer as i64))
        .collect()
}

/// Returns true if every value in `doc` equals the first one.
pub fn is_consistent(doc: &Document) -> bool {
    let mut values = doc.values();
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// Many tasks save and load the same path concurrently.
///
/// Every load must see a complete document written by exactly one writer.
pub async fn stress_same_path(
    manager: &SaveManager,
    path: &Path,
    config: &StressConfig,
) -> StressTestResult {
    let start = Instant::now();
    let mut handles = Vec::with_capacity(config.tasks);

    for writer in 0..config.tasks {
        let manager = manager.clone();
        let path = path.to_path_buf();
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            let doc = writer_document(writer, config.keys);
            let mut ok = 0usize;
            let mut failed = 0usize;
            for _ in 0..config.operations {
                match manager.save(&doc, &path).await {
                    Ok(_) => ok += 1,
                    Err(_) => failed += 1,
                }
                match manager.load_new(&path).await {
                    Ok(seen) if seen.len() == config.keys && is_consistent(&seen) => ok += 1,
                    _ => failed += 1,
                }
            }
            (ok, failed)
        }));
    }

    let mut successful = 0;
    let mut failed = 0;
    for handle in handles {
        match handle.await {
            Ok((ok, bad)) => {
                successful += ok;
                failed += bad;
            }
            Err(_) => failed += config.operations * 2,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Many tasks write rotating saves into one directory.
///
/// Every save must land in its own file.
pub async fn stress_rotating(
    manager: &SaveManager,
    dir: &Path,
    config: &StressConfig,
) -> StressTestResult {
    let start = Instant::now();
    let mut handles = Vec::with_capacity(config.tasks);

    for writer in 0..config.tasks {
        let manager = manager.clone();
        let dir = dir.to_path_buf();
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            let doc = writer_document(writer, config.keys);
            let mut ok = 0usize;
            for _ in 0..config.operations {
                if manager.save_rotating(&doc, &dir, "auto").await.is_ok() {
                    ok += 1;
                }
            }
            (ok, config.operations - ok)
        }));
    }

    let mut successful = 0;
    let mut failed = 0;
    for handle in handles {
        match handle.await {
            Ok((ok, bad)) => {
                successful += ok;
                failed += bad;
            }
            Err(_) => failed += config.operations,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{memory_manager, TempSaves};
    use savekit_core::SaveSettings;
    use savekit_storage::StorageBackend;

    #[test]
    fn writer_documents_are_consistent() {
        let doc = writer_document(3, 5);
        assert_eq!(doc.len(), 5);
        assert!(is_consistent(&doc));
        let mut torn = doc.clone();
        torn.set("key0", 4);
        assert!(!is_consistent(&torn));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn same_path_on_disk() {
        let saves = TempSaves::new();
        let path = saves.path("shared.sav");
        let result = stress_same_path(&saves.manager, &path, &StressConfig::quick()).await;
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, 40);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn rotating_in_memory() {
        let (manager, backend) = memory_manager(SaveSettings::default());
        let config = StressConfig::quick();
        let result = stress_rotating(&manager, Path::new("saves"), &config).await;
        assert_eq!(result.failed_ops, 0);
        let files = backend.list(Path::new("saves"), "sav").unwrap();
        assert_eq!(files.len(), config.tasks * config.operations);
    }
}
