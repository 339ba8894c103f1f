use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use criterion::Criterion;
use tokio::runtime::{Builder, Runtime};

use disk_cached::cache::cache_manager::CacheManager;
use disk_cached::cache::config::ConfigBuilder;

/// Defines the total number of distinct keys used by the benchmarks
pub const KEYS: usize = 1024;

pub fn runtime() -> Runtime {
    Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap()
}

/// Creates a cache under a temporary root. The returned `TempDir` must outlive the cache.
pub fn cache_manager(buffer_size: usize) -> (tempfile::TempDir, Arc<CacheManager>) {
    let root = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).buffer_size(buffer_size).build()).unwrap();
    (root, Arc::new(cache))
}

pub fn key(index: u64) -> String {
    format!("key{}", index as usize % KEYS)
}

/// Runs `iterations` invocations of the block split across `task_count` tokio tasks.
pub fn execute_async<F, Fut>(
    criterion: &mut Criterion,
    id: &'static str,
    block: Arc<F>,
    task_count: u64)
    where F: Fn(u64) -> Fut + Send + Sync + 'static,
          Fut: Future<Output=()> + Send + 'static {

    criterion.bench_function(id, |bencher| {
        bencher.to_async(runtime()).iter_custom(|iterations| {
            let block = block.clone();
            async move {
                let per_task_iterations = iterations / task_count + 1;
                let start = Instant::now();

                let handles = (0..task_count).map(|task_id| {
                    let block = block.clone();
                    tokio::spawn(async move {
                        let first = task_id * per_task_iterations;
                        for index in first..first + per_task_iterations {
                            block(index).await;
                        }
                    })
                }).collect::<Vec<_>>();
                for handle in handles {
                    handle.await.unwrap();
                }
                start.elapsed()
            }
        });
    });
}
