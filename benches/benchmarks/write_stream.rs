use std::sync::Arc;

use criterion::{Criterion, criterion_group};

use crate::benchmarks::common::{cache_manager, execute_async, key};

/// Defines the size of every payload written by the benchmark
const PAYLOAD_SIZE: usize = 16 * 1024;

/// Defines the chunk size used for moving a payload to the file
const BUFFER_SIZE: usize = 1024;

#[cfg(not(tarpaulin_include))]
pub fn write_stream_single_task(criterion: &mut Criterion) {
    write_stream(criterion, "CacheManager.write_stream() | 1 task", 1);
}

#[cfg(not(tarpaulin_include))]
pub fn write_stream_8_tasks(criterion: &mut Criterion) {
    write_stream(criterion, "CacheManager.write_stream() | 8 tasks", 8);
}

fn write_stream(criterion: &mut Criterion, id: &'static str, task_count: u64) {
    let (_root, cache) = cache_manager(BUFFER_SIZE);
    let payload = Arc::new(vec![7u8; PAYLOAD_SIZE]);

    let block = move |index| {
        let cache = cache.clone();
        let payload = payload.clone();

        async move {
            cache.write_stream(&key(index), payload.to_vec()).await.unwrap();
        }
    };
    execute_async(criterion, id, Arc::new(block), task_count);
}

criterion_group!(benches, write_stream_single_task, write_stream_8_tasks);
