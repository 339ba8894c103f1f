use std::sync::Arc;

use criterion::{Criterion, criterion_group};

use crate::benchmarks::common::{cache_manager, execute_async, key, runtime, KEYS};

/// Defines the size of every payload loaded before reading
const PAYLOAD_SIZE: usize = 16 * 1024;

/// Defines the chunk size used for moving a payload from the file
const BUFFER_SIZE: usize = 1024;

/// Reads hit the same small set of keys from many tasks, so a part of them is coalesced.
#[cfg(not(tarpaulin_include))]
pub fn read_stream_8_tasks(criterion: &mut Criterion) {
    read_stream(criterion, "CacheManager.read_stream() | 8 tasks", 8);
}

#[cfg(not(tarpaulin_include))]
pub fn read_stream_32_tasks(criterion: &mut Criterion) {
    read_stream(criterion, "CacheManager.read_stream() | 32 tasks", 32);
}

fn read_stream(criterion: &mut Criterion, id: &'static str, task_count: u64) {
    let (_root, cache) = cache_manager(BUFFER_SIZE);
    runtime().block_on({
        let cache = cache.clone();
        async move {
            for index in 0..KEYS as u64 {
                cache.write_stream(&key(index), vec![3u8; PAYLOAD_SIZE]).await.unwrap();
            }
        }
    });

    let block = move |index| {
        let cache = cache.clone();
        async move {
            let _ = cache.read_stream(&key(index)).await.unwrap();
        }
    };
    execute_async(criterion, id, Arc::new(block), task_count);
}

criterion_group!(benches, read_stream_8_tasks, read_stream_32_tasks);
