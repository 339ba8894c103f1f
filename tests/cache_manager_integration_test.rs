use std::fs;
use std::time::Duration;

use disk_cached::cache::cache_manager::CacheManager;
use disk_cached::cache::config::ConfigBuilder;
use disk_cached::cache::errors::Errors;
use disk_cached::cache::key::validate_cache_key;
use disk_cached::cache::policy::cache_policy::CachePolicy;

mod r#macro;

const MARKER_FILE_NAME: &str = "directory.cache";

#[tokio::test]
async fn read_payloads_for_existing_keys() {
    let root = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();
    let key_payload_pairs = payloads!("topic" => b"microservices", "cache" => b"cached", "disk" => b"SSD");

    for (key, payload) in &key_payload_pairs {
        cache.write_stream(key, payload.clone()).await.unwrap();
    }
    for (key, payload) in &key_payload_pairs {
        assert_eq!(Some(payload.clone()), cache.read_stream(key).await.unwrap());
    }
}

#[tokio::test]
async fn round_trip_payloads_around_the_buffer_size() {
    let root = tempfile::tempdir().unwrap();
    let buffer_size = 32;
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).buffer_size(buffer_size).build()).unwrap();

    for size in [0, 1, buffer_size - 1, buffer_size, buffer_size + 1, buffer_size * 10, 10_000] {
        let payload = (0..size).map(|index| (index % 251) as u8).collect::<Vec<u8>>();
        cache.write_stream("payload", payload.clone()).await.unwrap();

        assert_eq!(Some(payload), cache.read_stream("payload").await.unwrap(), "size {}", size);
    }
}

#[tokio::test]
async fn overwrite_a_payload_with_a_shorter_one() {
    let root = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    cache.write_stream("topic", vec![9u8; 4096]).await.unwrap();
    cache.write_stream("topic", b"SSD".to_vec()).await.unwrap();

    assert_eq!(Some(b"SSD".to_vec()), cache.read_stream("topic").await.unwrap());
}

#[tokio::test]
async fn read_a_missing_key() {
    let root = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    assert_eq!(None, cache.read_stream("non-existing").await.unwrap());
}

#[tokio::test]
async fn rotation_makes_previous_entries_unreachable() {
    let root = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    cache.write_stream("topic", b"microservices".to_vec()).await.unwrap();
    cache.set_cache_policy("topic", &CachePolicy::NeverExpires).unwrap();
    cache.assign_cache_directory().unwrap();

    assert_eq!(None, cache.read_stream("topic").await.unwrap());
    assert_eq!(CachePolicy::Invalid, cache.get_cache_policy("topic"));

    cache.write_stream("topic", b"SSD".to_vec()).await.unwrap();
    assert_eq!(Some(b"SSD".to_vec()), cache.read_stream("topic").await.unwrap());
}

#[tokio::test]
async fn recover_the_working_directory_after_restart() {
    let root = tempfile::tempdir().unwrap();
    let previous = {
        let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();
        cache.write_stream("topic", b"microservices".to_vec()).await.unwrap();
        cache.set_cache_policy("topic", &CachePolicy::SlidingExpiration(Duration::from_secs(30))).unwrap();
        cache.current_directory()
    };

    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    assert_eq!(previous, cache.current_directory());
    assert_eq!(Some(b"microservices".to_vec()), cache.read_stream("topic").await.unwrap());
    assert_eq!(CachePolicy::SlidingExpiration(Duration::from_secs(30)), cache.get_cache_policy("topic"));
}

#[tokio::test]
async fn recover_the_rotated_working_directory_after_restart() {
    let root = tempfile::tempdir().unwrap();
    let rotated = {
        let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();
        cache.assign_cache_directory().unwrap();
        cache.write_stream("topic", b"SSD".to_vec()).await.unwrap();
        cache.current_directory()
    };

    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    assert_eq!(rotated, cache.current_directory());
    assert_eq!(Some(b"SSD".to_vec()), cache.read_stream("topic").await.unwrap());
}

#[tokio::test]
async fn start_with_an_empty_directory_given_a_corrupted_marker() {
    let root = tempfile::tempdir().unwrap();
    {
        let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();
        cache.write_stream("topic", b"microservices".to_vec()).await.unwrap();
    }
    fs::write(root.path().join(MARKER_FILE_NAME), "missing-directory").unwrap();

    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    assert!(cache.current_directory().is_dir());
    assert_eq!(None, cache.read_stream("topic").await.unwrap());
}

#[tokio::test]
async fn start_with_an_empty_directory_given_a_missing_marker() {
    let root = tempfile::tempdir().unwrap();
    {
        let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();
        cache.write_stream("topic", b"microservices".to_vec()).await.unwrap();
    }
    fs::remove_file(root.path().join(MARKER_FILE_NAME)).unwrap();

    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    assert!(cache.current_directory().is_dir());
    assert_eq!(None, cache.read_stream("topic").await.unwrap());
}

#[test]
fn policy_round_trip() {
    let root = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();
    let policy = CachePolicy::expiring_after(Duration::from_secs(120), cache.clock());

    assert_eq!(CachePolicy::Invalid, cache.get_cache_policy("topic"));

    cache.set_cache_policy("topic", &policy).unwrap();
    assert_eq!(policy, cache.get_cache_policy("topic"));

    cache.remove("topic").unwrap();
    assert_eq!(CachePolicy::Invalid, cache.get_cache_policy("topic"));
}

#[test]
fn policy_file_sits_next_to_the_entry() {
    let root = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    cache.set_cache_policy("topic", &CachePolicy::NeverExpires).unwrap();

    assert!(cache.current_directory().join("topic.policy").is_file());
}

#[test]
fn unparseable_policy_is_invalid() {
    let root = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(ConfigBuilder::new(root.path()).build()).unwrap();

    fs::write(cache.current_directory().join("topic.policy"), "garbage").unwrap();
    assert_eq!(CachePolicy::Invalid, cache.get_cache_policy("topic"));
}

#[test]
fn validate_cache_keys() {
    assert_eq!(Ok(()), validate_cache_key("topic42"));
    assert_eq!(Err(Errors::CacheKeyContainsDot("a.b".to_string())), validate_cache_key("a.b"));
    assert_eq!(Err(Errors::CacheKeyContainsReservedCharacter("a/b".to_string(), '/')), validate_cache_key("a/b"));
    assert_eq!(Err(Errors::CacheKeyContainsReservedCharacter("a\\b".to_string(), '\\')), validate_cache_key("a\\b"));
    assert!(validate_cache_key("a:b").is_err());
}

#[tokio::test]
async fn destroy_removes_every_working_directory() {
    let root = tempfile::tempdir().unwrap();
    let cache_root = root.path().join("cache");
    let cache = CacheManager::new(ConfigBuilder::new(&cache_root).build()).unwrap();

    cache.write_stream("topic", b"microservices".to_vec()).await.unwrap();
    cache.assign_cache_directory().unwrap();
    cache.write_stream("topic", b"SSD".to_vec()).await.unwrap();
    cache.destroy().unwrap();

    assert!(!cache_root.exists());
}
