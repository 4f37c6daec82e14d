// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Redis client and the timed cache using Docker containers.

mod common;

#[cfg(feature = "redis")]
mod redis_tests {
    use layercfg::adapters::{RedisKvClient, RedisStorageMode, TimedCacheConfigSource};
    use layercfg::domain::ConfigKey;
    use layercfg::ports::{ConfigSource, RemoteKvClient};
    use std::sync::Arc;
    use std::time::Duration;
    use testcontainers::{core::WaitFor, runners::AsyncRunner, GenericImage, ImageExt};

    use crate::common as docker_helpers;

    /// Starts a Redis container seeded with three keys for `storage_mode`.
    async fn setup_redis_test(
        storage_mode: RedisStorageMode,
    ) -> Option<(testcontainers::ContainerAsync<GenericImage>, String, RedisKvClient)> {
        if !docker_helpers::is_docker_available() {
            docker_helpers::print_docker_unavailable_warning("Redis integration test");
            return None;
        }

        let redis_image = GenericImage::new("redis", "7-alpine")
            .with_exposed_port(6379.into())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"));

        let container = redis_image.start().await.ok()?;
        let port = container.get_host_port_ipv4(6379).await.ok()?;
        let url = format!("redis://127.0.0.1:{}", port);

        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;

        let client = redis::Client::open(url.as_str()).unwrap();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();

        let namespace = match storage_mode {
            RedisStorageMode::Hash => {
                let _: () = redis::cmd("HSET")
                    .arg("test_hash")
                    .arg("test.key")
                    .arg("test_value")
                    .arg("database.host")
                    .arg("localhost")
                    .arg("database.port")
                    .arg("5432")
                    .query_async(&mut conn)
                    .await
                    .unwrap();
                "test_hash"
            }
            RedisStorageMode::StringKeys => {
                for (key, value) in [
                    ("test:test.key", "test_value"),
                    ("test:database.host", "localhost"),
                    ("test:database.port", "5432"),
                ] {
                    let _: () = redis::cmd("SET")
                        .arg(key)
                        .arg(value)
                        .query_async(&mut conn)
                        .await
                        .unwrap();
                }
                "test:"
            }
        };

        let kv = RedisKvClient::new(&url, namespace, storage_mode).unwrap();
        Some((container, url, kv))
    }

    async fn set_key(url: &str, key: &str, value: &str) {
        let client = redis::Client::open(url).unwrap();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_redis_hash_mode_get() {
        let Some((_container, _url, kv)) = setup_redis_test(RedisStorageMode::Hash).await else {
            return;
        };

        assert_eq!(kv.get("test.key").unwrap().as_deref(), Some("test_value"));
        assert_eq!(kv.get("database.port").unwrap().as_deref(), Some("5432"));
        assert_eq!(kv.get("nonexistent").unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_string_keys_mode_get() {
        let Some((_container, _url, kv)) = setup_redis_test(RedisStorageMode::StringKeys).await
        else {
            return;
        };

        assert_eq!(kv.get("test.key").unwrap().as_deref(), Some("test_value"));
        assert_eq!(kv.get("database.host").unwrap().as_deref(), Some("localhost"));
        assert_eq!(kv.get("nonexistent").unwrap(), None);
    }

    #[tokio::test]
    async fn test_timed_cache_over_redis() {
        let Some((_container, url, kv)) = setup_redis_test(RedisStorageMode::StringKeys).await
        else {
            return;
        };

        let source = TimedCacheConfigSource::new(Arc::new(kv), Duration::from_millis(300));
        let key = ConfigKey::from("test.key");
        assert_eq!(source.get_value(&key).unwrap().unwrap().as_str(), "test_value");

        set_key(&url, "test:test.key", "updated").await;
        assert_eq!(source.get_value(&key).unwrap().unwrap().as_str(), "test_value");

        tokio::time::sleep(tokio::time::Duration::from_millis(400)).await;
        assert_eq!(source.get_value(&key).unwrap().unwrap().as_str(), "updated");

        let stats = source.stats();
        assert_eq!(stats.found, 2);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_negative_record_over_redis() {
        let Some((_container, url, kv)) = setup_redis_test(RedisStorageMode::StringKeys).await
        else {
            return;
        };

        let source = TimedCacheConfigSource::new(Arc::new(kv), Duration::from_secs(60));
        let key = ConfigKey::from("late.key");
        assert_eq!(source.get_value(&key).unwrap(), None);

        set_key(&url, "test:late.key", "now-present").await;
        assert_eq!(source.get_value(&key).unwrap(), None);

        source.invalidate("late.key");
        assert_eq!(source.get_value(&key).unwrap().unwrap().as_str(), "now-present");
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_masked_by_cache() {
        let kv = RedisKvClient::new("redis://127.0.0.1:1", "test:", RedisStorageMode::StringKeys)
            .unwrap();
        let source = TimedCacheConfigSource::new(Arc::new(kv), Duration::from_secs(60));

        assert_eq!(source.get_value(&ConfigKey::from("any")).unwrap(), None);
        assert_eq!(source.stats().failures, 1);
    }
}
