//! Integration tests for the read-through settings cache.

mod test_utils;

use chrono::{Duration, Utc};
use pricewatch::clock::Clock;
use pricewatch::repositories::SettingRepository;
use pricewatch::settings_cache::{SettingsCache, keys};
use serde_json::json;

const TTL_SECONDS: u64 = 300;

#[tokio::test]
async fn cache_serves_stale_value_until_invalidated() {
    let db = test_utils::setup_db().await;
    let repo = SettingRepository::new(db);
    let clock = test_utils::manual_clock(Utc::now());
    let cache = SettingsCache::new(repo.clone(), clock.clone(), TTL_SECONDS);

    repo.upsert(keys::FX_BASE_CURRENCY, json!("CAD"), clock.now())
        .await
        .unwrap();
    assert_eq!(cache.get(keys::FX_BASE_CURRENCY).await, Some(json!("CAD")));

    // The store changes, but the cached value is still fresh
    repo.upsert(keys::FX_BASE_CURRENCY, json!("USD"), clock.now())
        .await
        .unwrap();
    assert_eq!(cache.get(keys::FX_BASE_CURRENCY).await, Some(json!("CAD")));

    cache.invalidate(keys::FX_BASE_CURRENCY).await;
    assert_eq!(cache.get(keys::FX_BASE_CURRENCY).await, Some(json!("USD")));
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let db = test_utils::setup_db().await;
    let repo = SettingRepository::new(db);
    let clock = test_utils::manual_clock(Utc::now());
    let cache = SettingsCache::new(repo.clone(), clock.clone(), TTL_SECONDS);

    repo.upsert("threshold", json!(10), clock.now()).await.unwrap();
    assert_eq!(cache.get("threshold").await, Some(json!(10)));

    repo.upsert("threshold", json!(20), clock.now()).await.unwrap();
    clock.advance(Duration::seconds(TTL_SECONDS as i64 + 1));

    assert_eq!(cache.get("threshold").await, Some(json!(20)));
}

#[tokio::test]
async fn missing_keys_fall_back_to_default() {
    let db = test_utils::setup_db().await;
    let repo = SettingRepository::new(db);
    let clock = test_utils::manual_clock(Utc::now());
    let cache = SettingsCache::new(repo, clock, TTL_SECONDS);

    assert_eq!(cache.get("nonexistent").await, None);
    assert_eq!(
        cache
            .get_or(keys::DEFAULT_MARGIN_PCT, json!(30.0))
            .await,
        json!(30.0)
    );
}

#[tokio::test]
async fn get_many_merges_cached_and_loaded_values() {
    let db = test_utils::setup_db().await;
    let repo = SettingRepository::new(db);
    let clock = test_utils::manual_clock(Utc::now());
    let cache = SettingsCache::new(repo.clone(), clock.clone(), TTL_SECONDS);

    repo.upsert("a", json!(1), clock.now()).await.unwrap();
    repo.upsert("b", json!(2), clock.now()).await.unwrap();

    // Warm "a" only, then batch-read all three
    assert_eq!(cache.get("a").await, Some(json!(1)));
    let values = cache.get_many(&["a", "b", "missing"]).await;

    assert_eq!(values.get("a"), Some(&json!(1)));
    assert_eq!(values.get("b"), Some(&json!(2)));
    assert!(!values.contains_key("missing"));
}

#[tokio::test]
async fn update_writes_through_and_invalidates() {
    let db = test_utils::setup_db().await;
    let repo = SettingRepository::new(db);
    let clock = test_utils::manual_clock(Utc::now());
    let cache = SettingsCache::new(repo.clone(), clock, TTL_SECONDS);

    cache
        .update(keys::FX_BASE_CURRENCY, json!("CAD"))
        .await
        .unwrap();
    assert_eq!(cache.get(keys::FX_BASE_CURRENCY).await, Some(json!("CAD")));

    // A cache-level update is visible on the very next read, no TTL wait
    cache
        .update(keys::FX_BASE_CURRENCY, json!("USD"))
        .await
        .unwrap();
    assert_eq!(cache.get(keys::FX_BASE_CURRENCY).await, Some(json!("USD")));

    let stored = repo.get(keys::FX_BASE_CURRENCY).await.unwrap().unwrap();
    assert_eq!(stored.value, json!("USD"));
}

#[tokio::test]
async fn get_all_returns_every_setting_and_warms_the_cache() {
    let db = test_utils::setup_db().await;
    let repo = SettingRepository::new(db);
    let clock = test_utils::manual_clock(Utc::now());
    let cache = SettingsCache::new(repo.clone(), clock.clone(), TTL_SECONDS);

    repo.upsert("a", json!(1), clock.now()).await.unwrap();
    repo.upsert("b", json!("two"), clock.now()).await.unwrap();

    let all = cache.get_all().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all.get("a"), Some(&json!(1)));
    assert_eq!(all.get("b"), Some(&json!("two")));

    // Entries loaded by get_all serve subsequent single reads from cache
    repo.upsert("a", json!(99), clock.now()).await.unwrap();
    assert_eq!(cache.get("a").await, Some(json!(1)));
}

#[tokio::test]
async fn invalidate_all_clears_every_entry() {
    let db = test_utils::setup_db().await;
    let repo = SettingRepository::new(db);
    let clock = test_utils::manual_clock(Utc::now());
    let cache = SettingsCache::new(repo.clone(), clock.clone(), TTL_SECONDS);

    repo.upsert("a", json!(1), clock.now()).await.unwrap();
    assert_eq!(cache.get("a").await, Some(json!(1)));

    repo.upsert("a", json!(2), clock.now()).await.unwrap();
    cache.invalidate_all().await;

    assert_eq!(cache.get("a").await, Some(json!(2)));
}
