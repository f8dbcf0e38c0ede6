//! Integration tests for encrypted token storage and usage logging.

mod test_utils;

use std::sync::Arc;

use chrono::{Duration, Utc};
use pricewatch::clock::SystemClock;
use pricewatch::crypto::CryptoKey;
use pricewatch::repositories::ApiTokenRepository;
use pricewatch::tokens::{TokenProvider, TokenService, UsageRecord};
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use serde_json::json;
use uuid::Uuid;

fn test_key() -> CryptoKey {
    CryptoKey::new(vec![7u8; 32]).expect("valid key")
}

fn service(db: DatabaseConnection) -> TokenService {
    TokenService::new(ApiTokenRepository::new(db), test_key(), Arc::new(SystemClock))
}

#[tokio::test]
async fn stored_token_round_trips_through_encryption() {
    let db = test_utils::setup_db().await;
    let tokens = service(db.clone());

    let stored = tokens
        .store_token(TokenProvider::OpenAi, "sk-test-12345", None)
        .await
        .expect("store token");

    // Ciphertext at rest must not contain the plaintext
    assert!(!stored
        .token_ciphertext
        .windows(b"sk-test-12345".len())
        .any(|w| w == b"sk-test-12345"));

    let plaintext = tokens
        .get_active_token(TokenProvider::OpenAi)
        .await
        .expect("lookup succeeds");
    assert_eq!(plaintext.as_deref(), Some("sk-test-12345"));

    let id = tokens
        .get_active_token_id(TokenProvider::OpenAi)
        .await
        .unwrap();
    assert_eq!(id, Some(stored.id));
}

#[tokio::test]
async fn expired_tokens_are_not_returned() {
    let db = test_utils::setup_db().await;
    let tokens = service(db);

    let past = Utc::now() - Duration::hours(1);
    tokens
        .store_token(TokenProvider::Gemini, "expired-token", Some(past))
        .await
        .unwrap();

    assert_eq!(
        tokens.get_active_token(TokenProvider::Gemini).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn inactive_tokens_are_not_returned() {
    let db = test_utils::setup_db().await;
    let tokens = service(db.clone());

    let stored = tokens
        .store_token(TokenProvider::Medusa, "retired-token", None)
        .await
        .unwrap();

    let mut active = stored.into_active_model();
    active.active = Set(false);
    active.update(&db).await.unwrap();

    assert_eq!(
        tokens.get_active_token(TokenProvider::Medusa).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn newest_active_token_wins() {
    let db = test_utils::setup_db().await;
    let repo = ApiTokenRepository::new(db.clone());
    let tokens = TokenService::new(repo.clone(), test_key(), Arc::new(SystemClock));

    let base = Utc::now();
    let old = pricewatch::crypto::encrypt_token(&test_key(), "openai", "old-token").unwrap();
    let new = pricewatch::crypto::encrypt_token(&test_key(), "openai", "new-token").unwrap();
    repo.insert("openai", old, None, base - Duration::hours(2))
        .await
        .unwrap();
    repo.insert("openai", new, None, base).await.unwrap();

    assert_eq!(
        tokens
            .get_active_token(TokenProvider::OpenAi)
            .await
            .unwrap()
            .as_deref(),
        Some("new-token")
    );
}

#[tokio::test]
async fn tampered_ciphertext_is_treated_as_unavailable() {
    let db = test_utils::setup_db().await;
    let tokens = service(db.clone());

    let stored = tokens
        .store_token(TokenProvider::OpenAi, "sk-secret", None)
        .await
        .unwrap();

    let mut corrupted = stored.token_ciphertext.clone();
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0x01;

    let mut active = stored.into_active_model();
    active.token_ciphertext = Set(corrupted);
    active.update(&db).await.unwrap();

    // Decryption failure degrades to "no token" instead of an error
    assert_eq!(
        tokens.get_active_token(TokenProvider::OpenAi).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn usage_logging_records_active_tokens_only() {
    let db = test_utils::setup_db().await;
    let repo = ApiTokenRepository::new(db.clone());
    let tokens = service(db);

    let stored = tokens
        .store_token(TokenProvider::OpenAi, "sk-used", None)
        .await
        .unwrap();

    tokens
        .log_usage(UsageRecord {
            token_id: stored.id,
            provider: TokenProvider::OpenAi,
            process_name: "price_monitoring".to_string(),
            record_count: Some(42),
            details: Some(json!({"pass": 1})),
        })
        .await;

    let logs = repo.list_usage_logs(stored.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].process_name, "price_monitoring");
    assert_eq!(logs[0].record_count, Some(42));

    // Unknown token: skipped without error and without a row
    let phantom = Uuid::new_v4();
    tokens
        .log_usage(UsageRecord {
            token_id: phantom,
            provider: TokenProvider::OpenAi,
            process_name: "price_monitoring".to_string(),
            record_count: None,
            details: None,
        })
        .await;
    assert!(repo.list_usage_logs(phantom).await.unwrap().is_empty());
}
