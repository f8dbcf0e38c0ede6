//! Integration tests for layered configuration loading.

use std::fs;

use pricewatch::config::ConfigLoader;
use tempfile::TempDir;

#[test]
fn defaults_apply_when_no_env_files_exist() {
    let dir = TempDir::new().expect("temp dir");
    let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());

    let config = loader.load().expect("load succeeds");

    assert_eq!(config.profile, "local");
    assert_eq!(config.settings_cache_ttl_seconds, 300);
    assert_eq!(config.fx_cache_ttl_seconds, 3600);
    assert_eq!(config.sync_batch_limit, 100);
    assert!(config.crypto_key.is_none());
}

#[test]
fn env_file_values_are_applied() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join(".env"),
        "PRICEWATCH_LOG_LEVEL=debug\nPRICEWATCH_SYNC_BATCH_LIMIT=25\nPRICEWATCH_PLATFORM_API_BASE=http://medusa.internal:9000\n",
    )
    .expect("write .env");

    let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
    let config = loader.load().expect("load succeeds");

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.sync_batch_limit, 25);
    assert_eq!(config.platform_api_base, "http://medusa.internal:9000");
}

#[test]
fn local_env_file_overrides_base_env_file() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join(".env"), "PRICEWATCH_LOG_LEVEL=info\n").expect("write .env");
    fs::write(dir.path().join(".env.local"), "PRICEWATCH_LOG_LEVEL=trace\n")
        .expect("write .env.local");

    let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
    let config = loader.load().expect("load succeeds");

    assert_eq!(config.log_level, "trace");
}

#[test]
fn invalid_crypto_key_base64_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join(".env"),
        "PRICEWATCH_CRYPTO_KEY=not-valid-base64!!!\n",
    )
    .expect("write .env");

    let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
    assert!(loader.load().is_err());
}

#[test]
fn crypto_key_with_wrong_length_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    // "c2hvcnQ=" decodes to "short" (5 bytes)
    fs::write(dir.path().join(".env"), "PRICEWATCH_CRYPTO_KEY=c2hvcnQ=\n").expect("write .env");

    let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
    assert!(loader.load().is_err());
}
