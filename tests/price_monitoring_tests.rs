//! Integration tests for the price monitoring pass.

mod test_utils;

use std::sync::Arc;

use pricewatch::clock::SystemClock;
use pricewatch::monitor::PriceMonitor;
use pricewatch::repositories::PriceCheckRepository;

#[tokio::test]
async fn empty_catalog_yields_empty_summary() {
    let db = test_utils::setup_db().await;
    test_utils::insert_rule(&db, "default", 50.0, None, true).await;

    let monitor = PriceMonitor::new(db, Arc::new(SystemClock));
    let summary = monitor.run_monitoring().await;

    assert_eq!(summary.checked, 0);
    assert_eq!(summary.alerts, 0);
    assert!(summary.errors.is_empty());
}

#[tokio::test]
async fn missing_rule_is_reported_not_panicked() {
    let db = test_utils::setup_db().await;
    test_utils::insert_product(&db, "published", Some(1000), Some(1500)).await;

    let monitor = PriceMonitor::new(db, Arc::new(SystemClock));
    let summary = monitor.run_monitoring().await;

    assert_eq!(summary.checked, 0);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("no active price rule"));
}

#[tokio::test]
async fn on_target_margin_persists_check_without_alert() {
    let db = test_utils::setup_db().await;
    // cost 10.00, price 15.00 -> margin exactly 50%
    let product = test_utils::insert_product(&db, "published", Some(1000), Some(1500)).await;
    test_utils::insert_rule(&db, "default", 50.0, None, true).await;

    let monitor = PriceMonitor::new(db.clone(), Arc::new(SystemClock));
    let summary = monitor.run_monitoring().await;

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.alerts, 0);
    assert!(summary.errors.is_empty());

    let checks = PriceCheckRepository::new(db)
        .list_for_product(product.id)
        .await
        .unwrap();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].margin_pct, 50.0);
    assert_eq!(checks[0].delta_pct, Some(0.0));
    assert_eq!(checks[0].supplier_price_amount, 1000);
    assert_eq!(checks[0].selling_price_amount, 1500);
}

#[tokio::test]
async fn large_deviation_from_target_raises_alert() {
    let db = test_utils::setup_db().await;
    // margin 50% against a 20% target -> delta 30 points
    test_utils::insert_product(&db, "published", Some(1000), Some(1500)).await;
    test_utils::insert_rule(&db, "default", 20.0, None, true).await;

    let monitor = PriceMonitor::new(db, Arc::new(SystemClock));
    let summary = monitor.run_monitoring().await;

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.alerts, 1);
}

#[tokio::test]
async fn margin_floor_breach_raises_alert() {
    let db = test_utils::setup_db().await;
    // margin 5%, within 10 points of the 10% target but below the 8% floor
    test_utils::insert_product(&db, "published", Some(1000), Some(1050)).await;
    test_utils::insert_rule(&db, "default", 10.0, Some(8.0), true).await;

    let monitor = PriceMonitor::new(db, Arc::new(SystemClock));
    let summary = monitor.run_monitoring().await;

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.alerts, 1);
}

#[tokio::test]
async fn unpriceable_products_are_skipped() {
    let db = test_utils::setup_db().await;
    test_utils::insert_product(&db, "published", None, Some(1500)).await;
    test_utils::insert_product(&db, "published", Some(0), Some(1500)).await;
    test_utils::insert_product(&db, "published", Some(1000), None).await;
    test_utils::insert_rule(&db, "default", 50.0, None, true).await;

    let monitor = PriceMonitor::new(db, Arc::new(SystemClock));
    let summary = monitor.run_monitoring().await;

    assert_eq!(summary.checked, 0);
    assert_eq!(summary.alerts, 0);
    assert!(summary.errors.is_empty());
}

#[tokio::test]
async fn draft_products_are_not_monitored() {
    let db = test_utils::setup_db().await;
    test_utils::insert_product(&db, "draft", Some(1000), Some(1500)).await;
    test_utils::insert_product(&db, "published", Some(1000), Some(1500)).await;
    test_utils::insert_rule(&db, "default", 50.0, None, true).await;

    let monitor = PriceMonitor::new(db, Arc::new(SystemClock));
    let summary = monitor.run_monitoring().await;

    assert_eq!(summary.checked, 1);
}

#[tokio::test]
async fn first_rule_by_name_governs_the_pass() {
    let db = test_utils::setup_db().await;
    test_utils::insert_product(&db, "published", Some(1000), Some(1500)).await;
    // "a-strict" sorts before "b-loose" and has a distant target
    test_utils::insert_rule(&db, "b-loose", 50.0, None, true).await;
    test_utils::insert_rule(&db, "a-strict", 10.0, None, true).await;
    test_utils::insert_rule(&db, "0-inactive", 50.0, None, false).await;

    let monitor = PriceMonitor::new(db, Arc::new(SystemClock));
    let summary = monitor.run_monitoring().await;

    // Governed by a-strict (target 10, margin 50 -> alert)
    assert_eq!(summary.checked, 1);
    assert_eq!(summary.alerts, 1);
}
