//! End-to-end controller scenarios against the mock transport.

use dashlytics_core::{
    CountryRevenueField, CountryRevenueView, MonthlySalesField, MonthlySalesView, Phase, Severity,
    SortOrder, TopProductsView, TopRegionsView,
};
use dashlytics_devkit::{fixtures, MockReply, TestHarness};
use std::time::Duration;

#[tokio::test]
async fn test_country_revenue_paginates_twenty_five_rows() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("country-revenue", MockReply::json(&fixtures::country_revenue(25)));

    let view = harness.view(CountryRevenueView::default())?;
    let pending = view.set_limit(25).expect("limit changed");
    assert!(pending.resolve().await);

    let request = harness.transport.last_request().expect("one request");
    assert_eq!(request.query_value("limit"), Some("25"));

    let snap = view.snapshot();
    assert_eq!(snap.phase, Phase::Ready);
    assert_eq!(snap.total_pages, 3);
    assert_eq!(snap.display_rows.len(), 10);

    view.next_page();
    view.next_page();
    assert_eq!(view.next_page(), 3);
    let snap = view.snapshot();
    assert_eq!(snap.current_page, 3);
    assert_eq!(snap.display_rows.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_top_products_http_500_is_error_with_one_notification() -> anyhow::Result<()> {
    let mut harness = TestHarness::new();
    harness.respond("top-products", MockReply::status(500));
    harness
        .expect_requests("top-products", 1)
        .expect_notifications(Severity::Error, 1)
        .expect_notifications(Severity::Success, 0);

    let view = harness.view(TopProductsView::default())?;
    assert!(view.load().resolve().await);

    let snap = view.snapshot();
    assert_eq!(snap.phase, Phase::Error);
    assert!(snap.display_rows.is_empty());
    assert!(view.records().is_empty());

    harness.verify_expectations()?;
    harness.assert_notified("Failed to fetch Top Purchased Products.")?;
    Ok(())
}

#[tokio::test]
async fn test_same_parameters_twice_dedupes_success_notification() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("top-regions", MockReply::json(&fixtures::top_regions(8)));

    let view = harness.view(TopRegionsView::default())?;
    assert!(view.load().resolve().await);
    let first = view.records();
    assert!(view.retry().resolve().await);
    let second = view.records();

    assert_eq!(first, second);
    assert_eq!(harness.transport.requests_to("top-regions").len(), 2);

    let stats = harness.stats();
    assert_eq!(stats.notifications_shown, 1);
    assert_eq!(stats.notifications_suppressed, 1);
    assert_eq!(harness.bus.visible().len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_never_overwrites_fresh_data() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness
        .enqueue(
            "country-revenue",
            MockReply::json(&fixtures::country_revenue(5)).delayed(Duration::from_millis(500)),
        )
        .enqueue(
            "country-revenue",
            MockReply::json(&fixtures::country_revenue(7)).delayed(Duration::from_millis(10)),
        );

    let view = harness.view(CountryRevenueView::default())?;
    let a = view.set_limit(5).expect("limit changed");
    let b = view.set_limit(7).expect("limit changed");
    assert!(a.ticket().sequence < b.ticket().sequence);

    let (a_applied, b_applied) = tokio::join!(a.resolve(), b.resolve());
    assert!(!a_applied);
    assert!(b_applied);

    assert_eq!(view.records().len(), 7);
    assert_eq!(view.parameters().limit(), 7);
    assert_eq!(view.phase(), Phase::Ready);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stale_failure_is_ignored() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness
        .enqueue(
            "top-regions",
            MockReply::network_error("timed out").delayed(Duration::from_secs(2)),
        )
        .enqueue("top-regions", MockReply::json(&fixtures::top_regions(3)));

    let view = harness.view(TopRegionsView::default())?;
    let slow = view.load();
    let fast = view.set_limit(10).expect("limit changed");

    let (slow_applied, fast_applied) = tokio::join!(slow.resolve(), fast.resolve());
    assert!(!slow_applied);
    assert!(fast_applied);
    assert_eq!(view.phase(), Phase::Ready);
    assert!(view.snapshot().last_error.is_none());
    Ok(())
}

#[tokio::test]
async fn test_failure_keeps_last_good_records_until_retry() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness
        .enqueue("country-revenue", MockReply::json(&fixtures::country_revenue(10)))
        .enqueue("country-revenue", MockReply::network_error("connection reset"))
        .respond("country-revenue", MockReply::json(&fixtures::country_revenue(20)));

    let view = harness.view(CountryRevenueView::default())?;
    view.load().resolve().await;
    assert_eq!(view.phase(), Phase::Ready);

    view.set_limit(20).expect("limit changed").resolve().await;
    let snap = view.snapshot();
    assert_eq!(snap.phase, Phase::Error);
    assert_eq!(snap.total_records, 10);
    assert_eq!(snap.display_rows.len(), 10);

    view.retry().resolve().await;
    let snap = view.snapshot();
    assert_eq!(snap.phase, Phase::Ready);
    assert_eq!(snap.total_records, 20);
    assert_eq!(snap.total_pages, 2);
    Ok(())
}

#[tokio::test]
async fn test_unchanged_parameter_issues_no_request() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("country-revenue", MockReply::json(&fixtures::country_revenue(3)));

    let view = harness.view(CountryRevenueView::default())?;
    view.load().resolve().await;

    assert!(view.set_limit(10).is_none());
    assert!(view.set_sort_field(CountryRevenueField::Revenue).is_none());
    assert!(view.set_sort_order(SortOrder::Descending).is_none());
    assert_eq!(harness.transport.request_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_monthly_sales_sends_sort_parameters() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("monthly-sales", MockReply::json(&fixtures::monthly_sales(6)));

    let view = harness.view(MonthlySalesView)?;
    view.load().resolve().await;
    let first = harness.transport.last_request().expect("request");
    assert_eq!(first.query_value("sortField"), Some("month"));
    assert_eq!(first.query_value("sortOrder"), Some("asc"));
    assert_eq!(view.snapshot().display_rows[0].month, "2024-01");

    view.set_sort_field(MonthlySalesField::Sales)
        .expect("field changed")
        .resolve()
        .await;
    view.set_sort_order(SortOrder::Descending)
        .expect("order changed")
        .resolve()
        .await;
    let last = harness.transport.last_request().expect("request");
    assert_eq!(last.query_value("sortField"), Some("sales"));
    assert_eq!(last.query_value("sortOrder"), Some("desc"));

    let rows = view.snapshot().display_rows;
    assert!(rows
        .windows(2)
        .all(|w| w[0].total_quantity_sold >= w[1].total_quantity_sold));
    Ok(())
}

#[tokio::test]
async fn test_top_products_sorted_and_truncated_client_side() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("top-products", MockReply::json(&fixtures::top_products(30)));

    let view = harness.view(TopProductsView::default())?;
    view.load().resolve().await;

    let request = harness.transport.last_request().expect("request");
    assert!(request.query.is_empty());

    let snap = view.snapshot();
    assert_eq!(snap.display_rows.len(), 20);
    assert_eq!(snap.display_rows[0].total_quantity_sold, 300);
    assert_eq!(snap.total_pages, 1);

    view.set_limit(5).expect("limit changed").resolve().await;
    assert_eq!(view.snapshot().display_rows.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_regions_backend_quirks() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness
        .enqueue(
            "top-regions",
            MockReply::json(&fixtures::raw_regions_backend_spelling(4)),
        )
        .enqueue("top-regions", MockReply::body(200, "null"));

    let view = harness.view(TopRegionsView::default())?;
    view.load().resolve().await;
    let snap = view.snapshot();
    assert_eq!(snap.phase, Phase::Ready);
    assert_eq!(snap.display_rows[0].total_items_sold, 10_000);

    view.retry().resolve().await;
    let snap = view.snapshot();
    assert_eq!(snap.phase, Phase::Ready);
    assert!(snap.display_rows.is_empty());
    assert_eq!((snap.current_page, snap.total_pages), (1, 1));
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_error() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("monthly-sales", MockReply::json(&fixtures::raw_error_object()));

    let view = harness.view(MonthlySalesView)?;
    view.load().resolve().await;

    let snap = view.snapshot();
    assert_eq!(snap.phase, Phase::Error);
    assert_eq!(snap.last_error.map(|e| e.kind()), Some("DecodeError"));
    harness.assert_notified("Failed to fetch Monthly Sales Volume.")?;
    Ok(())
}

#[tokio::test]
async fn test_limit_change_returns_to_first_page() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("country-revenue", MockReply::json(&fixtures::country_revenue(30)));

    let view = harness.view(CountryRevenueView::default())?;
    view.set_limit(30).expect("limit changed").resolve().await;
    view.next_page();
    assert_eq!(view.snapshot().current_page, 2);

    view.set_sort_field(CountryRevenueField::Country)
        .expect("field changed")
        .resolve()
        .await;
    assert_eq!(view.snapshot().current_page, 2);

    view.set_limit(40).expect("limit changed").resolve().await;
    assert_eq!(view.snapshot().current_page, 1);
    Ok(())
}

#[tokio::test]
async fn test_non_positive_limit_is_sent_as_one() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("country-revenue", MockReply::json(&fixtures::country_revenue(1)));

    let view = harness.view(CountryRevenueView::default())?;
    view.set_limit(-5).expect("limit changed").resolve().await;

    let request = harness.transport.last_request().expect("request");
    assert_eq!(request.query_value("limit"), Some("1"));
    Ok(())
}

#[tokio::test]
async fn test_spawned_fetch_applies_outcome() -> anyhow::Result<()> {
    let harness = TestHarness::new();
    harness.respond("top-regions", MockReply::json(&fixtures::top_regions(2)));

    let view = harness.view(TopRegionsView::default())?;
    let handle = view.load().spawn();
    assert_eq!(view.phase(), Phase::Loading);
    assert!(handle.await?);
    assert_eq!(view.phase(), Phase::Ready);
    Ok(())
}
