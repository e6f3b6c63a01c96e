use std::sync::Arc;
use std::time::Duration;

use tessera_core::IngestConfig;
use tessera_mock::{ScriptedTransport, fixtures};
use tessera_polygon::PolygonConnector;
use tessera_polygon::datasets::TickerMetadataRequest;

fn chained_pages(n: usize) -> Vec<(u16, String)> {
    (0..n)
        .map(|i| {
            let next = (i + 1 < n)
                .then(|| format!("https://api.test/v3/reference/tickers?cursor=c{}", i + 1));
            (
                200,
                fixtures::tickers_page(&format!("p{i}"), &["AAA"], next.as_deref()),
            )
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn chain_under_budget_never_sleeps() {
    let transport = Arc::new(ScriptedTransport::replying(chained_pages(3)));
    let config = IngestConfig::new("k").with_base_url("https://api.test");
    let connector = PolygonConnector::with_transport(config, transport);

    let started = tokio::time::Instant::now();
    connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn chain_pauses_once_the_window_budget_is_spent() {
    let transport = Arc::new(ScriptedTransport::replying(chained_pages(3)));
    let config = IngestConfig::new("k")
        .with_base_url("https://api.test")
        .with_rate_limit(2, Duration::from_secs(60));
    let connector = PolygonConnector::with_transport(config, transport);

    let started = tokio::time::Instant::now();
    let outcome = connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

    // Two pages fit the budget; the third waits out one window first.
    assert_eq!(outcome.pages, 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(60), "got {elapsed:?}");
    assert!(elapsed < Duration::from_secs(120), "got {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn overload_pause_precedes_the_retry() {
    let transport = Arc::new(ScriptedTransport::replying([
        (429, String::new()),
        (200, fixtures::tickers_page("p1", &["AAA"], None)),
    ]));
    let config = IngestConfig::new("k")
        .with_base_url("https://api.test")
        .with_rate_limit(4, Duration::from_secs(60));
    let connector = PolygonConnector::with_transport(config, transport);

    let started = tokio::time::Instant::now();
    connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

    // One response and no stamps: the retry waits the full window.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(60), "got {elapsed:?}");
    assert!(elapsed < Duration::from_secs(120), "got {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn observed_cadence_shrinks_the_pause() {
    let transport = Arc::new(ScriptedTransport::replying(chained_pages(4)));
    let config = IngestConfig::new("k")
        .with_base_url("https://api.test")
        .with_rate_limit(3, Duration::from_secs(60));
    let connector = PolygonConnector::with_transport(config, transport);

    let started = tokio::time::Instant::now();
    let outcome = connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

    // Three stamps landed back to back under the paused clock, so the gate
    // sees a sub-second spread and imposes far less than a full window.
    assert_eq!(outcome.pages, 4);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn budget_resets_after_each_pause() {
    let transport = Arc::new(ScriptedTransport::replying(chained_pages(5)));
    let config = IngestConfig::new("k")
        .with_base_url("https://api.test")
        .with_rate_limit(2, Duration::from_secs(60));
    let connector = PolygonConnector::with_transport(config, transport);

    let started = tokio::time::Instant::now();
    let outcome = connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

    // Five pages at two per window: pauses before pages three and five.
    assert_eq!(outcome.pages, 5);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(120), "got {elapsed:?}");
    assert!(elapsed < Duration::from_secs(180), "got {elapsed:?}");
}
