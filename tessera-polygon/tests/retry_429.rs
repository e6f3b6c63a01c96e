use std::sync::Arc;

use tessera_core::IngestConfig;
use tessera_mock::{ScriptedTransport, fixtures};
use tessera_polygon::PolygonConnector;
use tessera_polygon::datasets::TickerMetadataRequest;

fn config() -> IngestConfig {
    IngestConfig::new("k3y").with_base_url("https://api.test")
}

#[tokio::test(start_paused = true)]
async fn throttled_page_is_retried_with_an_identical_request() {
    let transport = Arc::new(ScriptedTransport::replying([
        (429, String::new()),
        (200, fixtures::tickers_page("p1", &["AAA"], None)),
    ]));
    let connector = PolygonConnector::with_transport(config(), transport.clone());

    let outcome = connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

    assert_eq!(outcome.requests, 2);
    assert_eq!(outcome.pages, 1);
    assert_eq!(outcome.records.len(), 1);

    let seen = transport.requests();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[tokio::test(start_paused = true)]
async fn throttled_chain_yields_the_same_records_as_a_clean_one() {
    let page = fixtures::tickers_page("p1", &["AAA", "BBB"], None);

    let clean = Arc::new(ScriptedTransport::replying([(200, page.clone())]));
    let throttled = Arc::new(ScriptedTransport::replying([
        (429, String::new()),
        (200, page),
    ]));

    let clean_outcome = PolygonConnector::with_transport(config(), clean)
        .fetch(&TickerMetadataRequest::all())
        .await
        .unwrap();
    let throttled_outcome = PolygonConnector::with_transport(config(), throttled)
        .fetch(&TickerMetadataRequest::all())
        .await
        .unwrap();

    assert_eq!(clean_outcome.records, throttled_outcome.records);
    assert_eq!(throttled_outcome.requests, clean_outcome.requests + 1);
}

#[tokio::test(start_paused = true)]
async fn mid_chain_throttle_retries_the_continuation_not_the_start() {
    let transport = Arc::new(ScriptedTransport::replying([
        (
            200,
            fixtures::tickers_page(
                "p1",
                &["AAA"],
                Some("https://api.test/v3/reference/tickers?cursor=c2"),
            ),
        ),
        (429, String::new()),
        (200, fixtures::tickers_page("p2", &["BBB"], None)),
    ]));
    let connector = PolygonConnector::with_transport(config(), transport.clone());

    let outcome = connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

    assert_eq!(outcome.pages, 2);
    let symbols: Vec<&str> = outcome.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(symbols, ["AAA", "BBB"]);

    let seen = transport.requests();
    assert_eq!(seen.len(), 3);
    // The throttled attempt and its retry hit the same cursor.
    assert_eq!(seen[1], seen[2]);
    assert_eq!(seen[1].url, "https://api.test/v3/reference/tickers?cursor=c2");
}
