use std::sync::Arc;

use chrono::NaiveDate;
use httpmock::prelude::*;

use tessera_core::{IngestConfig, TesseraError};
use tessera_mock::fixtures;
use tessera_polygon::datasets::{BarRequest, TickerMetadataRequest};
use tessera_polygon::{HttpTransport, PolygonConnector};

fn connector_for(server: &MockServer) -> PolygonConnector {
    let transport = Arc::new(HttpTransport::new(None).unwrap());
    PolygonConnector::with_transport(
        IngestConfig::new("k3y").with_base_url(server.base_url()),
        transport,
    )
}

#[tokio::test]
async fn real_transport_walks_a_chain_against_a_local_server() {
    let server = MockServer::start_async().await;

    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v3/reference/tickers")
                .query_param("active", "true")
                .query_param("market", "stocks")
                .query_param("limit", "1000")
                .query_param("apiKey", "k3y");
            then.status(200)
                .header("content-type", "application/json")
                .body(fixtures::tickers_page(
                    "p1",
                    &["AAA", "BBB"],
                    Some(&server.url("/v3/reference/tickers?cursor=c2")),
                ));
        })
        .await;

    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v3/reference/tickers")
                .query_param("cursor", "c2")
                .query_param("apiKey", "k3y");
            then.status(200)
                .header("content-type", "application/json")
                .body(fixtures::tickers_page("p2", &["CCC"], None));
        })
        .await;

    let connector = connector_for(&server);
    let outcome = connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(outcome.pages, 2);
    let symbols: Vec<&str> = outcome.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(symbols, ["AAA", "BBB", "CCC"]);
}

#[tokio::test]
async fn bar_requests_reach_the_wire_with_their_full_shape() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/aggs/ticker/ABC/range/1/day/2023-01-01/2023-01-05")
                .query_param("adjusted", "true")
                .query_param("sort", "desc")
                .query_param("limit", "50000")
                .query_param("apiKey", "k3y");
            then.status(200)
                .header("content-type", "application/json")
                .body(fixtures::bars_page(
                    "p1",
                    &[(1_672_704_000_000, 7.0, 9.0, 6.5, 8.5, 2000.0)],
                    None,
                ));
        })
        .await;

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
    let request = BarRequest::new("ABC", 7, start, end).unwrap();

    let connector = connector_for(&server);
    let outcome = connector.fetch(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].ticker_id, 7);
}

#[tokio::test]
async fn upstream_failure_carries_status_and_url() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v3/reference/tickers");
            then.status(502).body("bad gateway");
        })
        .await;

    let connector = connector_for(&server);
    let err = connector
        .fetch(&TickerMetadataRequest::all())
        .await
        .unwrap_err();

    let TesseraError::UpstreamStatus { status, url } = err else {
        panic!("expected UpstreamStatus, got {err:?}");
    };
    assert_eq!(status, 502);
    assert!(url.contains("/v3/reference/tickers"));
}

#[tokio::test]
async fn connection_refused_is_a_transport_fault() {
    let transport = Arc::new(HttpTransport::new(None).unwrap());
    // Port 1 is never serving.
    let connector = PolygonConnector::with_transport(
        IngestConfig::new("k3y").with_base_url("http://127.0.0.1:1"),
        transport,
    );

    let err = connector
        .fetch(&TickerMetadataRequest::all())
        .await
        .unwrap_err();

    assert!(matches!(err, TesseraError::Transport { .. }));
}
