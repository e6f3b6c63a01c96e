use std::sync::Arc;

use proptest::prelude::*;

use tessera_core::IngestConfig;
use tessera_mock::{ScriptedTransport, fixtures};
use tessera_polygon::PolygonConnector;
use tessera_polygon::datasets::TickerMetadataRequest;

fn page_symbols(page: usize, rows: usize) -> Vec<String> {
    (0..rows).map(|row| format!("S{page}R{row}")).collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 30, .. ProptestConfig::default() })]
    #[test]
    fn every_row_of_every_page_survives_in_order(
        row_counts in proptest::collection::vec(0usize..4, 1..6)
    ) {
        tokio_test::block_on(async move {
            // Let any gate pause auto-advance instead of really sleeping.
            tokio::time::pause();

            let page_count = row_counts.len();
            let mut script = Vec::new();
            for (i, rows) in row_counts.iter().enumerate() {
                let symbols = page_symbols(i, *rows);
                let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
                let next = (i + 1 < page_count)
                    .then(|| format!("https://api.test/v3/reference/tickers?cursor=c{}", i + 1));
                script.push((200, fixtures::tickers_page(&format!("p{i}"), &refs, next.as_deref())));
            }
            let transport = Arc::new(ScriptedTransport::replying(script));
            let connector = PolygonConnector::with_transport(
                IngestConfig::new("k").with_base_url("https://api.test"),
                transport.clone(),
            );

            let outcome = connector.fetch(&TickerMetadataRequest::all()).await.unwrap();

            let expected: Vec<String> = row_counts
                .iter()
                .enumerate()
                .flat_map(|(i, rows)| page_symbols(i, *rows))
                .collect();
            let got: Vec<String> = outcome.records.into_iter().map(|r| r.ticker).collect();
            assert_eq!(got, expected);
            assert_eq!(outcome.pages, page_count);
            assert_eq!(outcome.requests as usize, page_count);
            assert_eq!(transport.remaining(), 0, "chain must consume exactly its script");
        });
    }
}
