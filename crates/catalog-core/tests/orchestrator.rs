//! Batch orchestration with a fake fetch collaborator.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use catalog_core::{
    BatchOptions, FetchFailure, FetchRequest, Fetcher, SourceDocument, fetch_and_import,
    import_batch, transcode_batch,
};
use catalog_ingest::ImportOptions;
use catalog_model::{Platform, TargetPlatform};
use catalog_output::ExportOptions;

fn shopify_json(title: &str) -> String {
    serde_json::json!({
        "product": {
            "id": 1000,
            "title": title,
            "handle": title.to_lowercase().replace(' ', "-"),
            "variants": [{"id": 1, "sku": format!("{title}-SKU"), "price": "10.00"}]
        }
    })
    .to_string()
}

fn documents(malformed: &[usize], count: usize) -> Vec<SourceDocument> {
    (0..count)
        .map(|index| SourceDocument::RawJson {
            platform: Platform::Shopify,
            text: if malformed.contains(&index) {
                "{\"product\": ".to_string()
            } else {
                shopify_json(&format!("Item {index}"))
            },
        })
        .collect()
}

#[test]
fn malformed_items_are_index_correlated() {
    let outcome = import_batch(&documents(&[2, 5], 8), &ImportOptions::default());
    assert_eq!(outcome.success_count(), 6);
    assert_eq!(outcome.error_count(), 2);
    assert_eq!(outcome.total(), 8);
    let failed: Vec<usize> = outcome.errors.iter().map(|(index, _)| *index).collect();
    assert_eq!(failed, vec![2, 5]);
    let succeeded: Vec<usize> = outcome.results.iter().map(|(index, _)| *index).collect();
    assert_eq!(succeeded, vec![0, 1, 3, 4, 6, 7]);
    assert!(outcome.errors.iter().all(|(_, err)| err.kind() == "parse"));
    assert_eq!(outcome.results[2].1.title, "Item 3");
}

#[test]
fn transcode_batch_exports_survivors() {
    let outcome = transcode_batch(
        &documents(&[0], 3),
        TargetPlatform::Shopify,
        &ImportOptions::default(),
        &ExportOptions::default(),
    );
    assert_eq!(outcome.error_count(), 1);
    assert_eq!(outcome.errors[0].0, 0);
    for (_, result) in &outcome.results {
        assert_eq!(result.table.len(), 1);
    }
}

/// Serves canned bodies per URL, optionally slowly, and records the peak
/// number of concurrent fetches.
struct FakeFetcher {
    bodies: BTreeMap<String, Result<String, String>>,
    delay: Duration,
    slow: Option<String>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeFetcher {
    fn new(bodies: BTreeMap<String, Result<String, String>>) -> Self {
        Self {
            bodies,
            delay: Duration::from_millis(5),
            slow: None,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchFailure> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let delay = if self.slow.as_deref() == Some(request.url.as_str()) {
            Duration::from_secs(5)
        } else {
            self.delay
        };
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.bodies.get(&request.url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(FetchFailure::new(message.clone())),
            None => Err(FetchFailure::new("404 not found")),
        }
    }
}

fn store_url(index: usize) -> String {
    format!("https://store{index}.example.com/products/item-{index}")
}

#[tokio::test]
async fn fetches_are_bounded_and_ordered() {
    let urls: Vec<String> = (0..6).map(store_url).collect();
    let bodies = urls
        .iter()
        .enumerate()
        .map(|(index, url)| (url.clone(), Ok(shopify_json(&format!("Item {index}")))))
        .collect();
    let fetcher = FakeFetcher::new(bodies);
    let options = BatchOptions::default().with_fetch_limit(2);

    let outcome = fetch_and_import(&urls, &fetcher, &options, &ImportOptions::default()).await;

    assert!(outcome.is_complete());
    let titles: Vec<&str> = outcome.values().map(|product| product.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Item 0", "Item 1", "Item 2", "Item 3", "Item 4", "Item 5"]
    );
    assert!(fetcher.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn failures_stay_per_item() {
    let urls = vec![
        store_url(0),
        "https://example.org/about".to_string(),
        store_url(2),
        store_url(3),
        store_url(4),
    ];
    let mut bodies = BTreeMap::new();
    bodies.insert(store_url(0), Ok(shopify_json("Item 0")));
    bodies.insert(store_url(2), Err("connection reset".to_string()));
    bodies.insert(store_url(3), Ok(shopify_json("Item 3")));
    bodies.insert(store_url(4), Ok("{\"product\": {\"handle\": \"untitled\"}}".to_string()));
    let mut fetcher = FakeFetcher::new(bodies);
    fetcher.slow = Some(store_url(3));
    let options = BatchOptions::default()
        .with_fetch_limit(3)
        .with_fetch_timeout(Duration::from_millis(200));

    let outcome = fetch_and_import(&urls, &fetcher, &options, &ImportOptions::default()).await;

    assert_eq!(outcome.success_count(), 1);
    assert_eq!(outcome.results[0].0, 0);
    let kinds: Vec<(usize, &str)> = outcome
        .errors
        .iter()
        .map(|(index, err)| (*index, err.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![(1, "detection"), (2, "fetch"), (3, "fetch"), (4, "parse")]
    );
    assert!(outcome.errors[2].1.to_string().contains("timed out"));
}
