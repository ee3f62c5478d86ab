// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Reconciliation of remote records with the local catalog
//
// Remote records are mapped onto the local catalog by position: record `i`
// takes every display field from catalog entry `i mod N` and keeps only its
// own id. Any failure of the remote call falls back to local data, so none
// of these operations return an error.

use crate::catalog;
use crate::config::ClientConfig;
use crate::remote::{CatalogClient, RemoteRecord};
use crate::types::TransportItem;

/// Map at most `cap` remote records onto catalog templates
pub fn reconcile(records: &[RemoteRecord], cap: usize) -> Vec<TransportItem> {
    records
        .iter()
        .take(cap)
        .enumerate()
        .map(|(index, record)| from_template(catalog::template_for(index), record))
        .collect()
}

fn from_template(template: &TransportItem, record: &RemoteRecord) -> TransportItem {
    TransportItem {
        id: record.id().unwrap_or(template.id),
        ..template.clone()
    }
}

/// Catalog operations with remote-first, local-fallback semantics
#[derive(Clone)]
pub struct TransportService {
    client: CatalogClient,
    list_fetch_limit: usize,
    list_cap: usize,
    search_cap: usize,
}

impl TransportService {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(CatalogClient::new(config), config)
    }

    pub fn with_client(client: CatalogClient, config: &ClientConfig) -> Self {
        Self {
            client,
            list_fetch_limit: config.list_fetch_limit,
            list_cap: config.list_cap,
            search_cap: config.search_cap,
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Items for the main listing. Falls back to the whole local catalog on
    /// any failure or an empty response.
    pub async fn fetch_transport_items(&self) -> Vec<TransportItem> {
        match self.client.list_products(self.list_fetch_limit).await {
            Ok(records) if !records.is_empty() => {
                tracing::info!(
                    "Fetched {} products from API, mapping up to {}",
                    records.len(),
                    self.list_cap
                );
                reconcile(&records, self.list_cap)
            }
            Ok(_) => {
                tracing::warn!("API returned no products, using local catalog");
                catalog::all().to_vec()
            }
            Err(e) => {
                tracing::error!("API error: {}", e);
                tracing::warn!("Using local catalog due to API error");
                catalog::all().to_vec()
            }
        }
    }

    /// Items matching `query`. An empty remote result or a failed call both
    /// fall back to a substring search of the local catalog.
    pub async fn search_transport(&self, query: &str) -> Vec<TransportItem> {
        match self.client.search_products(query).await {
            Ok(records) if !records.is_empty() => {
                tracing::info!("Search via API returned {} products", records.len());
                reconcile(&records, self.search_cap)
            }
            Ok(_) => {
                let results = catalog::search(query);
                tracing::info!("Found {} matching local items", results.len());
                results
            }
            Err(e) => {
                tracing::error!("Error searching transport: {}", e);
                catalog::search(query)
            }
        }
    }

    /// A single item. The remote record is mapped onto template `id mod N`;
    /// on failure the local item with this id is returned, if any.
    pub async fn fetch_transport_by_id(&self, id: u64) -> Option<TransportItem> {
        match self.client.product(id).await {
            Ok(record) => {
                let template = catalog::template_for((id % catalog::len() as u64) as usize);
                Some(from_template(template, &record))
            }
            Err(e) => {
                tracing::error!("Error fetching transport {}: {}", id, e);
                catalog::find_by_id(id).cloned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::{json, Value};

    fn service_for(server: &mockito::Server) -> TransportService {
        TransportService::new(&ClientConfig::default().with_base_url(server.url()))
    }

    fn offline_service() -> TransportService {
        TransportService::new(&ClientConfig::default().with_base_url("http://127.0.0.1:9"))
    }

    fn products(ids: impl IntoIterator<Item = u64>) -> String {
        let products: Vec<Value> = ids
            .into_iter()
            .map(|id| json!({"id": id, "title": format!("Product {}", id), "price": 9.99}))
            .collect();
        json!({"products": products}).to_string()
    }

    async fn listing_server(status: usize, body: &str) -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products")
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;
        server
    }

    #[test]
    fn test_mapping_is_positional() {
        let records: Vec<RemoteRecord> = (0..25)
            .map(|i| RemoteRecord(json!({"id": 100 + i})))
            .collect();

        let items = reconcile(&records, 25);
        assert_eq!(items.len(), 25);
        for (i, item) in items.iter().enumerate() {
            let template = catalog::template_for(i);
            assert_eq!(item.id, 100 + i as u64);
            assert_eq!(item.title, template.title);
            assert_eq!(item.description, template.description);
            assert_eq!(item.category, template.category);
            assert_eq!(item.location, template.location);
            assert_eq!(item.from, template.from);
        }
        // wrapped around
        assert_eq!(items[21].title, catalog::get(1).unwrap().title);
    }

    #[test]
    fn test_missing_id_uses_template_id() {
        let records = vec![
            RemoteRecord(json!({"title": "no id"})),
            RemoteRecord(json!({"id": null})),
            RemoteRecord(json!({"id": 77})),
        ];
        let items = reconcile(&records, 20);
        assert_eq!(items[0].id, catalog::get(0).unwrap().id);
        assert_eq!(items[1].id, catalog::get(1).unwrap().id);
        assert_eq!(items[2].id, 77);
    }

    #[tokio::test]
    async fn test_listing_truncates_to_cap() {
        let server = listing_server(200, &products(1..=37)).await;

        let items = service_for(&server).fetch_transport_items().await;
        assert_eq!(items.len(), 20);
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
        assert_eq!(items[19].title, catalog::get(19).unwrap().title);
    }

    #[tokio::test]
    async fn test_listing_falls_back_on_every_failure() {
        let cases = [
            (500, "Internal Server Error".to_string()),
            (404, json!({"message": "not found"}).to_string()),
            (200, "<html>not json</html>".to_string()),
            (200, json!({"total": 0}).to_string()),
            (200, json!({"products": null}).to_string()),
            (200, json!({"products": []}).to_string()),
        ];

        for (status, body) in cases {
            let server = listing_server(status, &body).await;
            let items = service_for(&server).fetch_transport_items().await;
            assert_eq!(items, catalog::all(), "status {} body {}", status, body);
        }

        let items = offline_service().fetch_transport_items().await;
        assert_eq!(items, catalog::all());
    }

    #[tokio::test]
    async fn test_search_maps_remote_hits() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products/search")
            .match_query(Matcher::UrlEncoded("q".into(), "phone".into()))
            .with_status(200)
            .with_body(products(50..64))
            .create_async()
            .await;

        let items = service_for(&server).search_transport("phone").await;
        assert_eq!(items.len(), 10);
        assert_eq!(items[0].id, 50);
        assert_eq!(items[0].title, catalog::get(0).unwrap().title);
    }

    #[tokio::test]
    async fn test_search_empty_result_filters_locally() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"products": [], "total": 0}).to_string())
            .create_async()
            .await;

        let items = service_for(&server).search_transport("Kandy").await;
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![6, 8, 10, 11, 16]);
        assert_eq!(items[0], *catalog::find_by_id(6).unwrap());
    }

    #[tokio::test]
    async fn test_search_failure_filters_locally() {
        let items = offline_service().search_transport("Jaffna").await;
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![9]);

        // Matches only through the origin or destination fields
        let items = offline_service().search_transport("Bandaranaike").await;
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![13]);

        let items = offline_service().search_transport("ATTRACTIONS").await;
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![16]);
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products/23")
            .with_status(200)
            .with_body(json!({"id": 23}).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/products/5")
            .with_status(404)
            .create_async()
            .await;

        let service = service_for(&server);
        let item = service.fetch_transport_by_id(23).await.unwrap();
        assert_eq!(item.id, 23);
        assert_eq!(item.title, catalog::get(3).unwrap().title);

        let item = service.fetch_transport_by_id(5).await.unwrap();
        assert_eq!(item, *catalog::find_by_id(5).unwrap());

        assert!(offline_service().fetch_transport_by_id(404).await.is_none());
    }
}
