use crate::core::check_broker;
use crate::models::Broker;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Documents requested per page when listing a collection
const PAGE_SIZE: usize = 100;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Loads the broker catalog from the hosted database.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    brokers_collection: String,
    client: Client,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        brokers_collection: String,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            brokers_collection,
            client,
        })
    }

    /// Fetch the full broker catalog, page by page.
    ///
    /// Documents that fail to parse are logged and skipped.
    pub async fn list_brokers(&self) -> Result<Vec<Broker>, AppwriteError> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.brokers_collection
        );

        let mut brokers = Vec::new();
        let mut offset = 0usize;

        loop {
            let queries = serde_json::to_string(&[
                format!("limit({})", PAGE_SIZE),
                format!("offset({})", offset),
            ])
            .map_err(|e| AppwriteError::InvalidResponse(e.to_string()))?;
            let full_url = format!("{}?query={}", url, urlencoding::encode(&queries));

            tracing::debug!("Fetching brokers page at offset {}", offset);

            let response = self
                .client
                .get(&full_url)
                .header("X-Appwrite-Key", &self.api_key)
                .header("X-Appwrite-Project", &self.project_id)
                .send()
                .await?;

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(AppwriteError::Unauthorized);
            }
            if !status.is_success() {
                return Err(AppwriteError::ApiError(format!(
                    "Failed to list brokers: {}",
                    status
                )));
            }

            let json: Value = response.json().await?;

            let total = json
                .get("total")
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as usize;

            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

            brokers.extend(documents.iter().filter_map(parse_broker));
            offset += documents.len();

            if documents.len() < PAGE_SIZE || offset >= total {
                break;
            }
        }

        tracing::info!("Loaded {} brokers from Appwrite", brokers.len());

        Ok(brokers)
    }
}

/// Parse a broker document, falling back to `$id` when the record has no `id`
fn parse_broker(doc: &Value) -> Option<Broker> {
    let mut data = doc.get("data").unwrap_or(doc).clone();

    if let Some(obj) = data.as_object_mut() {
        if !obj.contains_key("id") {
            if let Some(doc_id) = doc.get("$id").cloned() {
                obj.insert("id".to_string(), doc_id);
            }
        }
    }

    match serde_json::from_value::<Broker>(data) {
        Ok(broker) => match check_broker(&broker) {
            Ok(()) => Some(broker),
            Err(e) => {
                tracing::warn!("Skipping invalid broker document: {}", e);
                None
            }
        },
        Err(e) => {
            tracing::warn!(
                "Skipping malformed broker document {}: {}",
                doc.get("$id").and_then(|v| v.as_str()).unwrap_or("<unknown>"),
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_client(base_url: String) -> AppwriteClient {
        AppwriteClient::new(
            base_url,
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            "brokers".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_appwrite_client_creation() {
        let client = create_client("https://appwrite.test/v1".to_string());

        assert_eq!(client.base_url, "https://appwrite.test/v1");
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.brokers_collection, "brokers");
    }

    #[test]
    fn test_parse_broker_uses_document_id() {
        let doc = json!({
            "$id": "pepperstone",
            "name": "Pepperstone",
            "rating": 4.6,
            "spreadsFrom": 0.0,
            "minDeposit": 0,
            "maxLeverage": 500,
            "platforms": ["MT4", "MT5", "cTrader"]
        });

        let broker = parse_broker(&doc).unwrap();
        assert_eq!(broker.id, "pepperstone");
        assert_eq!(broker.platforms.len(), 3);
        assert!(!broker.verified);
    }

    #[test]
    fn test_parse_broker_skips_malformed() {
        let doc = json!({ "$id": "broken", "name": "No numbers" });
        assert!(parse_broker(&doc).is_none());
    }

    #[test]
    fn test_parse_broker_skips_out_of_range() {
        let doc = json!({
            "$id": "typo",
            "name": "Typo",
            "rating": 45,
            "spreadsFrom": 0.5,
            "minDeposit": 100,
            "maxLeverage": -1,
            "platforms": []
        });
        assert!(parse_broker(&doc).is_none());
    }

    #[tokio::test]
    async fn test_list_brokers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/databases/test_db/collections/brokers/documents")
            .match_query(mockito::Matcher::Any)
            .match_header("X-Appwrite-Project", "test_project")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "total": 2,
                    "documents": [
                        {
                            "$id": "ig",
                            "name": "IG",
                            "rating": 4.7,
                            "trustScore": 9.5,
                            "verified": true,
                            "spreadsFrom": 0.6,
                            "minDeposit": 250,
                            "maxLeverage": 30,
                            "platforms": ["Web", "MT4"]
                        },
                        { "$id": "broken" }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = create_client(server.url());
        let brokers = client.list_brokers().await.unwrap();

        mock.assert_async().await;
        assert_eq!(brokers.len(), 1);
        assert_eq!(brokers[0].id, "ig");
        assert_eq!(brokers[0].trust_score, Some(9.5));
    }

    #[tokio::test]
    async fn test_list_brokers_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/databases/test_db/collections/brokers/documents")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = create_client(server.url());
        let err = client.list_brokers().await.unwrap_err();
        assert!(matches!(err, AppwriteError::Unauthorized));
    }
}
