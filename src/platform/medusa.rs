//! Medusa admin API client.
//!
//! Thin reqwest-based implementation of [`CommercePlatform`] against the
//! Medusa admin REST endpoints. Responses wrap each collection in an
//! entity-specific array key (`products`, `product_categories`, ...).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

use super::{CommercePlatform, PlatformError, RawEntity};
use crate::models::EntityType;

/// Client for the Medusa admin API.
#[derive(Debug, Clone)]
pub struct MedusaClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl MedusaClient {
    pub fn new(base_url: Url, api_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_token,
        }
    }

    /// Admin API path segment for an entity type.
    fn path_segment(entity_type: EntityType) -> &'static str {
        match entity_type {
            EntityType::Product => "products",
            EntityType::Category => "product-categories",
            EntityType::Collection => "collections",
            EntityType::Type => "product-types",
            EntityType::Tag => "product-tags",
            EntityType::SalesChannel => "sales-channels",
        }
    }

    /// Key under which the response wraps the entity array.
    fn array_key(entity_type: EntityType) -> &'static str {
        match entity_type {
            EntityType::Product => "products",
            EntityType::Category => "product_categories",
            EntityType::Collection => "collections",
            EntityType::Type => "product_types",
            EntityType::Tag => "product_tags",
            EntityType::SalesChannel => "sales_channels",
        }
    }
}

#[async_trait]
impl CommercePlatform for MedusaClient {
    async fn fetch_entities(
        &self,
        entity_type: EntityType,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RawEntity>, PlatformError> {
        let mut url = self
            .base_url
            .join(&format!("admin/{}", Self::path_segment(entity_type)))
            .map_err(|e| PlatformError::Malformed {
                details: format!("invalid platform URL: {}", e),
            })?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        debug!(entity_type = %entity_type, limit, offset, "fetching platform entities");

        let mut request = self.http.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| PlatformError::Network {
            details: e.to_string(),
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: JsonValue = response.json().await.map_err(|e| PlatformError::Malformed {
            details: e.to_string(),
        })?;

        let items = body
            .get(Self::array_key(entity_type))
            .and_then(JsonValue::as_array)
            .ok_or_else(|| PlatformError::Malformed {
                details: format!(
                    "response missing '{}' array",
                    Self::array_key(entity_type)
                ),
            })?;

        items
            .iter()
            .map(|item| {
                let external_id = item
                    .get("id")
                    .and_then(JsonValue::as_str)
                    .ok_or_else(|| PlatformError::Malformed {
                        details: "entity missing string 'id' field".to_string(),
                    })?
                    .to_string();
                Ok(RawEntity {
                    external_id,
                    payload: item.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_array_keys_cover_all_entity_types() {
        assert_eq!(MedusaClient::path_segment(EntityType::Product), "products");
        assert_eq!(
            MedusaClient::path_segment(EntityType::Category),
            "product-categories"
        );
        assert_eq!(
            MedusaClient::array_key(EntityType::Category),
            "product_categories"
        );
        assert_eq!(
            MedusaClient::array_key(EntityType::SalesChannel),
            "sales_channels"
        );
    }
}
