// Delivery endpoints

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::storefront::articles::encode;
use crate::storefront::client::StorefrontClient;

/// Delivery summary filter selecting deliveries still in progress.
pub const CURRENT_DELIVERIES: &[&str] = &["CURRENT"];

impl StorefrontClient {
    /// One delivery.
    ///
    /// `GET /deliveries/{id}`
    pub async fn get_delivery(&self, delivery_id: &str) -> Result<Value, Error> {
        debug!(delivery_id, "fetching delivery");
        self.get(&format!("/deliveries/{}", encode(delivery_id)), false)
            .await
    }

    /// Driver route scenario for a delivery.
    ///
    /// `GET /deliveries/{id}/scenario`
    pub async fn get_delivery_scenario(&self, delivery_id: &str) -> Result<Value, Error> {
        debug!(delivery_id, "fetching delivery scenario");
        self.get(&format!("/deliveries/{}/scenario", encode(delivery_id)), true)
            .await
    }

    /// Live driver position for a delivery.
    ///
    /// `GET /deliveries/{id}/position`
    pub async fn get_delivery_position(&self, delivery_id: &str) -> Result<Value, Error> {
        debug!(delivery_id, "fetching delivery position");
        self.get(&format!("/deliveries/{}/position", encode(delivery_id)), true)
            .await
    }

    /// Delivery summaries, optionally narrowed by status filter.
    ///
    /// `POST /deliveries/summary` with a JSON array of filters (`[]` for all).
    pub async fn get_deliveries(&self, filter: &[&str]) -> Result<Value, Error> {
        debug!(?filter, "fetching deliveries");
        self.post("/deliveries/summary", Some(&json!(filter)), None)
            .await
    }

    /// Deliveries that have not been completed yet.
    pub async fn get_current_deliveries(&self) -> Result<Value, Error> {
        self.get_deliveries(CURRENT_DELIVERIES).await
    }
}
