// Cart and delivery slot endpoints
//
// Cart responses are returned as the storefront sends them; every mutating
// call answers with the updated cart.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::storefront::client::StorefrontClient;

impl StorefrontClient {
    /// Current cart.
    ///
    /// `GET /cart`
    pub async fn get_cart(&self) -> Result<Value, Error> {
        debug!("fetching cart");
        self.get("/cart", false).await
    }

    /// Add `count` of a product to the cart.
    ///
    /// `POST /cart/add_product` with `{"product_id": "...", "count": N}`
    pub async fn add_product(&self, product_id: &str, count: u32) -> Result<Value, Error> {
        debug!(product_id, count, "adding product to cart");
        let body = json!({ "product_id": product_id, "count": count });
        self.post("/cart/add_product", Some(&body), None).await
    }

    /// Remove `count` of a product from the cart.
    ///
    /// `POST /cart/remove_product` with `{"product_id": "...", "count": N}`
    pub async fn remove_product(&self, product_id: &str, count: u32) -> Result<Value, Error> {
        debug!(product_id, count, "removing product from cart");
        let body = json!({ "product_id": product_id, "count": count });
        self.post("/cart/remove_product", Some(&body), None).await
    }

    /// Empty the cart.
    ///
    /// `POST /cart/clear`
    pub async fn clear_cart(&self) -> Result<Value, Error> {
        debug!("clearing cart");
        self.post("/cart/clear", None, None).await
    }

    /// Delivery slots offered for the current cart.
    ///
    /// `GET /cart/delivery_slots`
    pub async fn get_delivery_slots(&self) -> Result<Value, Error> {
        debug!("fetching delivery slots");
        self.get("/cart/delivery_slots", false).await
    }
}
