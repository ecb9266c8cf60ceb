// Storefront API client
//
// `client` owns the transport mechanics (URL construction, session headers,
// response decoding and auth classification). Endpoint groups are inherent
// methods on `StorefrontClient`, one file per group.

pub mod articles;
pub mod auth;
pub mod barcode;
pub mod cart;
pub mod catalog;
pub mod client;
pub mod deliveries;
pub mod recipes;

pub use barcode::{DEFAULT_MAX_REDIRECTS, UNKNOWN_CODE_URL};
pub use client::{
    BARCODE_URL, ClientConfig, DEFAULT_API_VERSION, DEFAULT_COUNTRY_CODE, DEFAULT_URL,
    GLOBAL_GATEWAY_URL, StorefrontClient,
};
