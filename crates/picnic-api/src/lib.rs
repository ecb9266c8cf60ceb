// picnic-api: Async Rust client for the Picnic grocery storefront API
//
// The storefront serves UI-render trees rather than domain objects. This
// crate pairs a session-aware request dispatcher with a small tree query
// engine and the extractors that rebuild articles, recipes, and categories
// from those trees.

pub mod auth;
pub mod error;
pub mod extract;
pub mod models;
pub mod query;
pub mod storefront;
pub mod transport;

pub use auth::{IdentityHeaders, Session};
pub use error::Error;
pub use models::{
    AccordionSection, Article, ArticleDetails, Category, RecipeDetails, RecipeSummary,
    SearchResult,
};
pub use storefront::{ClientConfig, StorefrontClient};
pub use transport::{TlsMode, TransportConfig};
