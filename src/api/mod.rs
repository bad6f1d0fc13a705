pub mod query;
pub mod smx_client;

pub use query::{ScoreQuery, SortField, SortOrder};
pub use smx_client::{CatalogKind, SmxClient};
