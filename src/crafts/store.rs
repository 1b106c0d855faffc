use async_trait::async_trait;

use super::{
    model::{CraftItem, Document},
    query::ListingQuery,
};

/// Document collection behind the craft endpoints.
#[async_trait]
pub trait CraftStore: Send + Sync {
    /// Items matching `query`, newest first, after `skip`, at most `limit`.
    async fn list(&self, query: &ListingQuery) -> anyhow::Result<Vec<CraftItem>>;
    /// Distinct `category` values across the collection, in no particular order.
    async fn categories(&self) -> anyhow::Result<Vec<String>>;
    /// Fast, possibly stale document count.
    async fn estimated_count(&self) -> anyhow::Result<i64>;
    /// Stores `doc` and returns the assigned identity.
    async fn insert(&self, doc: Document) -> anyhow::Result<i64>;
    async fn close(&self);
}
