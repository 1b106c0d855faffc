use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    model::{CraftItem, Document},
    query::ListingQuery,
    store::CraftStore,
};

/// Process-local collection with the same query semantics as the
/// PostgreSQL store.
#[derive(Default)]
pub struct MemoryCraftStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    items: Vec<CraftItem>,
}

#[async_trait]
impl CraftStore for MemoryCraftStore {
    async fn list(&self, query: &ListingQuery) -> anyhow::Result<Vec<CraftItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .iter()
            .rev()
            .filter(|item| query.matches(item))
            .skip(usize::try_from(query.skip).unwrap_or(0))
            .take(usize::try_from(query.limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> anyhow::Result<Vec<String>> {
        let inner = self.inner.read().await;
        let mut seen = HashSet::new();
        Ok(inner
            .items
            .iter()
            .filter_map(|item| item.str_field("category"))
            .filter(|c| seen.insert(*c))
            .map(str::to_owned)
            .collect())
    }

    async fn estimated_count(&self) -> anyhow::Result<i64> {
        Ok(self.inner.read().await.items.len() as i64)
    }

    async fn insert(&self, doc: Document) -> anyhow::Result<i64> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.items.push(CraftItem { id, doc });
        Ok(id)
    }

    async fn close(&self) {}
}
