use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::{
    model::{CraftItem, Document},
    query::ListingQuery,
    store::CraftStore,
};

/// Crafts kept as JSONB documents in PostgreSQL.
#[derive(Clone)]
pub struct PgCraftStore {
    pool: PgPool,
}

impl PgCraftStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        let store = Self::prepare(pool).await?;
        info!("connected to craft store");
        Ok(store)
    }

    /// Applies the embedded migrations; a store that cannot migrate is unusable.
    async fn prepare(pool: PgPool) -> anyhow::Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;
        Ok(Self { pool })
    }
}

// Non-string categories are skipped, matching the in-memory store.
const CATEGORIES_SQL: &str = r#"
SELECT DISTINCT doc->>'category'
FROM crafts
WHERE jsonb_typeof(doc->'category') = 'string'
"#;

/// Planner statistics are unset on a never-analyzed table: -1 on
/// PostgreSQL 14+, 0 before that. Either way the exact count is needed.
fn usable_estimate(reltuples: Option<i64>) -> Option<i64> {
    reltuples.filter(|n| *n > 0)
}

pub(crate) fn list_sql(query: &ListingQuery) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new("SELECT id, doc FROM crafts");
    let mut clause = " WHERE ";

    if let Some(email) = &query.email {
        qb.push(clause)
            .push("jsonb_typeof(doc->'email') = 'string' AND doc->>'email' = ")
            .push_bind(email.as_str());
        clause = " AND ";
    }
    if let Some(needle) = &query.name_contains {
        qb.push(clause)
            .push("jsonb_typeof(doc->'name') = 'string' AND strpos(lower(doc->>'name'), lower(")
            .push_bind(needle.as_str())
            .push(")) > 0");
    }

    qb.push(" ORDER BY id DESC OFFSET ")
        .push_bind(query.skip)
        .push(" LIMIT ")
        .push_bind(query.limit);
    qb
}

#[async_trait]
impl CraftStore for PgCraftStore {
    async fn list(&self, query: &ListingQuery) -> anyhow::Result<Vec<CraftItem>> {
        let mut qb = list_sql(query);
        let rows = qb
            .build_query_as::<(i64, Json<Document>)>()
            .fetch_all(&self.pool)
            .await
            .context("list crafts")?;
        Ok(rows
            .into_iter()
            .map(|(id, Json(doc))| CraftItem { id, doc })
            .collect())
    }

    async fn categories(&self) -> anyhow::Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(CATEGORIES_SQL)
            .fetch_all(&self.pool)
            .await
            .context("list categories")
    }

    async fn estimated_count(&self) -> anyhow::Result<i64> {
        let estimate = sqlx::query_scalar::<_, i64>(
            r#"SELECT reltuples::bigint FROM pg_class WHERE oid = to_regclass('crafts')"#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("estimate craft count")?;

        match usable_estimate(estimate) {
            Some(n) => Ok(n),
            None => sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM crafts")
                .fetch_one(&self.pool)
                .await
                .context("count crafts"),
        }
    }

    async fn insert(&self, doc: Document) -> anyhow::Result<i64> {
        sqlx::query_scalar::<_, i64>("INSERT INTO crafts (doc) VALUES ($1) RETURNING id")
            .bind(Json(doc))
            .fetch_one(&self.pool)
            .await
            .context("insert craft")
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
