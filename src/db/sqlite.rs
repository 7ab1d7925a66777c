use crate::db::entities::{Console, Emulator, Game, NewToolBundle, Tool, ToolBundle};
use crate::db::models::{
    CatalogEntity, Columns, EntityDraft, EntityKind, EntityPatch, SearchHit, SqlValue,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::CatalogError;
use crate::service::slug::resolve_slug;
use backon::{ExponentialBuilder, Retryable};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

pub type SqlitePool = Pool<Sqlite>;

/// Listing parameters after page-size resolution.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub q: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Clone)]
pub struct CatalogStorage {
    pool: SqlitePool,
}

impl CatalogStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open (creating if missing) the database and apply the schema.
    /// The first connection is retried with backoff; nothing after it is.
    pub async fn connect(database_url: &str) -> Result<Self, CatalogError> {
        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(3))
            .with_max_times(3);

        let pool = (|| {
            let opts = opts.clone();
            async move {
                SqlitePoolOptions::new()
                    .max_connections(8)
                    .connect_with(opts)
                    .await
            }
        })
        .retry(retry_policy)
        .notify(|err: &sqlx::Error, dur: Duration| {
            warn!("database connect failed: {}, retrying in {:?}", err, dur);
        })
        .await?;

        let storage = Self::new(pool);
        storage.init_schema().await?;
        info!(database_url, "catalog storage ready");
        Ok(storage)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CatalogError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn insert<E: CatalogEntity>(&self, draft: E::Draft) -> Result<E, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let row = insert_entity::<E>(&mut conn, draft).await?;
        debug!(kind = E::KIND.label(), "inserted record");
        Ok(row)
    }

    /// Apply a partial patch. `updated_at` is always bumped.
    ///
    /// A blank `slug` regenerates it from the patched name, or from the
    /// stored name when the patch leaves the name alone, the same fallback
    /// creation uses.
    pub async fn update<E: CatalogEntity>(
        &self,
        id: i64,
        patch: E::Patch,
    ) -> Result<E, CatalogError> {
        let name = patch.name().map(required_name).transpose()?;
        let slug = match patch.slug() {
            None => None,
            Some(supplied) if !supplied.trim().is_empty() => Some(resolve_slug(supplied, None)?),
            Some(_) => {
                let source = match &name {
                    Some(name) => name.clone(),
                    None => self.stored_name::<E>(id).await?,
                };
                Some(resolve_slug(&source, None)?)
            }
        };

        let mut columns: Columns = Vec::new();
        if let Some(name) = name {
            columns.push(("name", SqlValue::Text(Some(name))));
        }
        if let Some(slug) = slug {
            columns.push(("slug", SqlValue::Text(Some(slug))));
        }
        columns.extend(patch.into_columns());

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE ");
        qb.push(E::KIND.table()).push(" SET ");
        for (column, value) in columns {
            qb.push(column).push(" = ");
            bind_value(&mut qb, value)?;
            qb.push(", ");
        }
        qb.push("updated_at = ").push_bind(Utc::now());
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        qb.build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CatalogError::from_write(e, E::KIND.label()))?
            .ok_or_else(|| CatalogError::not_found(E::KIND.label(), id))
    }

    /// Delete by id together with the links the record owns.
    pub async fn delete<E: CatalogEntity>(&self, id: i64) -> Result<(), CatalogError> {
        let mut tx = self.pool.begin().await?;

        let links = sqlx::query("DELETE FROM links WHERE owner_kind = ? AND owner_id = ?")
            .bind(E::KIND)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let sql = format!("DELETE FROM {} WHERE id = ?", E::KIND.table());
        let res = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::from_write(e, E::KIND.label()))?;
        if res.rows_affected() == 0 {
            return Err(CatalogError::not_found(E::KIND.label(), id));
        }

        tx.commit().await?;
        info!(
            kind = E::KIND.label(),
            id,
            links_removed = links.rows_affected(),
            "deleted record"
        );
        Ok(())
    }

    async fn stored_name<E: CatalogEntity>(&self, id: i64) -> Result<String, CatalogError> {
        let sql = format!("SELECT name FROM {} WHERE id = ?", E::KIND.table());
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(name,)| name).ok_or_else(|| CatalogError::not_found(E::KIND.label(), id))
    }

    pub async fn get_by_id<E: CatalogEntity>(&self, id: i64) -> Result<E, CatalogError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", E::KIND.table());
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::not_found(E::KIND.label(), id))
    }

    pub async fn get_by_slug<E: CatalogEntity>(&self, slug: &str) -> Result<E, CatalogError> {
        let sql = format!("SELECT * FROM {} WHERE slug = ?", E::KIND.table());
        sqlx::query_as::<_, E>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::not_found(E::KIND.label(), slug))
    }

    /// List records ordered by name, optionally narrowed by a
    /// case-insensitive substring match on name or slug.
    pub async fn list<E: CatalogEntity>(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<E>, CatalogError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM ");
        qb.push(E::KIND.table());
        if let Some(q) = search_term(filter.q.as_deref()) {
            let pattern = like_pattern(q);
            qb.push(" WHERE name LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR slug LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\'");
        }
        qb.push(" ORDER BY name COLLATE NOCASE, id LIMIT ")
            .push_bind(i64::from(filter.limit))
            .push(" OFFSET ")
            .push_bind(i64::from(filter.offset));

        Ok(qb.build_query_as::<E>().fetch_all(&self.pool).await?)
    }

    /// Search every entity table. Blank queries match nothing.
    pub async fn search(&self, q: &str, per_kind: u32) -> Result<Vec<SearchHit>, CatalogError> {
        let Some(q) = search_term(Some(q)) else {
            return Ok(Vec::new());
        };
        let pattern = like_pattern(q);
        let mut hits = Vec::new();
        for kind in EntityKind::ALL {
            let sql = format!(
                "SELECT id, name, slug FROM {} \
                 WHERE name LIKE ? ESCAPE '\\' OR slug LIKE ? ESCAPE '\\' \
                 ORDER BY name COLLATE NOCASE LIMIT ?",
                kind.table()
            );
            let rows: Vec<(i64, String, String)> = sqlx::query_as(&sql)
                .bind(pattern.as_str())
                .bind(pattern.as_str())
                .bind(i64::from(per_kind))
                .fetch_all(&self.pool)
                .await?;
            hits.extend(rows.into_iter().map(|(id, name, slug)| SearchHit {
                kind,
                id,
                name,
                slug,
            }));
        }
        Ok(hits)
    }

    pub async fn games_for_console(&self, console_slug: &str) -> Result<Vec<Game>, CatalogError> {
        let console: Console = self.get_by_slug(console_slug).await?;
        let games = sqlx::query_as::<_, Game>(
            "SELECT * FROM games WHERE console_id = ? ORDER BY name COLLATE NOCASE, id",
        )
        .bind(console.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(games)
    }

    /// Emulators whose `console_slugs` array contains the console's slug.
    pub async fn emulators_for_console(
        &self,
        console_slug: &str,
    ) -> Result<Vec<Emulator>, CatalogError> {
        let console: Console = self.get_by_slug(console_slug).await?;
        let emulators = sqlx::query_as::<_, Emulator>(
            r#"SELECT * FROM emulators
               WHERE EXISTS (
                   SELECT 1 FROM json_each(emulators.console_slugs)
                   WHERE json_each.value = ?
               )
               ORDER BY name COLLATE NOCASE, id"#,
        )
        .bind(console.slug)
        .fetch_all(&self.pool)
        .await?;
        Ok(emulators)
    }

    /// Create a tool and its links atomically: a bad link rolls back the tool.
    pub async fn create_tool_bundle(
        &self,
        bundle: NewToolBundle,
    ) -> Result<ToolBundle, CatalogError> {
        let mut tx = self.pool.begin().await?;

        let tool = insert_entity::<Tool>(&mut tx, bundle.tool).await?;
        let mut links = Vec::with_capacity(bundle.links.len());
        for draft in bundle.links {
            let link =
                crate::db::links::insert_link(&mut tx, EntityKind::Tool, tool.id, draft).await?;
            links.push(link);
        }

        tx.commit().await?;
        info!(
            tool = %tool.slug,
            links = links.len(),
            "created tool bundle"
        );
        Ok(ToolBundle { tool, links })
    }
}

/// Insert on an existing connection so callers can compose it in a
/// transaction.
pub(crate) async fn insert_entity<E: CatalogEntity>(
    conn: &mut SqliteConnection,
    draft: E::Draft,
) -> Result<E, CatalogError> {
    let name = required_name(draft.name())?;
    let slug = resolve_slug(&name, draft.slug())?;
    let now = Utc::now();

    let mut columns: Columns = vec![
        ("name", SqlValue::Text(Some(name))),
        ("slug", SqlValue::Text(Some(slug))),
    ];
    columns.extend(draft.into_columns());

    let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO ");
    qb.push(E::KIND.table()).push(" (");
    for (column, _) in &columns {
        qb.push(*column).push(", ");
    }
    qb.push("created_at, updated_at) VALUES (");
    for (_, value) in columns {
        bind_value(&mut qb, value)?;
        qb.push(", ");
    }
    qb.push_bind(now).push(", ").push_bind(now).push(") RETURNING *");

    qb.build_query_as::<E>()
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| CatalogError::from_write(e, E::KIND.label()))
}

fn bind_value(qb: &mut QueryBuilder<'_, Sqlite>, value: SqlValue) -> Result<(), CatalogError> {
    match value {
        SqlValue::Text(v) => qb.push_bind(v),
        SqlValue::Integer(v) => qb.push_bind(v),
        SqlValue::Real(v) => qb.push_bind(v),
        SqlValue::List(items) => qb.push_bind(serde_json::to_string(&items)?),
    };
    Ok(())
}

fn required_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::Validation("name is required".to_string()));
    }
    Ok(name.to_string())
}

fn search_term(q: Option<&str>) -> Option<&str> {
    q.map(str::trim).filter(|q| !q.is_empty())
}

/// `%term%` with LIKE wildcards in the term escaped by `\`.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
