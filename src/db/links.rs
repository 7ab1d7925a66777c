//! External links (downloads, homepages, docs) owned by a catalog record.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;
use url::Url;

use crate::db::models::{EntityKind, Link, LinkDraft, LinkPatch, NewLink};
use crate::db::sqlite::CatalogStorage;
use crate::error::CatalogError;

impl CatalogStorage {
    pub async fn create_link(&self, new: NewLink) -> Result<Link, CatalogError> {
        let mut conn = self.pool().acquire().await?;
        insert_link(&mut conn, new.owner_kind, new.owner_id, new.link).await
    }

    pub async fn update_link(&self, id: i64, patch: LinkPatch) -> Result<Link, CatalogError> {
        let current = self.get_link(id).await?;
        let label = match patch.label {
            Some(label) => required_label(&label)?,
            None => current.label,
        };
        let url = match patch.url {
            Some(url) => validate_url(&url)?,
            None => current.url,
        };
        let link_type = patch.link_type.unwrap_or(current.link_type);

        sqlx::query_as::<_, Link>(
            "UPDATE links SET label = ?, url = ?, link_type = ? WHERE id = ? RETURNING *",
        )
        .bind(label)
        .bind(url)
        .bind(link_type)
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("link", id))
    }

    pub async fn delete_link(&self, id: i64) -> Result<(), CatalogError> {
        let res = sqlx::query("DELETE FROM links WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if res.rows_affected() == 0 {
            return Err(CatalogError::not_found("link", id));
        }
        Ok(())
    }

    pub async fn get_link(&self, id: i64) -> Result<Link, CatalogError> {
        sqlx::query_as::<_, Link>("SELECT * FROM links WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| CatalogError::not_found("link", id))
    }

    /// Links of one record in insertion order.
    pub async fn links_for(
        &self,
        owner_kind: EntityKind,
        owner_id: i64,
    ) -> Result<Vec<Link>, CatalogError> {
        let rows = sqlx::query_as::<_, Link>(
            "SELECT * FROM links WHERE owner_kind = ? AND owner_id = ? ORDER BY id",
        )
        .bind(owner_kind)
        .bind(owner_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}

/// Insert on an existing connection; the owner must already exist there.
pub(crate) async fn insert_link(
    conn: &mut SqliteConnection,
    owner_kind: EntityKind,
    owner_id: i64,
    draft: LinkDraft,
) -> Result<Link, CatalogError> {
    let label = required_label(&draft.label)?;
    let url = validate_url(&draft.url)?;

    let sql = format!("SELECT id FROM {} WHERE id = ?", owner_kind.table());
    let owner: Option<(i64,)> = sqlx::query_as(&sql)
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await?;
    if owner.is_none() {
        return Err(CatalogError::MissingReference(format!(
            "link owner {} {} does not exist",
            owner_kind.label(),
            owner_id
        )));
    }

    let link = sqlx::query_as::<_, Link>(
        r#"INSERT INTO links (owner_kind, owner_id, label, url, link_type, created_at)
           VALUES (?, ?, ?, ?, ?, ?)
           RETURNING *"#,
    )
    .bind(owner_kind)
    .bind(owner_id)
    .bind(label)
    .bind(url)
    .bind(draft.link_type)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;
    debug!(id = link.id, owner = owner_kind.label(), owner_id, "link created");
    Ok(link)
}

fn required_label(label: &str) -> Result<String, CatalogError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(CatalogError::Validation("link label is required".to_string()));
    }
    Ok(label.to_string())
}

/// Links must be absolute http(s) URLs.
fn validate_url(raw: &str) -> Result<String, CatalogError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| CatalogError::Validation(format!("invalid link url {raw:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        other => Err(CatalogError::Validation(format!(
            "unsupported link scheme {other:?}"
        ))),
    }
}
