//! Many-to-many compatibility relations.
//!
//! Every relation is a join table keyed on the `(left, right)` pair with an
//! optional free-text note. One implementation serves all of them; the
//! relation only decides table and column names.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::models::{CompatEntry, CompatLink, EntityKind};
use crate::db::sqlite::CatalogStorage;
use crate::error::CatalogError;
use crate::service::list_field::clean_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompatRelation {
    HandheldFirmware,
    EmulatorHandheld,
    AppFirmware,
    ToolConsole,
    ToolEmulator,
    ToolGame,
    ToolHandheld,
    ToolFirmware,
}

struct JoinTable {
    table: &'static str,
    left_column: &'static str,
    right_column: &'static str,
    left: EntityKind,
    right: EntityKind,
}

impl CompatRelation {
    pub const ALL: [CompatRelation; 8] = [
        CompatRelation::HandheldFirmware,
        CompatRelation::EmulatorHandheld,
        CompatRelation::AppFirmware,
        CompatRelation::ToolConsole,
        CompatRelation::ToolEmulator,
        CompatRelation::ToolGame,
        CompatRelation::ToolHandheld,
        CompatRelation::ToolFirmware,
    ];

    fn join(self) -> JoinTable {
        use EntityKind as K;
        let (table, left_column, right_column, left, right) = match self {
            CompatRelation::HandheldFirmware => (
                "handheld_custom_firmware",
                "handheld_id",
                "firmware_id",
                K::Handheld,
                K::CustomFirmware,
            ),
            CompatRelation::EmulatorHandheld => (
                "emulator_handheld_compatibility",
                "emulator_id",
                "handheld_id",
                K::Emulator,
                K::Handheld,
            ),
            CompatRelation::AppFirmware => (
                "cfw_app_firmware_compatibility",
                "app_id",
                "firmware_id",
                K::CfwApp,
                K::CustomFirmware,
            ),
            CompatRelation::ToolConsole => (
                "tool_console_compatibility",
                "tool_id",
                "console_id",
                K::Tool,
                K::Console,
            ),
            CompatRelation::ToolEmulator => (
                "tool_emulator_compatibility",
                "tool_id",
                "emulator_id",
                K::Tool,
                K::Emulator,
            ),
            CompatRelation::ToolGame => (
                "tool_game_compatibility",
                "tool_id",
                "game_id",
                K::Tool,
                K::Game,
            ),
            CompatRelation::ToolHandheld => (
                "tool_handheld_compatibility",
                "tool_id",
                "handheld_id",
                K::Tool,
                K::Handheld,
            ),
            CompatRelation::ToolFirmware => (
                "tool_firmware_compatibility",
                "tool_id",
                "firmware_id",
                K::Tool,
                K::CustomFirmware,
            ),
        };
        JoinTable {
            table,
            left_column,
            right_column,
            left,
            right,
        }
    }

    pub fn left_kind(self) -> EntityKind {
        self.join().left
    }

    pub fn right_kind(self) -> EntityKind {
        self.join().right
    }

    fn label(self) -> String {
        let j = self.join();
        format!("{}/{} compatibility", j.left.label(), j.right.label())
    }
}

/// Request body for adding a compatibility row.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompat {
    pub left_id: i64,
    pub right_id: i64,
    pub notes: Option<String>,
}

impl CatalogStorage {
    /// Link two records. Submitting the same pair again keeps the original
    /// row and replaces its notes.
    pub async fn add_compat(
        &self,
        relation: CompatRelation,
        new: NewCompat,
    ) -> Result<CompatLink, CatalogError> {
        let j = relation.join();
        let sql = format!(
            r#"INSERT INTO {t} ({l}, {r}, notes, created_at) VALUES (?, ?, ?, ?)
               ON CONFLICT({l}, {r}) DO UPDATE SET notes = excluded.notes
               RETURNING {l} AS left_id, {r} AS right_id, notes, created_at"#,
            t = j.table,
            l = j.left_column,
            r = j.right_column,
        );
        let row = sqlx::query_as::<_, CompatLink>(&sql)
            .bind(new.left_id)
            .bind(new.right_id)
            .bind(clean_text(new.notes))
            .bind(Utc::now())
            .fetch_one(self.pool())
            .await
            .map_err(|e| CatalogError::from_write(e, &relation.label()))?;
        info!(
            relation = j.table,
            left = new.left_id,
            right = new.right_id,
            "compatibility recorded"
        );
        Ok(row)
    }

    pub async fn remove_compat(
        &self,
        relation: CompatRelation,
        left_id: i64,
        right_id: i64,
    ) -> Result<(), CatalogError> {
        let j = relation.join();
        let sql = format!(
            "DELETE FROM {} WHERE {} = ? AND {} = ?",
            j.table, j.left_column, j.right_column
        );
        let res = sqlx::query(&sql)
            .bind(left_id)
            .bind(right_id)
            .execute(self.pool())
            .await?;
        if res.rows_affected() == 0 {
            return Err(CatalogError::NotFound {
                kind: "compatibility",
                key: format!("{left_id}/{right_id}"),
            });
        }
        info!(relation = j.table, left = left_id, right = right_id, "compatibility removed");
        Ok(())
    }

    /// Right-hand records linked to `left_id`, oldest link first.
    pub async fn compat_for_left(
        &self,
        relation: CompatRelation,
        left_id: i64,
    ) -> Result<Vec<CompatEntry>, CatalogError> {
        let j = relation.join();
        self.compat_entries(j.table, j.right.table(), j.right_column, j.left_column, left_id)
            .await
    }

    /// Left-hand records linked to `right_id`, oldest link first.
    pub async fn compat_for_right(
        &self,
        relation: CompatRelation,
        right_id: i64,
    ) -> Result<Vec<CompatEntry>, CatalogError> {
        let j = relation.join();
        self.compat_entries(j.table, j.left.table(), j.left_column, j.right_column, right_id)
            .await
    }

    async fn compat_entries(
        &self,
        join_table: &str,
        other_table: &str,
        other_column: &str,
        key_column: &str,
        key: i64,
    ) -> Result<Vec<CompatEntry>, CatalogError> {
        let sql = format!(
            r#"SELECT o.id, o.name, o.slug, j.notes, j.created_at
               FROM {join_table} j
               JOIN {other_table} o ON o.id = j.{other_column}
               WHERE j.{key_column} = ?
               ORDER BY j.rowid"#
        );
        let rows = sqlx::query_as::<_, CompatEntry>(&sql)
            .bind(key)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }
}
