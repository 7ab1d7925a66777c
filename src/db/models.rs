use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

use crate::service::list_field::clean_text;

/// Every slug-bearing catalog table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EntityKind {
    Console,
    Game,
    Emulator,
    Handheld,
    CustomFirmware,
    CfwApp,
    Tool,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Console,
        EntityKind::Game,
        EntityKind::Emulator,
        EntityKind::Handheld,
        EntityKind::CustomFirmware,
        EntityKind::CfwApp,
        EntityKind::Tool,
    ];

    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Console => "consoles",
            EntityKind::Game => "games",
            EntityKind::Emulator => "emulators",
            EntityKind::Handheld => "handhelds",
            EntityKind::CustomFirmware => "custom_firmware",
            EntityKind::CfwApp => "cfw_apps",
            EntityKind::Tool => "tools",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Console => "console",
            EntityKind::Game => "game",
            EntityKind::Emulator => "emulator",
            EntityKind::Handheld => "handheld",
            EntityKind::CustomFirmware => "custom firmware",
            EntityKind::CfwApp => "cfw app",
            EntityKind::Tool => "tool",
        }
    }
}

/// A single bindable column value. List values are stored as JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Integer(Option<i64>),
    Real(Option<f64>),
    List(Vec<String>),
}

pub type Columns = Vec<(&'static str, SqlValue)>;

/// A row type stored in one of the [`EntityKind`] tables.
pub trait CatalogEntity:
    for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Unpin + 'static
{
    const KIND: EntityKind;
    type Draft: EntityDraft;
    type Patch: EntityPatch;
}

/// Payload for creating a record.
pub trait EntityDraft: DeserializeOwned + Send + 'static {
    fn name(&self) -> &str;
    fn slug(&self) -> Option<&str>;
    /// Descriptive columns only; storage writes name, slug and timestamps.
    fn into_columns(self) -> Columns;
}

/// Partial update. Absent fields are left untouched.
pub trait EntityPatch: DeserializeOwned + Send + 'static {
    fn name(&self) -> Option<&str>;
    fn slug(&self) -> Option<&str>;
    fn into_columns(self) -> Columns;
}

pub(crate) fn text(value: Option<String>) -> SqlValue {
    SqlValue::Text(clean_text(value))
}

/// Collects only the fields a patch actually carries.
#[derive(Default)]
pub(crate) struct PatchColumns(Columns);

impl PatchColumns {
    pub fn text(mut self, column: &'static str, value: Option<Option<String>>) -> Self {
        if let Some(v) = value {
            self.0.push((column, text(v)));
        }
        self
    }

    pub fn integer(mut self, column: &'static str, value: Option<Option<i64>>) -> Self {
        if let Some(v) = value {
            self.0.push((column, SqlValue::Integer(v)));
        }
        self
    }

    pub fn real(mut self, column: &'static str, value: Option<Option<f64>>) -> Self {
        if let Some(v) = value {
            self.0.push((column, SqlValue::Real(v)));
        }
        self
    }

    pub fn list(mut self, column: &'static str, value: Option<Vec<String>>) -> Self {
        if let Some(v) = value {
            self.0.push((column, SqlValue::List(v)));
        }
        self
    }

    pub fn build(self) -> Columns {
        self.0
    }
}

/// Cross-entity search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub kind: EntityKind,
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum LinkType {
    Download,
    Website,
    Source,
    Documentation,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Link {
    pub id: i64,
    pub owner_kind: EntityKind,
    pub owner_id: i64,
    pub label: String,
    pub url: String,
    pub link_type: LinkType,
    pub created_at: DateTime<Utc>,
}

/// A link as submitted together with its owner (the owner is implied).
#[derive(Debug, Clone, Deserialize)]
pub struct LinkDraft {
    pub label: String,
    pub url: String,
    #[serde(default = "default_link_type")]
    pub link_type: LinkType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLink {
    pub owner_kind: EntityKind,
    pub owner_id: i64,
    #[serde(flatten)]
    pub link: LinkDraft,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkPatch {
    pub label: Option<String>,
    pub url: Option<String>,
    pub link_type: Option<LinkType>,
}

fn default_link_type() -> LinkType {
    LinkType::Website
}

/// The far side of a compatibility row, joined for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CompatEntry {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A stored compatibility row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CompatLink {
    pub left_id: i64,
    pub right_id: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
