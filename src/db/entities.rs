//! Catalog row types together with their create and patch payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::models::{
    CatalogEntity, Columns, EntityDraft, EntityKind, EntityPatch, PatchColumns, SqlValue, text,
};
use crate::service::list_field::{deserialize_list, deserialize_patch_list, double_option};
use crate::service::slug::slugify;

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Console {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub manufacturer: Option<String>,
    pub release_year: Option<i64>,
    pub generation: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(json)]
    pub media_formats: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewConsole {
    pub name: String,
    pub slug: Option<String>,
    pub manufacturer: Option<String>,
    pub release_year: Option<i64>,
    pub generation: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub media_formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsolePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub manufacturer: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub release_year: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub generation: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_list")]
    pub media_formats: Option<Vec<String>>,
}

impl CatalogEntity for Console {
    const KIND: EntityKind = EntityKind::Console;
    type Draft = NewConsole;
    type Patch = ConsolePatch;
}

impl EntityDraft for NewConsole {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        vec![
            ("manufacturer", text(self.manufacturer)),
            ("release_year", SqlValue::Integer(self.release_year)),
            ("generation", SqlValue::Integer(self.generation)),
            ("description", text(self.description)),
            ("image_url", text(self.image_url)),
            ("media_formats", SqlValue::List(self.media_formats)),
        ]
    }
}

impl EntityPatch for ConsolePatch {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        PatchColumns::default()
            .text("manufacturer", self.manufacturer)
            .integer("release_year", self.release_year)
            .integer("generation", self.generation)
            .text("description", self.description)
            .text("image_url", self.image_url)
            .list("media_formats", self.media_formats)
            .build()
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub console_id: Option<i64>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub release_year: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(json)]
    pub genres: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGame {
    pub name: String,
    pub slug: Option<String>,
    pub console_id: Option<i64>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub release_year: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GamePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub console_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub developer: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub publisher: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub release_year: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_list")]
    pub genres: Option<Vec<String>>,
}

impl CatalogEntity for Game {
    const KIND: EntityKind = EntityKind::Game;
    type Draft = NewGame;
    type Patch = GamePatch;
}

impl EntityDraft for NewGame {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        vec![
            ("console_id", SqlValue::Integer(self.console_id)),
            ("developer", text(self.developer)),
            ("publisher", text(self.publisher)),
            ("release_year", SqlValue::Integer(self.release_year)),
            ("description", text(self.description)),
            ("image_url", text(self.image_url)),
            ("genres", SqlValue::List(self.genres)),
        ]
    }
}

impl EntityPatch for GamePatch {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        PatchColumns::default()
            .integer("console_id", self.console_id)
            .text("developer", self.developer)
            .text("publisher", self.publisher)
            .integer("release_year", self.release_year)
            .text("description", self.description)
            .text("image_url", self.image_url)
            .list("genres", self.genres)
            .build()
    }
}

// ---------------------------------------------------------------------------
// Emulator
// ---------------------------------------------------------------------------

/// Emulated systems are kept as an array of console slugs rather than a
/// join table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Emulator {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub repository_url: Option<String>,
    pub license: Option<String>,
    #[sqlx(json)]
    pub host_platforms: Vec<String>,
    #[sqlx(json)]
    pub console_slugs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEmulator {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub repository_url: Option<String>,
    pub license: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub host_platforms: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub console_slugs: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmulatorPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub website_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub repository_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub license: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_list")]
    pub host_platforms: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_list")]
    pub console_slugs: Option<Vec<String>>,
}

impl CatalogEntity for Emulator {
    const KIND: EntityKind = EntityKind::Emulator;
    type Draft = NewEmulator;
    type Patch = EmulatorPatch;
}

impl EntityDraft for NewEmulator {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        vec![
            ("description", text(self.description)),
            ("website_url", text(self.website_url)),
            ("repository_url", text(self.repository_url)),
            ("license", text(self.license)),
            ("host_platforms", SqlValue::List(self.host_platforms)),
            ("console_slugs", SqlValue::List(slug_list(self.console_slugs))),
        ]
    }
}

impl EntityPatch for EmulatorPatch {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        PatchColumns::default()
            .text("description", self.description)
            .text("website_url", self.website_url)
            .text("repository_url", self.repository_url)
            .text("license", self.license)
            .list("host_platforms", self.host_platforms)
            .list("console_slugs", self.console_slugs.map(slug_list))
            .build()
    }
}

/// Normalize free-form console references so they compare equal to
/// `consoles.slug`. Duplicates and blanks are dropped, order is kept.
fn slug_list(items: Vec<String>) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::with_capacity(items.len());
    for slug in items.iter().map(|s| slugify(s)) {
        if !slug.is_empty() && !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    slugs
}

// ---------------------------------------------------------------------------
// Handheld
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Handheld {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub manufacturer: Option<String>,
    pub release_year: Option<i64>,
    pub os: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub screen_size: Option<String>,
    pub resolution: Option<String>,
    pub battery: Option<String>,
    pub price_usd: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(json)]
    pub connectivity: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHandheld {
    pub name: String,
    pub slug: Option<String>,
    pub manufacturer: Option<String>,
    pub release_year: Option<i64>,
    pub os: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub screen_size: Option<String>,
    pub resolution: Option<String>,
    pub battery: Option<String>,
    pub price_usd: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub connectivity: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandheldPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub manufacturer: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub release_year: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub os: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cpu: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub ram: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub screen_size: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub resolution: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub battery: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub price_usd: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_list")]
    pub connectivity: Option<Vec<String>>,
}

impl CatalogEntity for Handheld {
    const KIND: EntityKind = EntityKind::Handheld;
    type Draft = NewHandheld;
    type Patch = HandheldPatch;
}

impl EntityDraft for NewHandheld {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        vec![
            ("manufacturer", text(self.manufacturer)),
            ("release_year", SqlValue::Integer(self.release_year)),
            ("os", text(self.os)),
            ("cpu", text(self.cpu)),
            ("ram", text(self.ram)),
            ("screen_size", text(self.screen_size)),
            ("resolution", text(self.resolution)),
            ("battery", text(self.battery)),
            ("price_usd", SqlValue::Real(self.price_usd)),
            ("description", text(self.description)),
            ("image_url", text(self.image_url)),
            ("connectivity", SqlValue::List(self.connectivity)),
        ]
    }
}

impl EntityPatch for HandheldPatch {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        PatchColumns::default()
            .text("manufacturer", self.manufacturer)
            .integer("release_year", self.release_year)
            .text("os", self.os)
            .text("cpu", self.cpu)
            .text("ram", self.ram)
            .text("screen_size", self.screen_size)
            .text("resolution", self.resolution)
            .text("battery", self.battery)
            .real("price_usd", self.price_usd)
            .text("description", self.description)
            .text("image_url", self.image_url)
            .list("connectivity", self.connectivity)
            .build()
    }
}

// ---------------------------------------------------------------------------
// Custom firmware
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CustomFirmware {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub repository_url: Option<String>,
    #[sqlx(json)]
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCustomFirmware {
    pub name: String,
    pub slug: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub repository_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomFirmwarePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub version: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub website_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub repository_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_list")]
    pub features: Option<Vec<String>>,
}

impl CatalogEntity for CustomFirmware {
    const KIND: EntityKind = EntityKind::CustomFirmware;
    type Draft = NewCustomFirmware;
    type Patch = CustomFirmwarePatch;
}

impl EntityDraft for NewCustomFirmware {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        vec![
            ("version", text(self.version)),
            ("description", text(self.description)),
            ("website_url", text(self.website_url)),
            ("repository_url", text(self.repository_url)),
            ("features", SqlValue::List(self.features)),
        ]
    }
}

impl EntityPatch for CustomFirmwarePatch {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        PatchColumns::default()
            .text("version", self.version)
            .text("description", self.description)
            .text("website_url", self.website_url)
            .text("repository_url", self.repository_url)
            .list("features", self.features)
            .build()
    }
}

// ---------------------------------------------------------------------------
// CFW app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CfwApp {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub repository_url: Option<String>,
    #[sqlx(json)]
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCfwApp {
    pub name: String,
    pub slug: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub repository_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CfwAppPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub repository_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_list")]
    pub categories: Option<Vec<String>>,
}

impl CatalogEntity for CfwApp {
    const KIND: EntityKind = EntityKind::CfwApp;
    type Draft = NewCfwApp;
    type Patch = CfwAppPatch;
}

impl EntityDraft for NewCfwApp {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        vec![
            ("author", text(self.author)),
            ("description", text(self.description)),
            ("repository_url", text(self.repository_url)),
            ("categories", SqlValue::List(self.categories)),
        ]
    }
}

impl EntityPatch for CfwAppPatch {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        PatchColumns::default()
            .text("author", self.author)
            .text("description", self.description)
            .text("repository_url", self.repository_url)
            .list("categories", self.categories)
            .build()
    }
}

// ---------------------------------------------------------------------------
// Tool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Tool {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub repository_url: Option<String>,
    #[sqlx(json)]
    pub platforms: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTool {
    pub name: String,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub repository_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub website_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub repository_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch_list")]
    pub platforms: Option<Vec<String>>,
}

impl CatalogEntity for Tool {
    const KIND: EntityKind = EntityKind::Tool;
    type Draft = NewTool;
    type Patch = ToolPatch;
}

impl EntityDraft for NewTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        vec![
            ("category", text(self.category)),
            ("description", text(self.description)),
            ("website_url", text(self.website_url)),
            ("repository_url", text(self.repository_url)),
            ("platforms", SqlValue::List(self.platforms)),
        ]
    }
}

impl EntityPatch for ToolPatch {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    fn into_columns(self) -> Columns {
        PatchColumns::default()
            .text("category", self.category)
            .text("description", self.description)
            .text("website_url", self.website_url)
            .text("repository_url", self.repository_url)
            .list("platforms", self.platforms)
            .build()
    }
}

/// A tool plus the links created alongside it in one transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewToolBundle {
    pub tool: NewTool,
    #[serde(default)]
    pub links: Vec<super::models::LinkDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolBundle {
    pub tool: Tool,
    pub links: Vec<super::models::Link>,
}
