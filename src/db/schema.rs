//! SQL DDL for the catalog.
//!
//! - `slug` is UNIQUE per entity table; duplicates surface as a conflict
//! - list-valued columns hold a JSON array serialized as text
//! - join tables key on the pair, so a repeated add updates in place
//! - join rows cascade with either side; games keep existing with a NULL
//!   console when their console is removed

pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS consoles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    manufacturer TEXT NULL,
    release_year INTEGER NULL,
    generation INTEGER NULL,
    description TEXT NULL,
    image_url TEXT NULL,
    media_formats TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    console_id INTEGER NULL REFERENCES consoles(id) ON DELETE SET NULL,
    developer TEXT NULL,
    publisher TEXT NULL,
    release_year INTEGER NULL,
    description TEXT NULL,
    image_url TEXT NULL,
    genres TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_games_console_id ON games(console_id);

CREATE TABLE IF NOT EXISTS emulators (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    description TEXT NULL,
    website_url TEXT NULL,
    repository_url TEXT NULL,
    license TEXT NULL,
    host_platforms TEXT NOT NULL DEFAULT '[]',
    console_slugs TEXT NOT NULL DEFAULT '[]', -- JSON array of consoles.slug
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS handhelds (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    manufacturer TEXT NULL,
    release_year INTEGER NULL,
    os TEXT NULL,
    cpu TEXT NULL,
    ram TEXT NULL,
    screen_size TEXT NULL,
    resolution TEXT NULL,
    battery TEXT NULL,
    price_usd REAL NULL,
    description TEXT NULL,
    image_url TEXT NULL,
    connectivity TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS custom_firmware (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    version TEXT NULL,
    description TEXT NULL,
    website_url TEXT NULL,
    repository_url TEXT NULL,
    features TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cfw_apps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    author TEXT NULL,
    description TEXT NULL,
    repository_url TEXT NULL,
    categories TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tools (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    category TEXT NULL,
    description TEXT NULL,
    website_url TEXT NULL,
    repository_url TEXT NULL,
    platforms TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_kind TEXT NOT NULL,
    owner_id INTEGER NOT NULL,
    label TEXT NOT NULL,
    url TEXT NOT NULL,
    link_type TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_links_owner ON links(owner_kind, owner_id);

CREATE TABLE IF NOT EXISTS handheld_custom_firmware (
    handheld_id INTEGER NOT NULL REFERENCES handhelds(id) ON DELETE CASCADE,
    firmware_id INTEGER NOT NULL REFERENCES custom_firmware(id) ON DELETE CASCADE,
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (handheld_id, firmware_id)
);

CREATE TABLE IF NOT EXISTS emulator_handheld_compatibility (
    emulator_id INTEGER NOT NULL REFERENCES emulators(id) ON DELETE CASCADE,
    handheld_id INTEGER NOT NULL REFERENCES handhelds(id) ON DELETE CASCADE,
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (emulator_id, handheld_id)
);

CREATE TABLE IF NOT EXISTS cfw_app_firmware_compatibility (
    app_id INTEGER NOT NULL REFERENCES cfw_apps(id) ON DELETE CASCADE,
    firmware_id INTEGER NOT NULL REFERENCES custom_firmware(id) ON DELETE CASCADE,
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (app_id, firmware_id)
);

CREATE TABLE IF NOT EXISTS tool_console_compatibility (
    tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
    console_id INTEGER NOT NULL REFERENCES consoles(id) ON DELETE CASCADE,
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (tool_id, console_id)
);

CREATE TABLE IF NOT EXISTS tool_emulator_compatibility (
    tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
    emulator_id INTEGER NOT NULL REFERENCES emulators(id) ON DELETE CASCADE,
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (tool_id, emulator_id)
);

CREATE TABLE IF NOT EXISTS tool_game_compatibility (
    tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
    game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (tool_id, game_id)
);

CREATE TABLE IF NOT EXISTS tool_handheld_compatibility (
    tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
    handheld_id INTEGER NOT NULL REFERENCES handhelds(id) ON DELETE CASCADE,
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (tool_id, handheld_id)
);

CREATE TABLE IF NOT EXISTS tool_firmware_compatibility (
    tool_id INTEGER NOT NULL REFERENCES tools(id) ON DELETE CASCADE,
    firmware_id INTEGER NOT NULL REFERENCES custom_firmware(id) ON DELETE CASCADE,
    notes TEXT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (tool_id, firmware_id)
);
"#;
