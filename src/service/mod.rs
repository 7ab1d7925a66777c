//! Form-level normalization shared by every write path.

pub mod list_field;
pub mod slug;

pub use list_field::{join_list, parse_list};
pub use slug::{resolve_slug, slugify};
