use crate::error::CatalogError;

/// Normalize free text into a URL-safe slug.
///
/// ASCII alphanumerics are lowercased, every other run of characters
/// collapses into one `-`, and leading/trailing hyphens are dropped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}

/// Pick the slug for a record: an explicit non-blank slug wins, otherwise it
/// is derived from the name. Both paths go through [`slugify`].
pub fn resolve_slug(name: &str, supplied: Option<&str>) -> Result<String, CatalogError> {
    let source = supplied
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(name);
    let slug = slugify(source);
    if slug.is_empty() {
        return Err(CatalogError::Validation(format!(
            "cannot derive a slug from {source:?}"
        )));
    }
    Ok(slug)
}
