//! Parsing of array-valued form fields.
//!
//! Admin forms submit list fields either as a JSON array or as a single
//! comma-separated string. Both end up as a trimmed `Vec<String>` which is
//! persisted as a JSON text column.

use serde::{Deserialize, Deserializer};

/// Split a list field into its elements.
///
/// Text that parses as a JSON array of strings is taken as-is; anything else
/// (including malformed JSON) falls back to a comma split.
pub fn parse_list(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.starts_with('[')
        && let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed)
    {
        return normalize_items(items);
    }
    normalize_items(trimmed.split(',').map(str::to_string))
}

/// Inverse of [`parse_list`] for display in a text input.
///
/// Falls back to the JSON array form when the comma form would not parse
/// back to the same elements.
pub fn join_list(items: &[String]) -> String {
    let joined = items.join(", ");
    if !items.iter().any(|s| s.contains(',')) && !joined.starts_with('[') {
        return joined;
    }
    match serde_json::to_string(items) {
        Ok(json) => json,
        Err(_) => joined,
    }
}

/// Trim an optional text field; blank input becomes `None`.
pub fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_items(items: impl IntoIterator<Item = String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput {
    Items(Vec<String>),
    Text(String),
}

impl ListInput {
    fn into_items(self) -> Vec<String> {
        match self {
            ListInput::Items(items) => normalize_items(items),
            ListInput::Text(text) => parse_list(&text),
        }
    }
}

/// Serde adapter for required list fields (missing → empty list via `default`).
pub fn deserialize_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<ListInput>::deserialize(de)?;
    Ok(input.map(ListInput::into_items).unwrap_or_default())
}

/// Serde adapter for list fields in a partial patch. Absent stays `None`,
/// explicit `null` clears the list.
pub fn deserialize_patch_list<'de, D>(de: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<ListInput>::deserialize(de)?;
    Ok(Some(input.map(ListInput::into_items).unwrap_or_default()))
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in a partial patch.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn parses_comma_separated() {
        assert_eq!(
            parse_list(" Wi-Fi, Bluetooth ,, HDMI "),
            vec!["Wi-Fi", "Bluetooth", "HDMI"]
        );
    }

    #[test]
    fn parses_json_array() {
        assert_eq!(
            parse_list(r#"["Linux", " Windows ", ""]"#),
            vec!["Linux", "Windows"]
        );
    }

    #[test]
    fn malformed_json_falls_back_to_comma_split() {
        assert_eq!(parse_list(r#"["a", "b""#), vec![r#"["a""#, r#""b""#]);
        assert_eq!(parse_list("[1, 2]"), vec!["[1", "2]"]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
    }

    #[test]
    fn round_trip_preserves_element_set() {
        let original = "cartridge, CD-ROM, floppy";
        let items = parse_list(original);
        let again = parse_list(&join_list(&items));
        let a: BTreeSet<_> = items.into_iter().collect();
        let b: BTreeSet<_> = again.into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn round_trip_keeps_comma_bearing_elements() {
        let items = parse_list(r#"["Wi-Fi 802.11b/g/n, 5GHz", "Bluetooth"]"#);
        let joined = join_list(&items);
        assert_eq!(joined, r#"["Wi-Fi 802.11b/g/n, 5GHz","Bluetooth"]"#);
        assert_eq!(parse_list(&joined), items);

        let bracketed = vec!["[\"x\"]".to_string()];
        assert_eq!(parse_list(&join_list(&bracketed)), bracketed);

        assert_eq!(join_list(&["a".to_string(), "b".to_string()]), "a, b");
    }

    #[test]
    fn clean_text_blanks_to_none() {
        assert_eq!(clean_text(Some("  ".into())), None);
        assert_eq!(clean_text(Some(" Sony ".into())), Some("Sony".into()));
        assert_eq!(clean_text(None), None);
    }

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "deserialize_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "deserialize_patch_list")]
        extra: Option<Vec<String>>,
        #[serde(default, deserialize_with = "double_option")]
        note: Option<Option<String>>,
    }

    #[test]
    fn serde_adapters_accept_both_shapes() {
        let form: Form = serde_json::from_str(r#"{"tags": "a, b", "extra": ["c"]}"#).unwrap();
        assert_eq!(form.tags, vec!["a", "b"]);
        assert_eq!(form.extra, Some(vec!["c".to_string()]));
        assert_eq!(form.note, None);

        let form: Form = serde_json::from_str(r#"{"extra": null, "note": null}"#).unwrap();
        assert!(form.tags.is_empty());
        assert_eq!(form.extra, Some(Vec::new()));
        assert_eq!(form.note, Some(None));
    }
}
