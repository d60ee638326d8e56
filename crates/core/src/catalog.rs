//! Built-in tables and the JSON table loader.

use crate::error::LoadError;
use crate::lookup::{Keyed, ResourceTable};
use crate::types::{Document, Restaurant, UserRecord};
use serde::de::DeserializeOwned;
use std::path::Path;

const DOCUMENTS: [(&str, &str, &str); 3] = [
    (
        "intro",
        "Introduction to MCP Resources",
        include_str!("../assets/docs/intro.md"),
    ),
    (
        "quickstart",
        "MCP Quickstart",
        include_str!("../assets/docs/quickstart.md"),
    ),
    (
        "examples",
        "MCP Resource Examples",
        include_str!("../assets/docs/examples.md"),
    ),
];

const USERS_JSON: &str = include_str!("../assets/users.json");

/// The markdown documents compiled into the binary.
pub fn builtin_documents() -> Result<ResourceTable<Document>, LoadError> {
    ResourceTable::from_records(DOCUMENTS.iter().map(|(name, title, body)| Document {
        name: name.to_string(),
        title: title.to_string(),
        body: body.to_string(),
    }))
}

/// The sample user records compiled into the binary.
pub fn builtin_users() -> Result<ResourceTable<UserRecord>, LoadError> {
    parse_keyed_json("builtin users", USERS_JSON)
}

/// Load the restaurant listings from a JSON object keyed by name.
pub fn load_restaurants(path: &Path) -> Result<ResourceTable<Restaurant>, LoadError> {
    load_keyed_json(path)
}

/// Parse a JSON object of `key -> record`, keeping document order.
///
/// Each record must be stored under its own key.
pub fn parse_keyed_json<R>(origin: &str, json: &str) -> Result<ResourceTable<R>, LoadError>
where
    R: DeserializeOwned + Keyed,
{
    let table: ResourceTable<R> = serde_json::from_str(json).map_err(|source| LoadError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    table.check_keys()?;
    Ok(table)
}

pub fn load_keyed_json<R>(path: &Path) -> Result<ResourceTable<R>, LoadError>
where
    R: DeserializeOwned + Keyed,
{
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_keyed_json(&path.display().to_string(), &json)?;
    tracing::info!(path = %path.display(), records = table.len(), "Loaded table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RESTAURANTS: &str = r#"{
        "La Trattoria": {
            "name": "La Trattoria",
            "category": "Italian",
            "hours": "11:00-22:00",
            "phone": "02-1234-5678",
            "address": "123 Nonhyeon-dong, Gangnam-gu, Seoul"
        },
        "Seoul Grill": {
            "name": "Seoul Grill",
            "category": "Korean",
            "hours": "09:00-20:00",
            "phone": "02-3456-7890",
            "address": "789 Insa-dong, Jongno-gu, Seoul"
        },
        "Pasta House": {
            "name": "Pasta House",
            "category": "Italian",
            "hours": "10:00-21:00",
            "phone": "02-2345-6789",
            "address": "456 Seocho-dong, Seocho-gu, Seoul"
        }
    }"#;

    #[test]
    fn test_builtin_documents() {
        let docs = builtin_documents().unwrap();
        assert_eq!(docs.list_keys(), vec!["intro", "quickstart", "examples"]);
        assert!(docs.get("intro").unwrap().body.starts_with("# Introduction"));

        let err = docs.get("missing").unwrap_err();
        assert_eq!(err.available(), docs.list_keys().as_slice());
    }

    #[test]
    fn test_builtin_users() {
        let users = builtin_users().unwrap();
        assert_eq!(users.list_keys(), vec!["1", "2", "3"]);

        let kim = users.get("1").unwrap();
        assert_eq!(kim.email, "kim@example.com");
        assert_eq!(kim.joined.to_string(), "2024-01-15");

        let err = users.get("9999").unwrap_err();
        assert_eq!(err.available(), users.list_keys().as_slice());
    }

    #[test]
    fn test_load_restaurants_keeps_file_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("restaurants.json");
        std::fs::write(&path, RESTAURANTS).unwrap();

        let table = load_restaurants(&path).unwrap();
        assert_eq!(
            table.list_keys(),
            vec!["La Trattoria", "Seoul Grill", "Pasta House"]
        );

        let trattoria = table.get("La Trattoria").unwrap();
        assert_eq!(trattoria.hours, "11:00-22:00");
        assert_eq!(trattoria.phone, "02-1234-5678");

        let italian = table.filter(|r| r.category == "Italian");
        let names: Vec<_> = italian.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["La Trattoria", "Pasta House"]);
    }

    #[test]
    fn test_record_under_wrong_key_is_refused() {
        let json = r#"{"Alias": {"name": "Real", "category": "Korean",
            "hours": "", "phone": "", "address": ""}}"#;
        let err = parse_keyed_json::<Restaurant>("test", json).unwrap_err();
        assert!(matches!(err, LoadError::KeyMismatch { ref key, ref name } if key == "Alias" && name == "Real"));
    }

    #[test]
    fn test_missing_field_fails_at_load() {
        let json = r#"{"Real": {"name": "Real", "category": "Korean"}}"#;
        let err = parse_keyed_json::<Restaurant>("test", json).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_restaurants(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
