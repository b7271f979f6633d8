use crate::types::Collection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{ser::PrettyFormatter, Deserializer, Serializer, Value};
use std::{fs, path::Path};

const INDENT: &[u8] = b"    ";

pub fn open_collection<P: AsRef<Path>>(path: P) -> Result<Collection>
where
    P: std::fmt::Debug,
{
    let file = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to open file: {:?}", path))?;
    let value = parse_json(file.as_str())
        .with_context(|| format!("Failed to parse json: {:?}", path))?;
    let collection = Collection::try_from(value)
        .with_context(|| format!("Not a Postman collection: {:?}", path))?;
    Ok(collection)
}

/// Parses without a nesting limit. Deep input grows the heap instead of the
/// stack.
fn parse_json(text: &str) -> serde_json::Result<Value> {
    let mut json = Deserializer::from_str(text);
    json.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}

/// Renders the collection with a 4-space indent and no trailing newline.
pub fn to_pretty_string(collection: &Collection) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    collection
        .serialize(&mut ser)
        .with_context(|| "Failed to serialize collection.")?;
    String::from_utf8(buf).with_context(|| "Serialized collection is not valid UTF-8.")
}

/// Overwrites `path`. The file is written in one go but not atomically.
pub fn save_collection<P: AsRef<Path>>(path: P, collection: &Collection) -> Result<()>
where
    P: std::fmt::Debug,
{
    let text = to_pretty_string(collection)?;
    fs::write(path.as_ref(), text).with_context(|| format!("Failed to write file: {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Node;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn writes_four_space_indent() {
        let collection = Collection::try_from(serde_json::json!({
            "info": {"name": "Products"},
            "item": [{"name": "Get User", "event": []}]
        }))
        .unwrap();

        let expected = r#"{
    "info": {
        "name": "Products"
    },
    "item": [
        {
            "name": "Get User",
            "event": []
        }
    ]
}"#;
        assert_eq!(to_pretty_string(&collection).unwrap(), expected);
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Products.postman_collection.json");
        fs::write(
            &path,
            r#"{"item":[{"name":"Folder","item":[{"name":"Req"}]}],"variable":[{"key":"host"}]}"#,
        )
        .unwrap();

        let collection = open_collection(&path).unwrap();
        save_collection(&path, &collection).unwrap();

        let reread: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            reread,
            serde_json::json!({
                "item": [{"name": "Folder", "item": [{"name": "Req"}]}],
                "variable": [{"key": "host"}]
            })
        );
    }

    #[test]
    fn keeps_non_ascii_text_as_utf8() {
        let collection =
            Collection::try_from(serde_json::json!({"item": [{"name": "Pedidos: añadir"}]})).unwrap();
        assert!(to_pretty_string(&collection).unwrap().contains("Pedidos: añadir"));
    }

    #[test]
    fn keeps_numbers_exactly_as_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("numbers.json");
        let input = r#"{"item":[],"id":12345678901234567890123,"ratio":1.50}"#;
        fs::write(&path, input).unwrap();

        let collection = open_collection(&path).unwrap();
        save_collection(&path, &collection).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#""id": 12345678901234567890123"#));
        assert!(text.contains(r#""ratio": 1.50"#));
    }

    #[test]
    fn accepts_deeply_nested_folders() {
        let depth = 100;
        let mut text = String::from(r#"{"item":["#);
        for level in 0..depth {
            text.push_str(&format!(r#"{{"name":"Folder {}","item":["#, level));
        }
        text.push_str(r#"{"name":"Leaf"}"#);
        for _ in 0..depth {
            text.push_str("]}");
        }
        text.push_str("]}");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep.json");
        fs::write(&path, &text).unwrap();

        let collection = open_collection(&path).unwrap();
        save_collection(&path, &collection).unwrap();

        let reread = open_collection(&path).unwrap();
        assert_eq!(reread, collection);
        let mut node = &reread.items[0];
        for _ in 0..depth {
            match node {
                Node::Folder { children, .. } => node = &children[0],
                Node::Request(_) => panic!("folder chain ended early"),
            }
        }
        assert!(matches!(node, Node::Request(fields) if fields["name"] == "Leaf"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = open_collection(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to open file"));
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"item\": [").unwrap();

        let err = open_collection(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse json"));
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn wrong_shape_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = open_collection(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<crate::types::ShapeError>(),
            Some(&crate::types::ShapeError::RootNotObject)
        );
    }
}
