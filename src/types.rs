use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub const ITEM_KEY: &str = "item";

pub type Fields = Map<String, Value>;

/// A node of the collection tree did not have the shape a Postman export has.
///
/// The string carried by each variant is the JSON path of the offending
/// value, e.g. `item[0].item[2].event[1]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("collection root must be a JSON object")]
    RootNotObject,
    #[error("collection root has no `item` list")]
    MissingItems,
    #[error("`{0}` must be an array")]
    ItemsNotArray(String),
    #[error("node `{0}` must be a JSON object")]
    NodeNotObject(String),
    #[error("`{0}` must be an array")]
    EventsNotArray(String),
    #[error("event `{0}` must be a JSON object")]
    EventNotObject(String),
}

/// Root of a Postman collection.
///
/// Every root field other than `item` is kept untouched, in its original
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    fields: Fields,
    pub items: Vec<Node>,
}

/// An entry of an `item` list, classified once when the tree is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Has an `item` key. `fields` keeps a `null` placeholder under `item` so
    /// the children are written back at their original position.
    Folder { fields: Fields, children: Vec<Node> },
    Request(Fields),
}

impl Collection {
    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl TryFrom<Value> for Collection {
    type Error = ShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(ShapeError::RootNotObject);
        };
        let items = match fields.get_mut(ITEM_KEY) {
            Some(items) => parse_items(items.take(), ITEM_KEY)?,
            None => return Err(ShapeError::MissingItems),
        };
        Ok(Self { fields, items })
    }
}

impl Node {
    fn from_value(value: Value, path: &str) -> Result<Self, ShapeError> {
        let Value::Object(mut fields) = value else {
            return Err(ShapeError::NodeNotObject(path.to_string()));
        };
        match fields.get_mut(ITEM_KEY) {
            Some(items) => {
                let children = parse_items(items.take(), &format!("{}.{}", path, ITEM_KEY))?;
                Ok(Node::Folder { fields, children })
            }
            None => Ok(Node::Request(fields)),
        }
    }
}

/// The `name` of a node, when it has a string one.
pub fn node_name(fields: &Fields) -> Option<&str> {
    fields.get("name").and_then(Value::as_str)
}

fn parse_items(value: Value, path: &str) -> Result<Vec<Node>, ShapeError> {
    let Value::Array(values) = value else {
        return Err(ShapeError::ItemsNotArray(path.to_string()));
    };
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| Node::from_value(v, &format!("{}[{}]", path, i)))
        .collect()
}

fn serialize_with_items<S>(
    fields: &Fields,
    items: &[Node],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (key, value) in fields {
        if key == ITEM_KEY {
            map.serialize_entry(key, items)?;
        } else {
            map.serialize_entry(key, value)?;
        }
    }
    map.end()
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_with_items(&self.fields, &self.items, serializer)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Folder { fields, children } => serialize_with_items(fields, children, serializer),
            Node::Request(fields) => fields.serialize(serializer),
        }
    }
}
