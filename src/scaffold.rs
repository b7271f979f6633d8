use crate::types::{Fields, ShapeError};
use log::info;
use serde::Serialize;
use serde_json::Value;

pub const TOKEN_VARIABLE: &str = "access_token";

#[derive(Serialize, Debug)]
struct Header {
    key: &'static str,
    value: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize, Debug)]
struct RequestTemplate {
    method: &'static str,
    header: Vec<Header>,
}

#[derive(Serialize, Debug)]
struct Script {
    #[serde(rename = "type")]
    kind: &'static str,
    exec: Vec<String>,
}

#[derive(Serialize, Debug)]
struct ResponsePlaceholder {
    name: &'static str,
}

/// The fixed content written into every request of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaffold {
    request: Value,
    script: Value,
    response: Value,
}

impl Scaffold {
    pub fn new() -> serde_json::Result<Self> {
        let request = RequestTemplate {
            method: "POST",
            header: vec![Header {
                key: "Authorization",
                value: format!("Bearer {{{{{}}}}}", TOKEN_VARIABLE),
                kind: "text",
            }],
        };
        let script = Script {
            kind: "text/javascript",
            exec: vec![format!(
                "pm.variables.set('{0}', pm.response.json().{0});",
                TOKEN_VARIABLE
            )],
        };
        let response = [
            ResponsePlaceholder { name: "Success response " },
            ResponsePlaceholder { name: "Error response " },
        ];
        Ok(Self {
            request: serde_json::to_value(request)?,
            script: serde_json::to_value(script)?,
            response: serde_json::to_value(response)?,
        })
    }

    /// Overwrites `request`, every `event[*].script` and `response` of a
    /// request node. `path` is only used for messages.
    pub fn apply(&self, fields: &mut Fields, path: &str) -> Result<(), ShapeError> {
        if fields.get("request").and_then(|r| r.get("url")).is_some() {
            info!("{}: discarding existing request definition", path);
        }
        fields.insert("request".to_string(), self.request.clone());

        if let Some(events) = fields.get_mut("event") {
            let Value::Array(events) = events else {
                return Err(ShapeError::EventsNotArray(format!("{}.event", path)));
            };
            for (i, event) in events.iter_mut().enumerate() {
                let Value::Object(event) = event else {
                    return Err(ShapeError::EventNotObject(format!("{}.event[{}]", path, i)));
                };
                event.insert("script".to_string(), self.script.clone());
            }
        }

        fields.insert("response".to_string(), self.response.clone());
        Ok(())
    }
}
