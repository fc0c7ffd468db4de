use serde::Serialize;

/// Identifier of the root stream every other stream descends from.
pub const ROOT_STREAM_ID: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum StreamFieldType {
    Keyword,
    MatchOnlyText,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct StreamFieldDefinition {
    name: &'static str,
    #[serde(rename = "type")]
    field_type: StreamFieldType,
}

/// Configuration document describing one stream.
///
/// Only the root stream is provisioned; its serialized form is the document
/// stored under [`ROOT_STREAM_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDefinition {
    id: String,
    // Child streams are not routed yet; the root is stored with none.
    children: Vec<String>,
    fields: Vec<StreamFieldDefinition>,
}

impl StreamDefinition {
    /// Returns the canonical root stream definition.
    #[must_use]
    pub fn root() -> Self {
        let field = |name, field_type| StreamFieldDefinition { name, field_type };

        Self {
            id: ROOT_STREAM_ID.to_owned(),
            children: Vec::new(),
            fields: vec![
                field("@timestamp", StreamFieldType::Date),
                field("message", StreamFieldType::MatchOnlyText),
                field("host.name", StreamFieldType::Keyword),
                field("log.level", StreamFieldType::Keyword),
            ],
        }
    }

    /// Returns the stream identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ROOT_STREAM_ID, StreamDefinition};

    #[test]
    fn root_definition_serializes_to_canonical_document() {
        let root = StreamDefinition::root();
        assert_eq!(root.id(), ROOT_STREAM_ID);

        let document = serde_json::to_value(&root).ok();
        assert_eq!(
            document,
            Some(json!({
                "id": "logs",
                "children": [],
                "fields": [
                    { "name": "@timestamp", "type": "date" },
                    { "name": "message", "type": "match_only_text" },
                    { "name": "host.name", "type": "keyword" },
                    { "name": "log.level", "type": "keyword" }
                ]
            }))
        );
    }
}
