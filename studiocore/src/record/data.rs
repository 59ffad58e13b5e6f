//! The heterogeneous `data` payload of a saved record.
//!
//! Form pages produce loosely shaped JSON; it is stored verbatim so a
//! read-back is shape-equal to what was supplied.  Reading it back goes
//! through [`RecordData::sections`], which classifies every item once
//! into the closed [`Item`] union so that consumers match on variants
//! rather than probing object shapes.

use serde::{Deserialize, Serialize};
use serde_json::{
    Map,
    Value,
};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RecordData(Value);

/// A named group of items; one visual block on screen or paper.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub category: String,
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// A plain string, typically of the form `"Label: value"`.
    Text(String),
    /// An object carrying a `label` (or `comment`) and an optional value.
    LabelValue {
        label: String,
        value: Option<String>,
    },
    /// As `LabelValue` but pointing at an attachment through `url`.
    Link {
        label: String,
        value: Option<String>,
        url: String,
    },
    /// Any other object, e.g. a serialized task or budget line; each
    /// entry becomes a row.
    Raw(Map<String, Value>),
    /// Numbers, booleans, nulls and arrays at item position.
    Unrecognized(Value),
}

/// Renders a JSON scalar as display text; numbers and booleans keep
/// their literal form and null becomes empty.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

impl RecordData {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        Self(Value::Array(
            sections.into_iter()
                .map(Section::into_value)
                .collect()
        ))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Coerces the payload into sections.  An array yields one section
    /// per object element, a bare object is a single section, and
    /// anything else yields none.
    pub fn sections(&self) -> Vec<Section> {
        match &self.0 {
            Value::Array(values) => values.iter()
                .filter_map(Value::as_object)
                .map(Section::from_object)
                .collect(),
            Value::Object(object) => vec![Section::from_object(object)],
            _ => Vec::new(),
        }
    }

    /// Replaces the first `"Label: value"` string item whose label
    /// starts with `key` (case-insensitive) with `line`.  When no such
    /// item exists the line is appended to the first section, creating
    /// one if the payload has none.
    pub fn rewrite_text_item(&self, key: &str, line: &str) -> Self {
        let mut value = self.0.clone();
        let replaced = section_objects_mut(&mut value)
            .into_iter()
            .filter_map(|section| section.get_mut("items"))
            .filter_map(Value::as_array_mut)
            .flat_map(|items| items.iter_mut())
            .find(|item| item.as_str()
                .map(|s| text_label_matches(s, key))
                .unwrap_or(false)
            )
            .map(|item| *item = Value::String(line.to_string()))
            .is_some();
        if !replaced {
            if section_objects_mut(&mut value).is_empty() {
                value = Value::Array(vec![
                    Section::new("", vec![Item::text(line)]).into_value(),
                ]);
            } else if let Some(section) = section_objects_mut(&mut value).into_iter().next() {
                let line = Value::String(line.to_string());
                if let Some(Value::Array(items)) = section.get_mut("items") {
                    items.push(line);
                } else {
                    section.insert("items".to_string(), Value::Array(vec![line]));
                }
            }
        }
        Self(value)
    }
}

fn section_objects_mut(value: &mut Value) -> Vec<&mut Map<String, Value>> {
    match value {
        Value::Array(values) => values.iter_mut()
            .filter_map(Value::as_object_mut)
            .collect(),
        Value::Object(object) => vec![object],
        _ => Vec::new(),
    }
}

/// Splits a `"Label: value"` string on its first colon only.
pub fn split_text(s: &str) -> Option<(&str, &str)> {
    s.split_once(':')
        .map(|(label, value)| (label.trim(), value.trim()))
}

pub(crate) fn text_label_matches(s: &str, key: &str) -> bool {
    split_text(s)
        .map(|(label, _)| label.to_lowercase().starts_with(&key.to_lowercase()))
        .unwrap_or(false)
}

impl From<Value> for RecordData {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Vec<Section>> for RecordData {
    fn from(sections: Vec<Section>) -> Self {
        Self::from_sections(sections)
    }
}

impl From<Section> for RecordData {
    fn from(section: Section) -> Self {
        Self(section.into_value())
    }
}

impl Section {
    pub fn new(category: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            category: category.into(),
            items,
        }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            category: present(object.get("category"))
                .map(value_to_string)
                .unwrap_or_default(),
            items: match object.get("items") {
                Some(Value::Array(items)) => items.iter()
                    .map(Item::classify)
                    .collect(),
                _ => Vec::new(),
            },
        }
    }

    pub fn into_value(self) -> Value {
        let mut object = Map::new();
        object.insert("category".to_string(), Value::String(self.category));
        object.insert(
            "items".to_string(),
            Value::Array(self.items.into_iter().map(Item::into_value).collect()),
        );
        Value::Object(object)
    }
}

impl Item {
    pub fn text(s: impl Into<String>) -> Self {
        Item::Text(s.into())
    }

    pub fn label_value(label: impl Into<String>, value: impl Into<String>) -> Self {
        Item::LabelValue {
            label: label.into(),
            value: Some(value.into()),
        }
    }

    pub fn link(comment: impl Into<String>, url: impl Into<String>) -> Self {
        Item::Link {
            label: comment.into(),
            value: None,
            url: url.into(),
        }
    }

    pub fn raw(object: Map<String, Value>) -> Self {
        Item::Raw(object)
    }

    /// Classifies a JSON item by its shape.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::String(s) => Item::Text(s.clone()),
            Value::Object(object)
                if object.contains_key("label") || object.contains_key("comment") =>
            {
                let label = present(object.get("label"))
                    .or_else(|| present(object.get("comment")))
                    .map(value_to_string)
                    .unwrap_or_default();
                let value = present(object.get("value"))
                    .map(value_to_string);
                match object.get("url")
                    .map(value_to_string)
                    .filter(|url| !url.is_empty())
                {
                    Some(url) => Item::Link { label, value, url },
                    None => Item::LabelValue { label, value },
                }
            }
            Value::Object(object) => Item::Raw(object.clone()),
            other => Item::Unrecognized(other.clone()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Item::Text(s) => Value::String(s),
            Item::LabelValue { label, value } => {
                let mut object = Map::new();
                object.insert("label".to_string(), Value::String(label));
                if let Some(value) = value {
                    object.insert("value".to_string(), Value::String(value));
                }
                Value::Object(object)
            }
            Item::Link { label, value, url } => {
                let mut object = Map::new();
                object.insert("comment".to_string(), Value::String(label));
                if let Some(value) = value {
                    object.insert("value".to_string(), Value::String(value));
                }
                object.insert("url".to_string(), Value::String(url));
                Value::Object(object)
            }
            Item::Raw(object) => Value::Object(object),
            Item::Unrecognized(value) => value,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(Item::classify(&json!("amount: 500")), Item::text("amount: 500"));
        assert_eq!(
            Item::classify(&json!({"label": "Fee", "value": 12.5})),
            Item::LabelValue { label: "Fee".into(), value: Some("12.5".into()) },
        );
        assert_eq!(
            Item::classify(&json!({"label": null, "comment": "Drawing"})),
            Item::LabelValue { label: "Drawing".into(), value: None },
        );
        assert_eq!(
            Item::classify(&json!({"comment": "Plan", "url": "https://x/plan.pdf"})),
            Item::link("Plan", "https://x/plan.pdf"),
        );
        // an empty url is not a link
        assert_eq!(
            Item::classify(&json!({"comment": "Plan", "url": ""})),
            Item::LabelValue { label: "Plan".into(), value: None },
        );
        assert!(matches!(
            Item::classify(&json!({"taskName": "Survey"})),
            Item::Raw(_),
        ));
        assert_eq!(Item::classify(&json!(7)), Item::Unrecognized(json!(7)));
        assert_eq!(Item::classify(&json!(null)), Item::Unrecognized(json!(null)));
    }

    #[test]
    fn sections_coercion() {
        assert!(RecordData::default().sections().is_empty());
        assert!(RecordData::from(json!([])).sections().is_empty());
        assert!(RecordData::from(json!("text")).sections().is_empty());

        let bare = RecordData::from(json!({"category": "Terms", "items": ["a: b"]}));
        assert_eq!(bare.sections(), vec![
            Section::new("Terms", vec![Item::text("a: b")]),
        ]);

        let missing = RecordData::from(json!([
            {"category": "Empty"},
            {"category": "Odd", "items": "not a list"},
            42,
        ]));
        assert_eq!(missing.sections(), vec![
            Section::new("Empty", vec![]),
            Section::new("Odd", vec![]),
        ]);
    }

    #[test]
    fn constructed_shapes() {
        let data = RecordData::from_sections([
            Section::new("Attachments", vec![
                Item::link("Site photo", "https://files.example.com/a.png"),
                Item::label_value("Reviewed", "yes"),
            ]),
        ]);
        assert_eq!(data.as_value(), &json!([{
            "category": "Attachments",
            "items": [
                {"comment": "Site photo", "url": "https://files.example.com/a.png"},
                {"label": "Reviewed", "value": "yes"},
            ],
        }]));
        // constructed payloads classify back into the same variants
        assert_eq!(data.sections()[0].items, vec![
            Item::link("Site photo", "https://files.example.com/a.png"),
            Item::label_value("Reviewed", "yes"),
        ]);
    }

    #[test]
    fn split_first_colon() {
        assert_eq!(split_text("Label: value:with:colons"), Some(("Label", "value:with:colons")));
        assert_eq!(split_text("Time: 10:30"), Some(("Time", "10:30")));
        assert_eq!(split_text("no colon"), None);
    }

    #[test]
    fn rewrite_existing() {
        let data = RecordData::from(json!([
            {"category": "Task", "items": ["Task Name: Survey", "Status: in-progress"]},
        ]));
        let updated = data.rewrite_text_item("status", "Status: completed");
        assert_eq!(updated.as_value(), &json!([
            {"category": "Task", "items": ["Task Name: Survey", "Status: completed"]},
        ]));
    }

    #[test]
    fn rewrite_appends() {
        let data = RecordData::from(json!({"category": "Task", "items": ["Task Name: Survey"]}));
        let updated = data.rewrite_text_item("status", "Status: completed");
        assert_eq!(updated.as_value(), &json!(
            {"category": "Task", "items": ["Task Name: Survey", "Status: completed"]}
        ));

        let updated = RecordData::default().rewrite_text_item("status", "Status: completed");
        assert_eq!(updated.as_value(), &json!([
            {"category": "", "items": ["Status: completed"]},
        ]));
    }
}
