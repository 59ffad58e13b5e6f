//! Reduction of heterogeneous record payloads to uniform display rows.
//!
//! [`normalize`] is total: whatever shape a form page saved, the result
//! is a (possibly empty) list of sections, and items that cannot be
//! displayed are skipped rather than reported.

use serde::Serialize;
use serde_json::{
    Map,
    Value,
};
use crate::record::{
    split_text,
    value_to_string,
    Item,
    SavedRecord,
    Section,
};

/// The form whose checklist sections are drawn as three-column tables.
pub const SITE_VISIT_FILE_NAME: &str = "Site Visit Proforma";

/// Value shown for attachment rows that carry no value of their own.
pub const LINK_PLACEHOLDER: &str = "See Link";

const HOUSEKEEPING_KEYS: [&str; 2] = ["id", "isHeader"];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChecklistRow {
    pub item: String,
    pub status: String,
    pub remarks: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NormalizedSection {
    Table {
        category: String,
        rows: Vec<Row>,
    },
    Checklist {
        category: String,
        rows: Vec<ChecklistRow>,
    },
}

impl Row {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            link: None,
        }
    }

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }
}

impl NormalizedSection {
    pub fn category(&self) -> &str {
        match self {
            NormalizedSection::Table { category, .. } => category,
            NormalizedSection::Checklist { category, .. } => category,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NormalizedSection::Table { rows, .. } => rows.len(),
            NormalizedSection::Checklist { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The urls of every linked row, in row order.
    pub fn links(&self) -> impl Iterator<Item = (&str, &str)> {
        let rows: &[Row] = match self {
            NormalizedSection::Table { rows, .. } => rows,
            NormalizedSection::Checklist { .. } => &[],
        };
        rows.iter()
            .filter_map(|row| row.link.as_deref().map(|url| (row.label.as_str(), url)))
    }
}

/// Inserts a space before every capital after the first character and
/// capitalizes the first letter, e.g. `"dueDate"` becomes `"Due Date"`.
pub fn humanize_key(key: &str) -> String {
    let mut result = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        match prev {
            None => result.extend(c.to_uppercase()),
            Some(p) => {
                if c.is_uppercase() && !p.is_whitespace() {
                    result.push(' ');
                }
                result.push(c);
            }
        }
        prev = Some(c);
    }
    result
}

fn item_rows(item: Item) -> Vec<Row> {
    match item {
        Item::Text(s) => match split_text(&s) {
            Some((label, value)) => vec![Row::new(label, value)],
            None => vec![Row::new(s.as_str(), "")],
        },
        Item::LabelValue { label, value } => vec![
            Row::new(label, value.unwrap_or_default()),
        ],
        Item::Link { label, value, url } => vec![
            Row::new(label, value.unwrap_or_else(|| LINK_PLACEHOLDER.to_string()))
                .link(url),
        ],
        Item::Raw(object) => object.into_iter()
            .filter(|(key, _)| !HOUSEKEEPING_KEYS.contains(&key.as_str()))
            .map(|(key, value)| Row::new(humanize_key(&key), value_to_string(&value)))
            .collect(),
        Item::Unrecognized(value) => {
            log::trace!("skipping unrecognized item {value}");
            Vec::new()
        }
    }
}

fn checklist_row(object: &Map<String, Value>) -> ChecklistRow {
    let field = |key: &str| object.get(key)
        .map(value_to_string)
        .unwrap_or_default();
    ChecklistRow {
        item: field("Item"),
        status: field("Status"),
        remarks: field("Remarks"),
    }
}

fn is_checklist(file_name: &str, section: &Section) -> bool {
    file_name == SITE_VISIT_FILE_NAME
        && matches!(
            section.items.first(),
            Some(Item::Raw(object)) if object.contains_key("Item")
        )
}

fn normalize_section(file_name: &str, section: Section) -> NormalizedSection {
    if is_checklist(file_name, &section) {
        NormalizedSection::Checklist {
            rows: section.items.iter()
                .filter_map(|item| match item {
                    Item::Raw(object) => Some(checklist_row(object)),
                    _ => None,
                })
                .collect(),
            category: section.category,
        }
    } else {
        NormalizedSection::Table {
            rows: section.items.into_iter()
                .flat_map(item_rows)
                .collect(),
            category: section.category,
        }
    }
}

/// Reduces the record's payload to display sections, dropping those
/// without any rows.
pub fn normalize(record: &SavedRecord) -> Vec<NormalizedSection> {
    record.data.sections()
        .into_iter()
        .map(|section| normalize_section(&record.file_name, section))
        .filter(|section| !section.is_empty())
        .collect()
}
