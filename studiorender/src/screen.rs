//! Escaped HTML views of saved records.

use html_escape::{
    encode_double_quoted_attribute as attr,
    encode_text as text,
};
use std::fmt::Write;
use studiocore::{
    normalize::{
        normalize,
        ChecklistRow,
        NormalizedSection,
        Row,
    },
    record::{
        SavedRecord,
        SavedRecords,
    },
};

use crate::format_created_at;

/// Only web and relative urls become links; anything else, e.g.
/// `javascript:`, is shown as text.
pub fn safe_href(url: &str) -> Option<&str> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(url);
    }
    let scheme_end = url.find(':');
    let path_end = url.find(['/', '?', '#']);
    match (scheme_end, path_end) {
        _ if url.is_empty() || url.starts_with("//") => None,
        (None, _) => Some(url),
        (Some(colon), Some(slash)) if slash < colon => Some(url),
        _ => None,
    }
}

fn write_table(out: &mut String, rows: &[Row]) {
    out.push_str("<table class=\"record-table\">\n<tbody>\n");
    for row in rows {
        let _ = write!(out, "<tr><th scope=\"row\">{}</th><td>", text(&row.label));
        match row.link.as_deref().and_then(safe_href) {
            Some(href) => {
                let _ = write!(
                    out,
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    attr(href),
                    text(&row.value),
                );
            }
            None => out.push_str(&text(&row.value)),
        }
        out.push_str("</td></tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn write_checklist(out: &mut String, rows: &[ChecklistRow]) {
    out.push_str(
        "<table class=\"record-checklist\">\n\
         <thead><tr><th>Item</th><th>Status</th><th>Remarks</th></tr></thead>\n\
         <tbody>\n"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            text(&row.item),
            text(&row.status),
            text(&row.remarks),
        );
    }
    out.push_str("</tbody>\n</table>\n");
}

/// Renders the detail view of one record.
pub fn render_record(record: &SavedRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<div class=\"record-view\" style=\"max-height: 80vh; overflow-y: auto\">\n\
         <h1>{}</h1>\n\
         <dl class=\"record-meta\">\
         <dt>File</dt><dd>{}</dd>\
         <dt>Saved by</dt><dd>{}</dd>\
         <dt>Date</dt><dd>{}</dd>\
         </dl>",
        text(&record.project_name),
        text(&record.file_name),
        text(&record.employee_name),
        format_created_at(record.created_at),
    );
    let sections = normalize(record);
    if sections.is_empty() {
        out.push_str("<p class=\"record-empty\">No details recorded.</p>\n");
    }
    for section in sections.iter() {
        let _ = writeln!(
            out,
            "<section>\n<h2>{}</h2>",
            text(section.category()),
        );
        match section {
            NormalizedSection::Table { rows, .. } => write_table(&mut out, rows),
            NormalizedSection::Checklist { rows, .. } => write_checklist(&mut out, rows),
        }
        out.push_str("</section>\n");
    }
    out.push_str("</div>\n");
    out
}

/// Renders the listing, grouped by the producing form in order of each
/// form's newest record.
pub fn render_listing(records: &SavedRecords) -> String {
    let mut groups: Vec<(&str, Vec<&SavedRecord>)> = Vec::new();
    for record in records.iter() {
        match groups.iter_mut().find(|(name, _)| *name == record.file_name) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.file_name.as_str(), vec![record])),
        }
    }

    let mut out = String::from(
        "<div class=\"record-listing\" style=\"max-height: 80vh; overflow-y: auto\">\n"
    );
    if groups.is_empty() {
        out.push_str("<p class=\"record-empty\">No saved records.</p>\n");
    }
    for (file_name, members) in groups {
        let _ = writeln!(out, "<section>\n<h2>{}</h2>\n<ul>", text(file_name));
        for record in members {
            let id = attr(record.id.as_str());
            let _ = writeln!(
                out,
                "<li><a href=\"/records/{id}/view\">{}</a> \
                 <span class=\"record-meta\">{} &middot; {}</span> \
                 <a href=\"/records/{id}/pdf?mode=view\" target=\"_blank\" rel=\"noopener noreferrer\">View PDF</a> \
                 <a href=\"/records/{id}/pdf?mode=download\">Download PDF</a></li>",
                text(&record.project_name),
                text(&record.employee_name),
                format_created_at(record.created_at),
            );
        }
        out.push_str("</ul>\n</section>\n");
    }
    out.push_str("</div>\n");
    out
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use studiocore::record::RecordData;
    use super::*;

    fn record(id: &str, file_name: &str, data: serde_json::Value) -> SavedRecord {
        SavedRecord {
            id: id.into(),
            employee_id: 1,
            employee_name: "Ana <QS>".into(),
            file_name: file_name.into(),
            project_name: "Harbour & Co".into(),
            created_at: 1234567890000,
            data: RecordData::from(data),
        }
    }

    #[test]
    fn hrefs() {
        assert_eq!(safe_href("https://files.example.com/a.png"), Some("https://files.example.com/a.png"));
        assert_eq!(safe_href("HTTP://example.com"), Some("HTTP://example.com"));
        assert_eq!(safe_href("/files/a.png"), Some("/files/a.png"));
        assert_eq!(safe_href("files/a.png"), Some("files/a.png"));
        assert_eq!(safe_href("files/10:30.png"), Some("files/10:30.png"));
        assert_eq!(safe_href("javascript:alert(1)"), None);
        assert_eq!(safe_href("data:text/html,hi"), None);
        assert_eq!(safe_href("//evil.example.com"), None);
        assert_eq!(safe_href(""), None);
    }

    #[test]
    fn escapes_markup() {
        let html = render_record(&record("abc", "Change Order", json!([{
            "category": "<Terms>",
            "items": ["amount: <b>500</b>"],
        }])));
        assert!(html.contains("<h1>Harbour &amp; Co</h1>"));
        assert!(html.contains("<dd>Ana &lt;QS&gt;</dd>"));
        assert!(html.contains("<h2>&lt;Terms&gt;</h2>"));
        assert!(html.contains("<td>&lt;b&gt;500&lt;/b&gt;</td>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("<dd>2009-02-13 23:31</dd>"));
        assert!(html.contains("overflow-y: auto"));
    }

    #[test]
    fn links() {
        let html = render_record(&record("abc", "Transmittal", json!([{
            "category": "Attachments",
            "items": [
                {"comment": "Drawing", "url": "https://files.example.com/d.png?a=1&b=2"},
                {"comment": "Sneaky", "url": "javascript:alert(1)"},
            ],
        }])));
        assert!(html.contains(
            "<a href=\"https://files.example.com/d.png?a=1&amp;b=2\" target=\"_blank\" \
             rel=\"noopener noreferrer\">See Link</a>"
        ));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("<th scope=\"row\">Sneaky</th><td>See Link</td>"));
    }

    #[test]
    fn checklist() {
        let html = render_record(&record("abc", "Site Visit Proforma", json!([{
            "category": "Flooring",
            "items": [{"Item": "Tiles installed", "Status": "Yes", "Remarks": ""}],
        }])));
        assert!(html.contains("<h2>Flooring</h2>"));
        assert!(html.contains("<th>Item</th><th>Status</th><th>Remarks</th>"));
        assert!(html.contains("<tr><td>Tiles installed</td><td>Yes</td><td></td></tr>"));
        assert!(!html.contains("record-table"));
    }

    #[test]
    fn empty_record() {
        let html = render_record(&record("abc", "Leave Application", json!(null)));
        assert!(html.contains("No details recorded."));
        assert!(!html.contains("<section>"));
    }

    #[test]
    fn listing_groups() {
        let records = SavedRecords::from(vec![
            record("c", "Change Order", json!([])),
            record("b", "Leave Application", json!([])),
            record("a", "Change Order", json!([])),
        ]);
        let html = render_listing(&records);
        let change_order = html.find("<h2>Change Order</h2>").expect("group");
        let leave = html.find("<h2>Leave Application</h2>").expect("group");
        assert!(change_order < leave);
        assert_eq!(html.matches("<section>").count(), 2);
        assert!(html.contains("<a href=\"/records/c/view\">Harbour &amp; Co</a>"));
        assert!(html.contains("/records/a/pdf?mode=download"));
        assert!(html.find("/records/c/view") < html.find("/records/a/view"));

        assert!(render_listing(&SavedRecords::default()).contains("No saved records."));
    }
}
