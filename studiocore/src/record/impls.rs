use std::cmp::Ordering;
use super::*;

impl SavedRecord {
    /// The path of this record within the collection namespace.
    pub fn path(&self) -> String {
        self.id.path()
    }

    /// Applies a partial update to this record in place.  Nested `data`
    /// is replaced wholesale, never merged.
    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(file_name) = &patch.file_name {
            self.file_name = file_name.clone();
        }
        if let Some(project_name) = &patch.project_name {
            self.project_name = project_name.clone();
        }
        if let Some(data) = &patch.data {
            self.data = data.clone();
        }
    }
}

impl NewRecord {
    pub fn new(
        file_name: impl Into<String>,
        data: impl Into<RecordData>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            project_name: None,
            data: data.into(),
        }
    }

    pub fn project_name(mut self, val: impl Into<String>) -> Self {
        self.project_name = Some(val.into());
        self
    }

    /// The display title, defaulting to the producing form's name when
    /// the form did not supply one.
    pub fn resolved_project_name(&self) -> &str {
        self.project_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.file_name)
    }
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none()
            && self.project_name.is_none()
            && self.data.is_none()
    }
}

/// Newest first; identical timestamps fall back to the id so the order
/// is total.
pub(crate) fn newest_first(a: &SavedRecord, b: &SavedRecord) -> Ordering {
    b.created_at.cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

impl SavedRecords {
    pub fn sort_newest_first(&mut self) {
        self.0.sort_by(newest_first);
    }

    pub fn into_inner(self) -> Vec<SavedRecord> {
        self.0
    }
}

impl From<Vec<SavedRecord>> for SavedRecords {
    fn from(args: Vec<SavedRecord>) -> Self {
        Self(args)
    }
}

impl FromIterator<SavedRecord> for SavedRecords {
    fn from_iter<I: IntoIterator<Item = SavedRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SavedRecords {
    type Item = SavedRecord;
    type IntoIter = std::vec::IntoIter<SavedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use super::*;

    fn record(id: &str, created_at: i64) -> SavedRecord {
        SavedRecord {
            id: id.into(),
            employee_id: 1,
            employee_name: "Ana".into(),
            file_name: "Change Order".into(),
            project_name: "Library".into(),
            created_at,
            data: RecordData::default(),
        }
    }

    #[test]
    fn apply_patch() {
        let mut r = record("abc", 1);
        r.apply(&RecordPatch {
            project_name: Some("Annex".into()),
            ..Default::default()
        });
        assert_eq!(r.project_name, "Annex");
        assert_eq!(r.file_name, "Change Order");

        let data = RecordData::from(json!([{"category": "Terms", "items": []}]));
        r.apply(&RecordPatch {
            data: Some(data.clone()),
            ..Default::default()
        });
        assert_eq!(r.data, data);
        assert_eq!(r.project_name, "Annex");
    }

    #[test]
    fn ordering() {
        let mut records = SavedRecords::from(vec![
            record("a", 1),
            record("c", 3),
            record("b", 3),
            record("d", 2),
        ]);
        records.sort_newest_first();
        let ids = records.iter()
            .map(|r| r.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["c", "b", "d", "a"]);
    }

    #[test]
    fn project_name_default() {
        let new = NewRecord::new("Site Visit Proforma", RecordData::default());
        assert_eq!(new.resolved_project_name(), "Site Visit Proforma");
        let new = new.project_name("  ");
        assert_eq!(new.resolved_project_name(), "Site Visit Proforma");
        let new = new.project_name("Harbour Tower");
        assert_eq!(new.resolved_project_name(), "Harbour Tower");
    }

    #[test]
    fn serde_shape() -> anyhow::Result<()> {
        let value = serde_json::to_value(record("abc", 42))?;
        assert_eq!(value, json!({
            "id": "abc",
            "employeeId": 1,
            "employeeName": "Ana",
            "fileName": "Change Order",
            "projectName": "Library",
            "createdAt": 42,
            "data": null,
        }));
        let patch: RecordPatch = serde_json::from_value(json!({
            "projectName": "Annex",
        }))?;
        assert_eq!(patch.project_name.as_deref(), Some("Annex"));
        assert!(patch.data.is_none());
        Ok(())
    }
}
