//! Records written through this store that the backend listing may not
//! reflect yet.

use parking_lot::RwLock;
use std::collections::HashMap;
use studiocore::record::{
    RecordId,
    RecordPatch,
    SavedRecord,
    SavedRecords,
};

#[derive(Debug, Default)]
pub(crate) struct RecordCache {
    pending: RwLock<HashMap<RecordId, SavedRecord>>,
}

impl RecordCache {
    pub(crate) fn stage(&self, record: SavedRecord) {
        self.pending.write().insert(record.id.clone(), record);
    }

    pub(crate) fn get(&self, id: &RecordId) -> Option<SavedRecord> {
        self.pending.read().get(id).cloned()
    }

    pub(crate) fn apply(&self, id: &RecordId, patch: &RecordPatch) {
        if let Some(record) = self.pending.write().get_mut(id) {
            record.apply(patch);
        }
    }

    pub(crate) fn forget(&self, id: &RecordId) {
        self.pending.write().remove(id);
    }

    /// Drops every staged record the listing already carries, then
    /// merges the remainder that pass `filter` into the listing.
    pub(crate) fn reconcile(
        &self,
        mut listing: SavedRecords,
        filter: impl Fn(&SavedRecord) -> bool,
    ) -> SavedRecords {
        let mut pending = self.pending.write();
        listing.iter().for_each(|record| {
            pending.remove(&record.id);
        });
        listing.extend(pending.values()
            .filter(|record| filter(record))
            .cloned()
        );
        listing.sort_newest_first();
        listing
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.read().len()
    }
}

#[cfg(test)]
mod test {
    use studiocore::record::RecordData;
    use super::*;

    fn record(id: &str, employee_id: i64, created_at: i64) -> SavedRecord {
        SavedRecord {
            id: id.into(),
            employee_id,
            employee_name: format!("employee{employee_id}"),
            file_name: "Change Order".into(),
            project_name: "Library".into(),
            created_at,
            data: RecordData::default(),
        }
    }

    #[test]
    fn reconcile() {
        let cache = RecordCache::default();
        cache.stage(record("b", 1, 2));
        cache.stage(record("c", 2, 3));

        // a lagging listing gains the staged records
        let merged = cache.reconcile(vec![record("a", 1, 1)].into(), |_| true);
        let ids = merged.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["c", "b", "a"]);
        assert_eq!(cache.len(), 2);

        // staged records outside the filter stay staged but hidden
        let merged = cache.reconcile(SavedRecords::default(), |r| r.employee_id == 1);
        let ids = merged.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["b"]);
        assert_eq!(cache.len(), 2);

        // once the backend catches up the staged copy is dropped
        let merged = cache.reconcile(vec![record("b", 1, 2)].into(), |_| true);
        assert_eq!(merged.len(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&"b".into()).is_none());
        assert!(cache.get(&"c".into()).is_some());
    }

    #[test]
    fn apply_and_forget() {
        let cache = RecordCache::default();
        cache.stage(record("b", 1, 2));
        cache.apply(&"b".into(), &RecordPatch {
            project_name: Some("Annex".into()),
            ..Default::default()
        });
        assert_eq!(
            cache.get(&"b".into()).map(|r| r.project_name),
            Some("Annex".to_string()),
        );
        cache.forget(&"b".into());
        assert_eq!(cache.len(), 0);
    }
}
