//! Entity Store Module
//!
//! In-memory tables of entity records keyed by id, one table per entity type.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::cache::{EntityRecord, EntityType};

// == Patch Outcome ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Fields merged into an existing record.
    Applied,
    /// No record with that id; nothing changed.
    UnknownId,
}

// == Entity Table ==
/// Records of a single entity type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityTable {
    records: HashMap<String, EntityRecord>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    // == Replace All ==
    /// Swaps the whole table. Ids missing from `records` disappear.
    pub fn replace_all(&mut self, records: Vec<EntityRecord>) {
        self.records = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
    }

    // == Upsert Patch ==
    /// Merges `patch` into the record `id` and stamps it with `observed_at`.
    ///
    /// Patches apply in arrival order whatever their `observed_at`. Only
    /// fields present in `patch` are written. Unknown ids are never created
    /// here; only a pull establishes that an entity exists.
    pub fn upsert_patch(
        &mut self,
        id: &str,
        patch: Map<String, Value>,
        observed_at: u64,
    ) -> PatchOutcome {
        let Some(record) = self.records.get_mut(id) else {
            return PatchOutcome::UnknownId;
        };

        record.fields.extend(patch);
        record.last_observed = Some(observed_at);
        PatchOutcome::Applied
    }

    // == Remove All ==
    pub fn remove_all(&mut self) {
        self.records.clear();
    }

    pub fn get(&self, id: &str) -> Option<&EntityRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// All records, sorted by id for stable output.
    pub fn records(&self) -> Vec<EntityRecord> {
        let mut records: Vec<EntityRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// == Entity Store ==
/// One independent `EntityTable` per entity type.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    tables: HashMap<EntityType, EntityTable>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            tables: EntityType::ALL
                .into_iter()
                .map(|t| (t, EntityTable::new()))
                .collect(),
        }
    }

    pub fn table(&self, entity_type: EntityType) -> Option<&EntityTable> {
        self.tables.get(&entity_type)
    }

    fn table_mut(&mut self, entity_type: EntityType) -> &mut EntityTable {
        self.tables.entry(entity_type).or_default()
    }

    pub fn replace_all(&mut self, entity_type: EntityType, records: Vec<EntityRecord>) {
        self.table_mut(entity_type).replace_all(records);
    }

    pub fn upsert_patch(
        &mut self,
        entity_type: EntityType,
        id: &str,
        patch: Map<String, Value>,
        observed_at: u64,
    ) -> PatchOutcome {
        self.table_mut(entity_type).upsert_patch(id, patch, observed_at)
    }

    pub fn remove_all(&mut self, entity_type: EntityType) {
        self.table_mut(entity_type).remove_all();
    }

    /// Empties every table.
    pub fn remove_everything(&mut self) {
        for table in self.tables.values_mut() {
            table.remove_all();
        }
    }

    pub fn get(&self, entity_type: EntityType, id: &str) -> Option<&EntityRecord> {
        self.table(entity_type).and_then(|table| table.get(id))
    }

    pub fn records(&self, entity_type: EntityType) -> Vec<EntityRecord> {
        self.table(entity_type)
            .map(EntityTable::records)
            .unwrap_or_default()
    }

    pub fn len(&self, entity_type: EntityType) -> usize {
        self.table(entity_type).map_or(0, EntityTable::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn truck(id: &str, lat: f64, plate: &str) -> EntityRecord {
        EntityRecord::new(id)
            .with_field("lat", lat)
            .with_field("lng", 0.0)
            .with_field("plate", plate)
    }

    fn patch(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_replace_all_removes_missing_ids() {
        let mut table = EntityTable::new();
        table.replace_all(vec![truck("T-1", 1.0, "A"), truck("T-2", 2.0, "B")]);
        table.replace_all(vec![truck("T-2", 3.0, "B")]);

        assert_eq!(table.len(), 1);
        assert!(!table.contains("T-1"));
        assert_eq!(table.get("T-2").unwrap().field("lat"), Some(&json!(3.0)));
    }

    #[test]
    fn test_patch_unknown_id_leaves_table_unchanged() {
        let mut table = EntityTable::new();
        table.replace_all(vec![truck("T-1", 1.0, "A")]);
        let before = table.clone();

        let outcome = table.upsert_patch("T-9", patch(&[("lat", json!(9.0))]), 100);

        assert_eq!(outcome, PatchOutcome::UnknownId);
        assert_eq!(table, before);
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut table = EntityTable::new();
        table.replace_all(vec![truck("T-1", 1.0, "A")]);

        let outcome = table.upsert_patch("T-1", patch(&[("lat", json!(5.5))]), 100);

        assert_eq!(outcome, PatchOutcome::Applied);
        let record = table.get("T-1").unwrap();
        assert_eq!(record.field("lat"), Some(&json!(5.5)));
        assert_eq!(record.field("plate"), Some(&json!("A")));
        assert_eq!(record.last_observed, Some(100));
    }

    #[test]
    fn test_later_patch_wins() {
        let mut table = EntityTable::new();
        table.replace_all(vec![truck("T-1", 1.0, "A")]);

        table.upsert_patch("T-1", patch(&[("lat", json!(2.0)), ("speed", json!(40))]), 100);
        table.upsert_patch("T-1", patch(&[("lat", json!(3.0))]), 200);

        let record = table.get("T-1").unwrap();
        assert_eq!(record.field("lat"), Some(&json!(3.0)));
        assert_eq!(record.field("speed"), Some(&json!(40)));
        assert_eq!(record.last_observed, Some(200));
    }

    #[test]
    fn test_patches_apply_in_arrival_order_despite_skewed_stamp() {
        let mut table = EntityTable::new();
        table.replace_all(vec![truck("T-1", 1.0, "A")]);

        // First fix comes from a device clock an hour ahead.
        let outcomes = [
            table.upsert_patch("T-1", patch(&[("lat", json!(2.0))]), 3_600_000),
            table.upsert_patch("T-1", patch(&[("lat", json!(3.0))]), 60_000),
            table.upsert_patch("T-1", patch(&[("lat", json!(4.0))]), 120_000),
        ];

        assert_eq!(outcomes, [PatchOutcome::Applied; 3]);
        let record = table.get("T-1").unwrap();
        assert_eq!(record.field("lat"), Some(&json!(4.0)));
        assert_eq!(record.last_observed, Some(120_000));
    }

    #[test]
    fn test_duplicate_patch_is_idempotent() {
        let mut table = EntityTable::new();
        table.replace_all(vec![truck("T-1", 1.0, "A")]);
        table.upsert_patch("T-1", patch(&[("lat", json!(2.0))]), 200);
        let once = table.clone();

        table.upsert_patch("T-1", patch(&[("lat", json!(2.0))]), 200);

        assert_eq!(table, once);
    }

    #[test]
    fn test_replace_after_patches_is_authoritative() {
        let mut table = EntityTable::new();
        table.replace_all(vec![truck("T-1", 1.0, "A")]);
        table.upsert_patch("T-1", patch(&[("lat", json!(2.0))]), 100);
        table.upsert_patch("T-1", patch(&[("lat", json!(3.0))]), 200);

        table.replace_all(vec![truck("T-1", 7.0, "Z")]);
        assert_eq!(table.get("T-1").unwrap(), &truck("T-1", 7.0, "Z"));

        // A patch after the replace still lands, even with an older stamp.
        let outcome = table.upsert_patch("T-1", patch(&[("lat", json!(8.0))]), 150);
        assert_eq!(outcome, PatchOutcome::Applied);
        let record = table.get("T-1").unwrap();
        assert_eq!(record.field("lat"), Some(&json!(8.0)));
        assert_eq!(record.field("plate"), Some(&json!("Z")));
    }

    #[test]
    fn test_store_tables_are_independent() {
        let mut store = EntityStore::new();
        store.replace_all(EntityType::Trucks, vec![truck("T-1", 1.0, "A")]);
        store.replace_all(EntityType::Drivers, vec![EntityRecord::new("D-1")]);

        store.remove_all(EntityType::Trucks);

        assert_eq!(store.len(EntityType::Trucks), 0);
        assert_eq!(store.len(EntityType::Drivers), 1);
        assert!(store.get(EntityType::Drivers, "D-1").is_some());
    }

    #[test]
    fn test_remove_everything() {
        let mut store = EntityStore::new();
        store.replace_all(EntityType::Trucks, vec![truck("T-1", 1.0, "A")]);
        store.replace_all(EntityType::Groups, vec![EntityRecord::new("G-1")]);

        store.remove_everything();

        for t in EntityType::ALL {
            assert_eq!(store.len(t), 0);
        }
    }

    #[test]
    fn test_records_sorted_by_id() {
        let mut store = EntityStore::new();
        store.replace_all(
            EntityType::Trucks,
            vec![truck("T-3", 0.0, "C"), truck("T-1", 0.0, "A"), truck("T-2", 0.0, "B")],
        );

        let ids: Vec<String> = store
            .records(EntityType::Trucks)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["T-1", "T-2", "T-3"]);
    }
}
