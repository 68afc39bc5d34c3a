//! Immutable, point-in-time view of a cluster's secondary indexes.

use std::sync::{Arc, LazyLock};

use ahash::{AHashMap, AHashSet};

use crate::{
    descriptor::IndexDescriptor,
    key::{IndexKey, IndexedField},
};

static EMPTY: LazyLock<Arc<Snapshot>> = LazyLock::new(|| Arc::new(Snapshot::default()));

/// A complete set of index descriptors produced by one refresh cycle.
///
/// `indexed_fields` is the projection of every key in `indexes` onto its
/// `(namespace, set, bin)` and is computed once at construction. A snapshot is
/// never mutated; the cache replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    indexes: AHashMap<IndexKey, IndexDescriptor>,
    indexed_fields: AHashSet<IndexedField>,
}

impl Snapshot {
    /// Returns the shared empty snapshot.
    pub fn empty() -> Arc<Snapshot> {
        EMPTY.clone()
    }

    /// Builds a snapshot from descriptors with distinct keys. Should a key
    /// repeat, the first descriptor is kept.
    pub(crate) fn from_descriptors(
        descriptors: impl IntoIterator<Item = IndexDescriptor>,
    ) -> Snapshot {
        let mut indexes = AHashMap::new();
        for descriptor in descriptors {
            indexes.entry(descriptor.key()).or_insert(descriptor);
        }
        let indexed_fields = indexes.keys().map(IndexKey::field).collect();
        Snapshot {
            indexes,
            indexed_fields,
        }
    }

    pub fn get(&self, key: &IndexKey) -> Option<&IndexDescriptor> {
        self.indexes.get(key)
    }

    pub fn has_index_for(&self, field: &IndexedField) -> bool {
        self.indexed_fields.contains(field)
    }

    /// All indexes covering `field`, ordered by index name.
    pub fn indexes_for(&self, field: &IndexedField) -> Vec<&IndexDescriptor> {
        if !self.has_index_for(field) {
            return Vec::new();
        }
        let mut found = self
            .indexes
            .values()
            .filter(|d| d.namespace == field.namespace && d.set == field.set && d.bin == field.bin)
            .collect::<Vec<_>>();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndexKey, &IndexDescriptor)> {
        self.indexes.iter()
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &IndexedField> {
        self.indexed_fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        descriptor::{CollectionType, IndexDescriptor, IndexState, IndexType},
        key::{IndexKey, IndexedField},
    };

    use super::Snapshot;

    fn descriptor(set: &str, bin: &str, name: &str) -> IndexDescriptor {
        IndexDescriptor {
            name: name.to_string(),
            namespace: "test".to_string(),
            set: set.to_string(),
            bin: bin.to_string(),
            index_type: IndexType::Numeric,
            collection_type: CollectionType::None,
            state: IndexState::ReadWrite,
        }
    }

    #[test]
    fn test_empty_is_shared() {
        let a = Snapshot::empty();
        let b = Snapshot::empty();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_empty());
        assert_eq!(a.indexed_fields().count(), 0);
        assert_eq!(*a, Snapshot::default());
    }

    #[test]
    fn test_fields_are_projection_of_keys() {
        let snapshot = Snapshot::from_descriptors([
            descriptor("demo", "k1", "idx_a"),
            descriptor("demo", "k1", "idx_b"),
            descriptor("demo", "k2", "idx_c"),
            descriptor("", "k1", "idx_d"),
        ]);
        assert_eq!(snapshot.len(), 4);

        let mut fields = snapshot.indexed_fields().cloned().collect::<Vec<_>>();
        fields.sort();
        assert_eq!(
            fields,
            vec![
                IndexedField::new("test", "", "k1"),
                IndexedField::new("test", "demo", "k1"),
                IndexedField::new("test", "demo", "k2"),
            ]
        );
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut second = descriptor("demo", "k1", "idx_a");
        second.index_type = IndexType::String;
        let snapshot = Snapshot::from_descriptors([descriptor("demo", "k1", "idx_a"), second]);
        assert_eq!(snapshot.len(), 1);
        let key = IndexKey::new("test", "demo", "k1", "idx_a");
        assert_eq!(snapshot.get(&key).unwrap().index_type, IndexType::Numeric);
    }

    #[test]
    fn test_indexes_for_field() {
        let snapshot = Snapshot::from_descriptors([
            descriptor("demo", "k1", "idx_z"),
            descriptor("demo", "k1", "idx_a"),
            descriptor("demo", "k2", "idx_c"),
        ]);
        let names = snapshot
            .indexes_for(&IndexedField::new("test", "demo", "k1"))
            .into_iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["idx_a", "idx_z"]);
        assert!(
            snapshot
                .indexes_for(&IndexedField::new("test", "demo", "k3"))
                .is_empty()
        );
    }
}
