//! Lookup keys for the index metadata cache.

use std::fmt;

/// Identifies one named secondary index: `(namespace, set, bin, index name)`.
///
/// Equality and hashing cover all four components. An empty `set` denotes the
/// namespace's null set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey {
    pub namespace: String,
    pub set: String,
    pub bin: String,
    pub index_name: String,
}

impl IndexKey {
    pub fn new(
        namespace: impl Into<String>,
        set: impl Into<String>,
        bin: impl Into<String>,
        index_name: impl Into<String>,
    ) -> IndexKey {
        IndexKey {
            namespace: namespace.into(),
            set: set.into(),
            bin: bin.into(),
            index_name: index_name.into(),
        }
    }

    /// Projects the key onto the field it indexes, dropping the index name.
    pub fn field(&self) -> IndexedField {
        IndexedField::new(&self.namespace, &self.set, &self.bin)
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}/{}",
            self.namespace, self.set, self.bin, self.index_name
        )
    }
}

/// Identifies a bin that may be covered by one or more indexes:
/// `(namespace, set, bin)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexedField {
    pub namespace: String,
    pub set: String,
    pub bin: String,
}

impl IndexedField {
    pub fn new(
        namespace: impl Into<String>,
        set: impl Into<String>,
        bin: impl Into<String>,
    ) -> IndexedField {
        IndexedField {
            namespace: namespace.into(),
            set: set.into(),
            bin: bin.into(),
        }
    }
}

impl fmt::Display for IndexedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.namespace, self.set, self.bin)
    }
}

#[cfg(test)]
mod tests {
    use ahash::AHashSet;

    use super::{IndexKey, IndexedField};

    #[test]
    fn test_key_projection() {
        let key = IndexKey::new("test", "demo", "k1", "idx_k1");
        assert_eq!(key.field(), IndexedField::new("test", "demo", "k1"));
        assert_eq!(key.to_string(), "test.demo.k1/idx_k1");
        assert_eq!(key.field().to_string(), "test.demo.k1");
    }

    #[test]
    fn test_key_equality_covers_all_components() {
        let mut keys = AHashSet::new();
        keys.insert(IndexKey::new("test", "demo", "k1", "idx_a"));
        keys.insert(IndexKey::new("test", "demo", "k1", "idx_b"));
        keys.insert(IndexKey::new("test", "", "k1", "idx_a"));
        keys.insert(IndexKey::new("test", "demo", "k1", "idx_a"));
        assert_eq!(keys.len(), 3);

        let fields: AHashSet<_> = keys.iter().map(IndexKey::field).collect();
        assert_eq!(fields.len(), 2);
    }
}
