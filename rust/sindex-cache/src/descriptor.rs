//! Immutable metadata describing a single secondary index.

use std::fmt;

use crate::key::{IndexKey, IndexedField};

/// Type of the values an index is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    Numeric,
    String,
    Blob,
    /// GeoJSON values (`GEO2DSPHERE`).
    Geo2DSphere,
}

impl IndexType {
    /// Parses the administrative-protocol spelling, case insensitively.
    pub fn parse(s: &str) -> Option<IndexType> {
        let t = match s.to_ascii_uppercase().as_str() {
            "NUMERIC" => IndexType::Numeric,
            "STRING" => IndexType::String,
            "BLOB" => IndexType::Blob,
            "GEO2DSPHERE" | "GEOJSON" => IndexType::Geo2DSphere,
            _ => return None,
        };
        Some(t)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Numeric => "NUMERIC",
            IndexType::String => "STRING",
            IndexType::Blob => "BLOB",
            IndexType::Geo2DSphere => "GEO2DSPHERE",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of a collection bin the index covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CollectionType {
    /// Scalar bin value.
    #[default]
    None,
    List,
    MapKeys,
    MapValues,
}

impl CollectionType {
    pub fn parse(s: &str) -> Option<CollectionType> {
        let t = match s.to_ascii_uppercase().as_str() {
            "NONE" | "DEFAULT" => CollectionType::None,
            "LIST" => CollectionType::List,
            "MAPKEYS" => CollectionType::MapKeys,
            "MAPVALUES" => CollectionType::MapValues,
            _ => return None,
        };
        Some(t)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::None => "NONE",
            CollectionType::List => "LIST",
            CollectionType::MapKeys => "MAPKEYS",
            CollectionType::MapValues => "MAPVALUES",
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build state reported by the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IndexState {
    /// Fully built and usable by queries.
    #[default]
    ReadWrite,
    /// Still being populated; writes are indexed but queries must not rely on it.
    WriteOnly,
}

impl IndexState {
    pub fn parse(s: &str) -> Option<IndexState> {
        match s.to_ascii_uppercase().as_str() {
            "RW" => Some(IndexState::ReadWrite),
            "WO" => Some(IndexState::WriteOnly),
            _ => None,
        }
    }
}

/// Metadata for one secondary index, as last reported by the cluster.
///
/// Descriptors are produced by the snapshot parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexDescriptor {
    pub name: String,
    pub namespace: String,
    pub set: String,
    pub bin: String,
    pub index_type: IndexType,
    pub collection_type: CollectionType,
    pub state: IndexState,
}

impl IndexDescriptor {
    pub fn key(&self) -> IndexKey {
        IndexKey::new(&self.namespace, &self.set, &self.bin, &self.name)
    }

    pub fn field(&self) -> IndexedField {
        IndexedField::new(&self.namespace, &self.set, &self.bin)
    }

    /// Whether a query planner may use this index.
    pub fn is_queryable(&self) -> bool {
        self.state == IndexState::ReadWrite
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectionType, IndexState, IndexType};

    #[test]
    fn test_index_type_parse() {
        assert_eq!(IndexType::parse("string"), Some(IndexType::String));
        assert_eq!(IndexType::parse("NUMERIC"), Some(IndexType::Numeric));
        assert_eq!(IndexType::parse("GeoJSON"), Some(IndexType::Geo2DSphere));
        assert_eq!(IndexType::parse("float"), None);
        assert_eq!(IndexType::Geo2DSphere.to_string(), "GEO2DSPHERE");
    }

    #[test]
    fn test_collection_type_parse() {
        assert_eq!(CollectionType::parse("none"), Some(CollectionType::None));
        assert_eq!(CollectionType::parse("MAPKEYS"), Some(CollectionType::MapKeys));
        assert_eq!(CollectionType::parse("mapvalues"), Some(CollectionType::MapValues));
        assert_eq!(CollectionType::parse("set"), None);
        assert_eq!(CollectionType::List.to_string(), "LIST");
    }

    #[test]
    fn test_state_parse() {
        assert_eq!(IndexState::parse("rw"), Some(IndexState::ReadWrite));
        assert_eq!(IndexState::parse("WO"), Some(IndexState::WriteOnly));
        assert_eq!(IndexState::parse("RO"), None);
    }
}
