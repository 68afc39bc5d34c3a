//! Lenient parser for the cluster's "list secondary indexes" info response.
//!
//! # Response layout
//!
//! The response is a newline-separated sequence of lines. Each line uses one
//! of two layouts:
//!
//! - **Native**: fields are `:`-separated and several index definitions are
//!   packed into one line, separated by `;`:
//!   `ns=test:indexname=idx_k1:set=demo:bin=k1:type=STRING:indextype=NONE:state=RW;ns=...`
//! - **Compact**: the line holds a single definition whose fields are
//!   `;`-separated: `ns=test;set=demo;bin=k1;name=idx_k1;type=STRING;`
//!
//! A line is native when its first `:` comes before its first `;`, otherwise
//! it is compact, so compact values may contain `:` (`bin=a:b`) but native
//! values may not. Every field is `key=value`; keys are matched case
//! insensitively and unknown keys are ignored. A key may appear only once per
//! definition: a repeated key (including two definitions run together on one
//! compact line) rejects the whole definition. `ns`, `bin`, `name` (or `indexname`) and `type`
//! are required. A missing set, or the literal `NULL`, denotes the null set.
//! `indextype` defaults to `NONE` and `state` to `RW`.
//!
//! Malformed definitions are skipped and reported as [`ParseDiagnostic`]s;
//! the remaining definitions still make up the snapshot.

use ahash::{AHashMap, AHashSet};
use thiserror::Error;

use crate::{
    descriptor::{CollectionType, IndexDescriptor, IndexState, IndexType},
    key::IndexKey,
    snapshot::Snapshot,
};

const NATIVE_FIELD_SEPARATOR: char = ':';
const NATIVE_ENTRY_SEPARATOR: char = ';';
const COMPACT_FIELD_SEPARATOR: char = ';';
const NULL_SET: &str = "NULL";

/// Result of parsing one info response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub snapshot: Snapshot,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// A skipped index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Zero-based position of the definition among the non-empty definitions
    /// of the response.
    pub entry: usize,
    /// The definition text as received.
    pub raw: String,
    pub issue: ParseIssue,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssue {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' is not a key=value pair")]
    MalformedField(String),

    #[error("field '{0}' appears more than once")]
    DuplicateField(String),

    #[error("unknown index type '{0}'")]
    UnknownIndexType(String),

    #[error("unknown collection type '{0}'")]
    UnknownCollectionType(String),

    #[error("unknown index state '{0}'")]
    UnknownState(String),

    #[error("duplicate definition of index {0}")]
    DuplicateKey(IndexKey),
}

/// Parses an info response into a snapshot plus diagnostics for every
/// definition that had to be skipped. An empty response yields an empty
/// snapshot.
pub fn parse(response: &str) -> ParseOutcome {
    let mut descriptors = Vec::new();
    let mut seen = AHashSet::new();
    let mut diagnostics = Vec::new();

    for (entry, (raw, separator)) in split_entries(response).into_iter().enumerate() {
        let result = parse_entry(raw, separator).and_then(|descriptor| {
            let key = descriptor.key();
            if seen.contains(&key) {
                Err(ParseIssue::DuplicateKey(key))
            } else {
                seen.insert(key);
                Ok(descriptor)
            }
        });
        match result {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(issue) => diagnostics.push(ParseDiagnostic {
                entry,
                raw: raw.to_string(),
                issue,
            }),
        }
    }

    ParseOutcome {
        snapshot: Snapshot::from_descriptors(descriptors),
        diagnostics,
    }
}

/// Splits the response into definitions, each paired with its field separator.
fn split_entries(response: &str) -> Vec<(&str, char)> {
    let mut entries = Vec::new();
    for line in response.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_native_line(line) {
            entries.extend(
                line.split(NATIVE_ENTRY_SEPARATOR)
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(|e| (e, NATIVE_FIELD_SEPARATOR)),
            );
        } else if line
            .split(COMPACT_FIELD_SEPARATOR)
            .any(|f| !f.trim().is_empty())
        {
            entries.push((line, COMPACT_FIELD_SEPARATOR));
        }
    }
    entries
}

fn is_native_line(line: &str) -> bool {
    match (
        line.find(NATIVE_FIELD_SEPARATOR),
        line.find(COMPACT_FIELD_SEPARATOR),
    ) {
        (Some(colon), Some(semicolon)) => colon < semicolon,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn parse_entry(raw: &str, separator: char) -> Result<IndexDescriptor, ParseIssue> {
    let mut fields = AHashMap::new();
    for field in raw.split(separator).map(str::trim).filter(|f| !f.is_empty()) {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| ParseIssue::MalformedField(field.to_string()))?;
        let key = key.trim().to_ascii_lowercase();
        if fields.contains_key(&key) {
            return Err(ParseIssue::DuplicateField(key));
        }
        fields.insert(key, value.trim());
    }

    let required = |name: &'static str| {
        fields
            .get(name)
            .copied()
            .filter(|v| !v.is_empty())
            .ok_or(ParseIssue::MissingField(name))
    };

    let namespace = required("ns")?;
    let bin = required("bin")?;
    let name = required("name")
        .or_else(|_| required("indexname"))
        .map_err(|_| ParseIssue::MissingField("name"))?;
    let type_str = required("type")?;
    let index_type = IndexType::parse(type_str)
        .ok_or_else(|| ParseIssue::UnknownIndexType(type_str.to_string()))?;

    let collection_type = match fields.get("indextype").filter(|v| !v.is_empty()) {
        Some(v) => CollectionType::parse(v)
            .ok_or_else(|| ParseIssue::UnknownCollectionType(v.to_string()))?,
        None => CollectionType::None,
    };
    let state = match fields.get("state").filter(|v| !v.is_empty()) {
        Some(v) => IndexState::parse(v).ok_or_else(|| ParseIssue::UnknownState(v.to_string()))?,
        None => IndexState::ReadWrite,
    };
    let set = match fields.get("set") {
        Some(&s) if !s.eq_ignore_ascii_case(NULL_SET) => s,
        _ => "",
    };

    Ok(IndexDescriptor {
        name: name.to_string(),
        namespace: namespace.to_string(),
        set: set.to_string(),
        bin: bin.to_string(),
        index_type,
        collection_type,
        state,
    })
}
