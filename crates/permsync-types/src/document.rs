//! The in-memory permission document model.
//!
//! A [`Document`] is an ordered sequence of typed [`Block`]s; each block
//! holds an ordered sequence of keyed [`Entry`]s. Documents are immutable by
//! convention: diff and merge operations produce new documents, they never
//! mutate one in place. Block order and entry order are preserved from the
//! source; field order within an entry is normalized (sorted by field name)
//! so that rendering is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::block::BlockKind;

/// A scalar field value inside an entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Parse a rendered scalar: `true`/`false` become [`FieldValue::Bool`],
    /// everything else is text.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => FieldValue::Bool(true),
            "false" => FieldValue::Bool(false),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// The natural key of an entry: one or more segments (e.g. an object name,
/// or `Object.Field` split into two segments).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryKey(Vec<String>);

impl EntryKey {
    /// Build a key from its segments. Empty segments are kept as-is; an
    /// entirely empty key is legal at this layer (validation happens later).
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dot-joined key string.
    pub fn parse(s: &str) -> Self {
        Self(s.split('.').map(str::to_string).collect())
    }

    /// The key segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for EntryKey {
    fn from(s: &str) -> Self {
        EntryKey::parse(s)
    }
}

/// One keyed permission record with scalar fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The natural key of this entry within its block.
    pub key: EntryKey,
    /// Field name to scalar value, sorted by field name.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Entry {
    /// Create an entry with no fields.
    pub fn new(key: impl Into<EntryKey>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Field names on which this entry differs from `other`.
    ///
    /// A field present on only one side counts as differing.
    pub fn differing_fields(&self, other: &Entry) -> Vec<String> {
        let mut names: BTreeSet<&String> = self.fields.keys().collect();
        names.extend(other.fields.keys());
        names
            .into_iter()
            .filter(|name| self.fields.get(*name) != other.fields.get(*name))
            .cloned()
            .collect()
    }
}

/// A typed group of entries within a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block kind.
    pub kind: BlockKind,
    /// Entries in source order. Keys are not guaranteed unique in the
    /// source; duplicates are a validation concern, not a parse invariant.
    pub entries: Vec<Entry>,
}

impl Block {
    /// Create an empty block of the given kind.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Builder-style entry append.
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// The first entry with the given key, if any.
    pub fn entry(&self, key: &EntryKey) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    /// Keys that appear more than once in this block.
    pub fn duplicate_keys(&self) -> Vec<EntryKey> {
        let mut seen = BTreeSet::new();
        let mut dupes = Vec::new();
        for entry in &self.entries {
            if !seen.insert(&entry.key) && !dupes.contains(&entry.key) {
                dupes.push(entry.key.clone());
            }
        }
        dupes
    }
}

/// One permission record (e.g. a named profile): an ordered list of typed
/// blocks, each holding keyed entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The document name (e.g. "Admin").
    pub name: String,
    /// Blocks in source order.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
        }
    }

    /// Builder-style block append.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// The first block of the given kind, if any.
    pub fn block(&self, kind: BlockKind) -> Option<&Block> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    /// The first entry with the given key within blocks of `kind`.
    pub fn entry(&self, kind: BlockKind, key: &EntryKey) -> Option<&Entry> {
        self.block(kind).and_then(|b| b.entry(key))
    }

    /// The entry inventory for one block kind: every entry key rendered as a
    /// member name. Used by the incremental change detector.
    pub fn member_names(&self, kind: BlockKind) -> BTreeSet<String> {
        self.block(kind)
            .map(|b| b.entries.iter().map(|e| e.key.to_string()).collect())
            .unwrap_or_default()
    }

    /// Duplicate entry keys across all blocks, paired with their block kind.
    pub fn duplicate_keys(&self) -> Vec<(BlockKind, EntryKey)> {
        self.blocks
            .iter()
            .flat_map(|b| b.duplicate_keys().into_iter().map(move |k| (b.kind, k)))
            .collect()
    }

    /// Returns `true` if the document has no blocks (or only empty blocks).
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.entries.is_empty())
    }
}
