//! Defines the [`Tag`] and [`TagSet`] types and [`collect`], which gathers the
//! distinct tags referenced by a set of [`Document`]s.

use crate::document::Document;
use std::collections::{btree_set, BTreeSet};
use std::fmt;
use std::iter::FromIterator;

/// Represents a [`Document`] tag. A tag is never empty and is compared
/// byte-for-byte, so `Rust` and `rust` are distinct tags.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    /// Returns `None` if `name` is empty.
    pub fn new(name: impl Into<String>) -> Option<Tag> {
        let name = name.into();
        match name.is_empty() {
            true => None,
            false => Some(Tag(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The distinct tags of a site. Iteration is sorted, which keeps log output
/// and error reports stable from one build to the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        match Tag::new(name) {
            Some(tag) => self.0.contains(&tag),
            None => false,
        }
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Tag> {
        self.0.iter()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> TagSet {
        TagSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for TagSet {
    type Item = Tag;
    type IntoIter = btree_set::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Flattens the tags of every document into a single deduplicated set. A
/// document without tags contributes nothing; see [`Document::tags`] for how
/// malformed tag metadata is handled.
pub fn collect(documents: &[Document]) -> TagSet {
    let tags: TagSet = documents
        .iter()
        .flat_map(|document| document.tags())
        .filter_map(Tag::new)
        .collect();
    log::debug!(
        "Collected {} distinct tags from {} documents",
        tags.len(),
        documents.len()
    );
    tags
}
