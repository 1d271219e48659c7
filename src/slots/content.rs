// src/slots/content.rs

//! Content kinds observed inside a tracked subdirectory.
//!
//! - [`ContentKind`] is the closed set of recognized kinds.
//! - [`ContentFlags`] is a small set over those kinds that only ever grows
//!   (OR-accumulate) until the owning slot is released.
//! - [`ContentClassifier`] maps a file name to a kind by its extension.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// A recognized kind of file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Media,
    Subtitle,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Text, ContentKind::Media, ContentKind::Subtitle];

    const fn bit(self) -> u8 {
        match self {
            ContentKind::Text => 0x01,
            ContentKind::Media => 0x02,
            ContentKind::Subtitle => 0x04,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Media => "media",
            ContentKind::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of [`ContentKind`]s.
///
/// The bit layout (`Text = 0x1`, `Media = 0x2`, `Subtitle = 0x4`) is only
/// exposed through [`ContentFlags::bits`] for the notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentFlags(u8);

impl ContentFlags {
    pub const fn empty() -> Self {
        ContentFlags(0)
    }

    pub fn insert(&mut self, kind: ContentKind) {
        self.0 |= kind.bit();
    }

    pub fn with(mut self, kind: ContentKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn contains(self, kind: ContentKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn union(self, other: ContentFlags) -> Self {
        ContentFlags(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = ContentKind> {
        ContentKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<ContentKind> for ContentFlags {
    fn from_iter<I: IntoIterator<Item = ContentKind>>(iter: I) -> Self {
        iter.into_iter().fold(ContentFlags::empty(), ContentFlags::with)
    }
}

impl fmt::Display for ContentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.iter().map(ContentKind::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl Serialize for ContentFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Maps file extensions to content kinds.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    by_extension: HashMap<String, ContentKind>,
}

impl ContentClassifier {
    /// Build from `(extension, kind)` pairs. Extensions are given without the
    /// leading dot and are matched case-sensitively.
    pub fn new<I, S>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (S, ContentKind)>,
        S: Into<String>,
    {
        let by_extension = mapping
            .into_iter()
            .map(|(ext, kind)| (ext.into(), kind))
            .collect();
        Self { by_extension }
    }

    /// Classify a file name by the suffix after its last `.`.
    ///
    /// A bare dot-file such as `.txt` still has the extension `txt`.
    pub fn classify(&self, file_name: &str) -> Option<ContentKind> {
        let (_, ext) = file_name.rsplit_once('.')?;
        self.by_extension.get(ext).copied()
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        ContentClassifier::new([
            ("txt", ContentKind::Text),
            ("mp4", ContentKind::Media),
            ("srt", ContentKind::Subtitle),
        ])
    }
}
