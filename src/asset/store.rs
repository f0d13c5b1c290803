//! Asset store: the single owner of every asset in one build.

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::{AssetKind, ReferenceSite};
use crate::hash::{ContentHasher, HashError};

/// Stable asset identifier (discovery index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(usize);

impl AssetId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One discovered file.
#[derive(Debug)]
pub struct Asset {
    /// Canonical path relative to the input root (`assets/main.js`).
    pub path: String,
    pub kind: AssetKind,
    /// Original content. Never modified; rewriting produces new buffers.
    pub bytes: Vec<u8>,
    /// `None` until the extractor has run.
    sites: Option<Vec<ReferenceSite>>,
    /// Assigned output path relative to the output root.
    output: Option<String>,
    /// Memoized hash of `bytes`.
    hash: Option<String>,
}

impl Asset {
    fn new(path: String, kind: AssetKind, bytes: Vec<u8>) -> Self {
        Self {
            path,
            kind,
            bytes,
            sites: None,
            output: None,
            hash: None,
        }
    }

    /// Reference sites, empty until extracted.
    pub fn sites(&self) -> &[ReferenceSite] {
        self.sites.as_deref().unwrap_or_default()
    }

    pub fn is_extracted(&self) -> bool {
        self.sites.is_some()
    }

    /// Assigned output path, or the input path while unassigned.
    pub fn output_path(&self) -> &str {
        self.output.as_deref().unwrap_or(&self.path)
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Content hash of the original bytes, computed once.
    pub fn content_hash(&mut self, hasher: &dyn ContentHasher) -> Result<&str, HashError> {
        if self.hash.is_none() {
            let digest = hasher.hash(&self.bytes)?;
            crate::hash::validate(&digest)?;
            self.hash = Some(digest);
        }
        Ok(self.hash.as_deref().unwrap_or_default())
    }
}

/// Holds every discovered asset keyed by [`AssetId`], with path lookup.
#[derive(Debug)]
pub struct AssetStore {
    root: PathBuf,
    assets: Vec<Asset>,
    index: FxHashMap<String, AssetId>,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            assets: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Input root the asset paths are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert an asset, or return the existing id for the same path.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) -> AssetId {
        let path = path.into();
        if let Some(&id) = self.index.get(&path) {
            return id;
        }
        let id = AssetId(self.assets.len());
        let kind = AssetKind::from_path(&path);
        self.index.insert(path.clone(), id);
        self.assets.push(Asset::new(path, kind, bytes));
        id
    }

    pub fn lookup(&self, path: &str) -> Option<AssetId> {
        self.index.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    #[inline]
    pub fn get(&self, id: AssetId) -> &Asset {
        &self.assets[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: AssetId) -> &mut Asset {
        &mut self.assets[id.0]
    }

    /// Record extracted reference sites. Each asset is extracted at most once.
    pub fn set_sites(&mut self, id: AssetId, sites: Vec<ReferenceSite>) {
        let asset = &mut self.assets[id.0];
        debug_assert!(asset.sites.is_none(), "{} extracted twice", asset.path);
        asset.sites = Some(sites);
    }

    pub fn set_output(&mut self, id: AssetId, output: impl Into<String>) {
        self.assets[id.0].output = Some(output.into());
    }

    /// Ids in discovery order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = AssetId> + use<> {
        (0..self.assets.len()).map(AssetId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetId, &Asset)> {
        self.assets.iter().enumerate().map(|(i, a)| (AssetId(i), a))
    }

    /// First asset (in discovery order) not yet extracted.
    pub fn next_unextracted(&self, from: usize) -> Option<AssetId> {
        (from..self.assets.len())
            .find(|&i| !self.assets[i].is_extracted())
            .map(AssetId)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashAlgorithm;

    #[test]
    fn test_insert_is_idempotent() {
        let mut store = AssetStore::new("/in");
        let a = store.insert("style.css", b"body{}".to_vec());
        let b = store.insert("style.css", b"ignored".to_vec());
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(a).bytes, b"body{}");
        assert_eq!(store.get(a).kind, AssetKind::Css);
    }

    #[test]
    fn test_output_defaults_to_input_path() {
        let mut store = AssetStore::new("/in");
        let id = store.insert("img/a.png", vec![1, 2, 3]);
        assert_eq!(store.get(id).output_path(), "img/a.png");
        assert!(!store.get(id).has_output());

        store.set_output(id, "img/a-123.png");
        assert_eq!(store.get(id).output_path(), "img/a-123.png");
    }

    #[test]
    fn test_content_hash_is_memoized() {
        let mut store = AssetStore::new("/in");
        let id = store.insert("a.txt", b"hello".to_vec());
        let hasher = HashAlgorithm::Md5;

        let first = store.get_mut(id).content_hash(&hasher).unwrap().to_string();
        assert_eq!(first, "5d41402abc4b2a76b9719d911017c592");

        // Mutating bytes does not invalidate: hashes always describe the original content
        store.get_mut(id).bytes.push(b'!');
        let second = store.get_mut(id).content_hash(&hasher).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_next_unextracted() {
        let mut store = AssetStore::new("/in");
        let a = store.insert("a.css", vec![]);
        let b = store.insert("b.css", vec![]);
        assert_eq!(store.next_unextracted(0), Some(a));
        store.set_sites(a, vec![]);
        assert_eq!(store.next_unextracted(0), Some(b));
        store.set_sites(b, vec![]);
        assert_eq!(store.next_unextracted(0), None);
    }
}
