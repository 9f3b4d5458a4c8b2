//! Component discovery
//!
//! Walks a dotted namespace and produces the fully-qualified names found
//! under it, depth-first. Discovery is pure: nothing is constructed or
//! inspected here, and the output may include non-component artifacts that
//! downstream stages filter out.

use crate::error::{Result, WirefrontError};
use std::path::PathBuf;

/// One entry of a namespace listing, by simple name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// A nested namespace the scanner recurses into.
    Namespace(String),
    /// A leaf artifact, emitted as `namespace.Simple`.
    Artifact(String),
}

/// Host mechanism that resolves a namespace identifier to a concrete listing.
///
/// Returns `None` when the location is not resolvable at all, which the
/// scanner treats as fatal.
pub trait Listing: Send + Sync {
    fn entries(&self, location: &str) -> Option<Vec<ListEntry>>;
}

/// Filesystem-backed listing: `a.b.c` resolves to `<root>/a/b/c`.
///
/// File artifacts have their final extension stripped, so `UserController.rs`
/// lists as `UserController`.
pub struct FsListing {
    root: PathBuf,
}

impl FsListing {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Listing for FsListing {
    fn entries(&self, location: &str) -> Option<Vec<ListEntry>> {
        let dir = self.root.join(location.replace('.', "/"));
        let listing = std::fs::read_dir(dir).ok()?;
        let mut out = Vec::new();
        for entry in listing.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                out.push(ListEntry::Namespace(name));
            } else {
                let stem = match name.rsplit_once('.') {
                    Some((stem, _ext)) => stem.to_string(),
                    None => name,
                };
                out.push(ListEntry::Artifact(stem));
            }
        }
        // Directory iteration order is platform-dependent; sort for a
        // deterministic scan sequence.
        out.sort_by(|a, b| {
            let key = |e: &ListEntry| match e {
                ListEntry::Namespace(n) | ListEntry::Artifact(n) => n.clone(),
            };
            key(a).cmp(&key(b))
        });
        Some(out)
    }
}

/// The component scanner.
pub struct Scanner<L: Listing> {
    listing: L,
}

impl<L: Listing> Scanner<L> {
    pub fn new(listing: L) -> Self {
        Self { listing }
    }

    /// Produce the fully-qualified names reachable under `namespace`,
    /// recursing into sub-namespaces depth-first.
    pub fn scan(&self, namespace: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.walk(namespace, &mut names)?;
        Ok(names)
    }

    fn walk(&self, namespace: &str, names: &mut Vec<String>) -> Result<()> {
        let entries = self
            .listing
            .entries(namespace)
            .ok_or_else(|| WirefrontError::ResourceNotFound {
                location: namespace.to_string(),
            })?;
        for entry in entries {
            match entry {
                ListEntry::Namespace(simple) => {
                    self.walk(&format!("{namespace}.{simple}"), names)?;
                }
                ListEntry::Artifact(simple) => {
                    names.push(format!("{namespace}.{simple}"));
                }
            }
        }
        Ok(())
    }
}
