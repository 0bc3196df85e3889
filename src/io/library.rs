//! Directory-backed collection of named template images

use crate::io::configuration::IMAGE_EXTENSIONS;
use crate::io::error::{Result, StereogramError, not_found};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};

/// Template images found in one directory, named by file stem
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    root: PathBuf,
    entries: Vec<PathBuf>,
}

impl TemplateLibrary {
    /// Scan `root` for template images
    ///
    /// Entries are sorted by path so that seeded choices are reproducible
    /// across platforms and directory iteration orders.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `root` is not a directory (`NotFound`)
    /// - The directory cannot be read
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(not_found("template directory", &root.display()));
        }

        let read_error = |e| StereogramError::FileSystem {
            path: root.to_path_buf(),
            operation: "read directory",
            source: e,
        };

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(root).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if path.is_file() && is_image_file(&path) {
                entries.push(path);
            }
        }
        entries.sort();

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// Directory this library was read from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of templates available
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the directory held no templates
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Template names in path order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|path| template_name(path)).collect()
    }

    /// Look up a template by file stem
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no template has this name
    pub fn find(&self, name: &str) -> Result<&Path> {
        self.entries
            .iter()
            .find(|path| template_name(path) == name)
            .map(PathBuf::as_path)
            .ok_or_else(|| not_found("template", &name))
    }

    /// Pick one template uniformly at random
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the library is empty
    pub fn choose(&self, seed: u64) -> Result<&Path> {
        if self.entries.is_empty() {
            return Err(not_found("template", &self.root.display()));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let index = rng.random_range(0..self.entries.len());
        self.entries
            .get(index)
            .map(PathBuf::as_path)
            .ok_or_else(|| not_found("template", &index))
    }
}

/// Whether `path` has one of the supported image extensions
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn template_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
