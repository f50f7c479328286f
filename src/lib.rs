//! UYAML
//!
//! Read, edit and write Unity scenes, prefabs and assets stored in Unity's
//! YAML text format, preserving property order and Unity's own layout.
//!
//! # Examples
//!
//! ```rust,no_run
//! use uyaml::UyamlDocument;
//!
//! // Load a Unity YAML file
//! let mut doc = UyamlDocument::load("Assets/Prefabs/Player.prefab")?;
//!
//! for component in doc.components() {
//!     println!("{} {:?}", component, component.name());
//! }
//!
//! doc.save()?;
//! # Ok::<(), uyaml::UyamlError>(())
//! ```

// Re-export from core and text crates
pub use uyaml_core::{
    Array, ClassId, Component, LineEnding, Node, Object, Property, Result, UyamlError, Value,
    get_class_name,
};

pub use uyaml_text::{Parser, UyamlDocument, Writer, WriterOptions, parse, write};

/// Environment for managing multiple Unity assets
pub mod environment {
    use crate::{ClassId, Component, Result, UyamlDocument, UyamlError};
    use std::collections::{BTreeMap, HashMap};
    use std::path::{Path, PathBuf};
    use tracing::{debug, warn};

    /// File extensions of Unity's YAML serialized assets
    pub const ASSET_EXTENSIONS: &[&str] = &["unity", "prefab", "asset", "mat", "controller", "anim"];

    /// Directories of a Unity project that never hold source assets
    const SKIPPED_DIRECTORIES: &[&str] = &["Library", "Temp", "Logs", ".git", "obj", "bin"];

    /// A set of documents loaded from a Unity project
    #[derive(Debug, Default)]
    pub struct Environment {
        /// Loaded documents, keyed by path
        documents: BTreeMap<PathBuf, UyamlDocument>,
    }

    impl Environment {
        /// Create a new environment
        pub fn new() -> Self {
            Self::default()
        }

        /// Load assets from a path (file or directory)
        pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
            let path = path.as_ref();

            if path.is_dir() {
                self.load_directory(path)
            } else {
                self.load_file(path).map(|_| ())
            }
        }

        /// Load a single file. Files without a known asset extension are
        /// ignored and reported as `false`.
        pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<bool> {
            let path = path.as_ref();
            if !is_asset(path) {
                return Ok(false);
            }

            let doc = UyamlDocument::load(path)?;
            self.documents.insert(path.to_path_buf(), doc);
            Ok(true)
        }

        /// Load all supported files below a directory
        pub fn load_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
            let path = path.as_ref();

            if !path.is_dir() {
                return Err(UyamlError::format(format!(
                    "Path is not a directory: {:?}",
                    path
                )));
            }

            self.traverse_directory(path)
        }

        /// Recursively traverse directory and load Unity files
        fn traverse_directory(&mut self, dir: &Path) -> Result<()> {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();

                if path.is_dir() {
                    let skipped = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|name| SKIPPED_DIRECTORIES.contains(&name));
                    if skipped {
                        debug!(path = %path.display(), "skipping directory");
                        continue;
                    }
                    self.traverse_directory(&path)?;
                } else if path.is_file() {
                    // One broken asset should not stop the rest from loading
                    if let Err(e) = self.load_file(&path) {
                        warn!(path = %path.display(), error = %e, "failed to load asset");
                    }
                }
            }

            Ok(())
        }

        /// Loaded documents, keyed by path
        pub fn documents(&self) -> &BTreeMap<PathBuf, UyamlDocument> {
            &self.documents
        }

        pub fn document<P: AsRef<Path>>(&self, path: P) -> Option<&UyamlDocument> {
            self.documents.get(path.as_ref())
        }

        /// Get all components from all loaded documents
        pub fn components(&self) -> impl Iterator<Item = &Component> {
            self.documents.values().flat_map(|doc| doc.components())
        }

        pub fn filter_by_class<C: Into<ClassId>>(&self, class_id: C) -> Vec<&Component> {
            let class_id = class_id.into();
            self.components()
                .filter(|c| c.class_id == class_id)
                .collect()
        }

        /// Rewrite `guid` references in every loaded document
        pub fn remap_guids(&mut self, map: &HashMap<String, String>) -> usize {
            self.documents
                .values_mut()
                .map(|doc| doc.remap_guids(map))
                .sum()
        }

        /// Write every document back to the file it came from
        pub fn save_all(&self) -> Result<()> {
            for doc in self.documents.values() {
                doc.save()?;
            }
            Ok(())
        }
    }

    fn is_asset(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ASSET_EXTENSIONS.contains(&ext))
    }

}

pub use environment::Environment;
