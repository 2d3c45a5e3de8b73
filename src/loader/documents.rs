//! Document Loading
//!
//! Resolves the operation pointer (a file or a glob) to files, then loads
//! each file with the GraphQL file loader or the code file loader.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use globset::GlobBuilder;
use ignore::WalkBuilder;

use super::pluck::pluck;
use super::schema::GRAPHQL_EXTENSIONS;

/// Source files that may embed operations
pub const CODE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts", "vue", "svelte", "astro",
];

/// An operation document ready for validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Where the document came from, as shown in diagnostics
    pub location: String,
    pub source: String,
}

/// How a file is turned into a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    GraphQl,
    Code,
}

impl DocumentKind {
    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if GRAPHQL_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::GraphQl)
        } else if CODE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Code)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentLoader {
    root: PathBuf,
    excluded: Vec<PathBuf>,
}

impl DocumentLoader {
    /// Relative pointers are resolved against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: Vec::new(),
        }
    }

    /// Never load `path` as a document (the schema file usually)
    pub fn exclude(mut self, path: impl AsRef<Path>) -> Self {
        let path = self.root.join(path);
        self.excluded
            .push(std::fs::canonicalize(&path).unwrap_or(path));
        self
    }

    /// Files matched by `pointer`, sorted by path
    pub fn discover(&self, pointer: &str) -> Result<Vec<PathBuf>> {
        let direct = self.root.join(pointer);
        if direct.is_file() {
            return Ok(self.keep_included(vec![direct]));
        }

        let (base, pattern) = split_glob(pointer);
        let base = if base.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(base)
        };
        if !base.is_dir() {
            log::debug!("Glob base {} is not a directory", base.display());
            return Ok(Vec::new());
        }
        let pattern = if pattern.is_empty() { "**".to_string() } else { pattern };

        // `*` stays within one path segment, only `**` crosses directories
        let matcher = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid document pattern '{}'", pointer))?
            .compile_matcher();

        let mut walker = WalkBuilder::new(&base);
        if !pattern.contains("**") {
            walker.max_depth(Some(pattern.split('/').count()));
        }

        let mut files = Vec::new();
        for entry in walker.build() {
            let entry = entry.with_context(|| format!("Failed to walk {}", base.display()))?;
            if !entry.file_type().is_some_and(|ty| ty.is_file()) {
                continue;
            }
            let relative = entry.path().strip_prefix(&base).unwrap_or(entry.path());
            if matcher.is_match(relative) {
                files.push(entry.into_path());
            }
        }
        files.sort();

        Ok(self.keep_included(files))
    }

    fn keep_included(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        if self.excluded.is_empty() {
            return files;
        }
        files
            .into_iter()
            .filter(|file| {
                let canonical = std::fs::canonicalize(file).unwrap_or_else(|_| file.clone());
                let keep = !self.excluded.contains(&canonical);
                if !keep {
                    log::debug!("Not loading schema file {} as a document", file.display());
                }
                keep
            })
            .collect()
    }

    /// Load every document matched by `pointer`, in path order
    pub async fn load(&self, pointer: &str) -> Result<Vec<Document>> {
        let files = self.discover(pointer)?;
        log::debug!("Pointer '{}' matched {} files", pointer, files.len());

        let mut documents = Vec::new();
        for path in files {
            documents.extend(load_document(&path, self.display_path(&path)).await?);
        }

        if documents.is_empty() {
            log::warn!("No GraphQL documents found for '{}'", pointer);
        }
        Ok(documents)
    }

    fn display_path(&self, path: &Path) -> String {
        let relative = if self.root == Path::new(".") {
            path.strip_prefix(&self.root).unwrap_or(path)
        } else {
            path
        };
        relative.display().to_string()
    }
}

/// Load the documents of one file. A GraphQL file is one document, a code
/// file has one document per embedded operation.
pub async fn load_document(path: &Path, location: String) -> Result<Vec<Document>> {
    let Some(kind) = DocumentKind::for_path(path) else {
        log::debug!("Skipping {}: not a GraphQL or code file", path.display());
        return Ok(Vec::new());
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read document {}", path.display()))?;

    let sources = match kind {
        DocumentKind::GraphQl => {
            if content.trim().is_empty() {
                log::warn!("Skipping empty document {}", path.display());
                return Ok(Vec::new());
            }
            vec![content]
        }
        DocumentKind::Code => {
            let sources = pluck(&content);
            if sources.is_empty() {
                log::debug!("No embedded operations in {}", path.display());
            }
            sources
        }
    };

    Ok(sources
        .into_iter()
        .map(|source| Document {
            location: location.clone(),
            source,
        })
        .collect())
}

/// Split a glob into its literal directory prefix and the remaining pattern
fn split_glob(pointer: &str) -> (PathBuf, String) {
    let is_glob = |segment: &str| segment.contains(['*', '?', '[', '{']);

    let path = Path::new(pointer);
    let mut base = PathBuf::new();
    let mut rest = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(segment) if rest.is_empty() => {
                let segment = segment.to_string_lossy();
                if is_glob(&segment) {
                    rest.push(segment.into_owned());
                } else {
                    base.push(&*segment);
                }
            }
            Component::Normal(segment) => rest.push(segment.to_string_lossy().into_owned()),
            other if rest.is_empty() => base.push(other.as_os_str()),
            other => rest.push(other.as_os_str().to_string_lossy().into_owned()),
        }
    }

    (base, rest.join("/"))
}
