use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

use crate::java::detect_language;

pub struct WalkEntry {
    pub path: PathBuf,
    pub language: String,
}

pub struct FileWalker {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ignore_patterns: Vec::new(),
        }
    }

    /// Extra gitignore-style globs to skip, from `ignore_patterns` in config.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns.to_vec();
        self
    }

    /// Every supported source file under the root, honouring `.gitignore`
    /// and `.apiguardignore`, sorted by path.
    pub fn walk(&self) -> Vec<WalkEntry> {
        let mut entries = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .add_custom_ignore_filename(".apiguardignore");

        if !self.ignore_patterns.is_empty() {
            let mut overrides = OverrideBuilder::new(&self.root);
            for pattern in &self.ignore_patterns {
                if let Err(e) = overrides.add(&format!("!{pattern}")) {
                    tracing::warn!(pattern = %pattern, error = %e, "invalid ignore pattern");
                }
            }
            match overrides.build() {
                Ok(o) => {
                    builder.overrides(o);
                }
                Err(e) => tracing::warn!(error = %e, "failed to build ignore patterns"),
            }
        }
        let walker = builder.build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                continue;
            }

            let path = entry.into_path();
            if let Some(lang) = detect_language(&path) {
                entries.push(WalkEntry {
                    path,
                    language: lang.to_string(),
                });
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}
