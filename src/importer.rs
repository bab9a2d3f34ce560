//! Directory importer
//!
//! Walks one directory (no recursion), maps every matching file to a table
//! and hands it to a [`Database`]. Per-file failures are logged and
//! collected in the [`ImportReport`]; they never stop the run.

use crate::config::{Delimiter, Settings};
use crate::db::{Database, LoadSummary};
use crate::error::{ImportError, ImportResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Imports every matching file of one directory
#[derive(Debug, Clone)]
pub struct DirectoryImporter {
    directory: PathBuf,
    extension: String,
    delimiter: Delimiter,
}

/// A file that was loaded
#[derive(Debug)]
pub struct ImportedFile {
    pub file: String,
    pub summary: LoadSummary,
}

/// A file that matched but could not be loaded
#[derive(Debug)]
pub struct FailedFile {
    pub file: String,
    pub error: ImportError,
}

/// What happened to each directory entry
#[derive(Debug, Default)]
pub struct ImportReport {
    pub loaded: Vec<ImportedFile>,
    /// Directories and files with another extension
    pub skipped: Vec<String>,
    pub failed: Vec<FailedFile>,
}

impl ImportReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn rows_loaded(&self) -> u64 {
        self.loaded.iter().map(|f| f.summary.rows).sum()
    }
}

impl DirectoryImporter {
    pub fn new(directory: impl Into<PathBuf>, extension: &str, delimiter: Delimiter) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.trim_start_matches('.').to_lowercase(),
            delimiter,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.directory.clone(),
            &settings.extension,
            settings.delimiter,
        )
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Load every matching file into its table.
    ///
    /// Entries are visited in file-name order. Fails only if the directory
    /// itself is missing or unreadable.
    pub async fn import_all<D: Database>(&self, db: &mut D) -> ImportResult<ImportReport> {
        if !self.directory.exists() {
            return Err(ImportError::DirectoryNotFound(self.directory.clone()));
        }

        let read_dir_err = |source| ImportError::ReadDir {
            path: self.directory.clone(),
            source,
        };
        let mut entries = fs::read_dir(&self.directory)
            .map_err(read_dir_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_dir_err)?;
        entries.sort_by_key(|e| e.file_name());

        // table name -> file that loaded it
        let mut claimed: HashMap<String, String> = HashMap::new();
        let mut report = ImportReport::default();

        for entry in entries {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            if path.is_dir() {
                warn!("Skipping directory: {}", file_name);
                report.skipped.push(file_name);
                continue;
            }
            if !self.matches_extension(&file_name) {
                warn!("Skipping non-{} file: {}", self.extension, file_name);
                report.skipped.push(file_name);
                continue;
            }

            match self.import_file(db, &path, &file_name, &mut claimed).await {
                Ok(summary) => {
                    info!(
                        "Table '{}' created from '{}' ({} rows, {} columns)",
                        summary.table, file_name, summary.rows, summary.columns
                    );
                    report.loaded.push(ImportedFile {
                        file: file_name,
                        summary,
                    });
                }
                Err(e) => {
                    error!("Failed to import '{}': {}", file_name, e);
                    report.failed.push(FailedFile {
                        file: file_name,
                        error: e,
                    });
                }
            }
        }

        Ok(report)
    }

    async fn import_file<D: Database>(
        &self,
        db: &mut D,
        path: &Path,
        file_name: &str,
        claimed: &mut HashMap<String, String>,
    ) -> ImportResult<LoadSummary> {
        let table = table_name_for(file_name)
            .ok_or_else(|| ImportError::InvalidTableName(file_name.to_string()))?;

        if let Some(previous) = claimed.get(&table) {
            return Err(ImportError::TableNameCollision {
                table,
                file: file_name.to_string(),
                previous: previous.clone(),
            });
        }

        info!("Importing '{}' as table '{}'...", file_name, table);
        let summary = db.load_table(path, &table, self.delimiter).await?;
        // Only a loaded file owns its table; a failed one leaves the name free
        claimed.insert(table, file_name.to_string());
        Ok(summary)
    }

    /// Case-insensitive `.<extension>` suffix check
    fn matches_extension(&self, file_name: &str) -> bool {
        file_name
            .to_lowercase()
            .ends_with(&format!(".{}", self.extension))
    }
}

/// Table name for a file: the part before the first `.`, lowercased.
///
/// `None` when that part is empty (e.g. `.csv`).
pub fn table_name_for(file_name: &str) -> Option<String> {
    let stem = file_name.split('.').next().unwrap_or_default();
    (!stem.is_empty()).then(|| stem.to_lowercase())
}
