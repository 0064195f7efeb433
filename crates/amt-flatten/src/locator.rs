//! Release file discovery.
//!
//! Walks an unzipped release bundle and locates the snapshot files the
//! pipeline needs by filename convention. Directory layout varies between
//! bundle vintages, so the whole tree is searched rather than assuming a
//! fixed `Snapshot/Terminology` structure.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{FlattenError, FlattenResult};

/// The located release files for one bundle.
#[derive(Debug, Clone, Default)]
pub struct ReleaseFiles {
    /// Concept snapshot file.
    pub concept_file: Option<PathBuf>,
    /// Relationship snapshot file.
    pub relationship_file: Option<PathBuf>,
    /// Description snapshot file.
    pub description_file: Option<PathBuf>,
    /// Language reference set snapshot file.
    pub language_refset_file: Option<PathBuf>,
    /// ARTG id simple map reference set snapshot file.
    pub artg_refset_file: Option<PathBuf>,
    /// Product type marker (simple) reference set snapshot file.
    pub product_refset_file: Option<PathBuf>,
    /// Historical association reference set snapshot files. Optional;
    /// without them the replacement output is simply empty.
    pub historical_association_files: Vec<PathBuf>,
    /// Release date (YYYYMMDD) extracted from the concept filename.
    pub release_date: Option<String>,
}

impl ReleaseFiles {
    /// Creates an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the mandatory files that were not found.
    pub fn missing_files(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.concept_file.is_none() {
            missing.push("concept snapshot");
        }
        if self.relationship_file.is_none() {
            missing.push("relationship snapshot");
        }
        if self.description_file.is_none() {
            missing.push("description snapshot");
        }
        if self.language_refset_file.is_none() {
            missing.push("language refset snapshot");
        }
        if self.artg_refset_file.is_none() {
            missing.push("ARTG id refset snapshot");
        }
        if self.product_refset_file.is_none() {
            missing.push("product type refset snapshot");
        }
        missing
    }

    /// Checks that every mandatory file was found.
    ///
    /// # Errors
    /// Returns [`FlattenError::RequiredFileMissing`] naming every absent
    /// file kind.
    pub fn ensure_required(&self, directory: &Path) -> FlattenResult<()> {
        let missing = self.missing_files();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FlattenError::RequiredFileMissing {
                file_type: missing.join(", "),
                directory: directory.display().to_string(),
            })
        }
    }
}

/// Discovers release files beneath `path`.
///
/// # Errors
/// Returns an error if the directory does not exist, cannot be read, or a
/// mandatory file is absent.
pub fn discover_release_files<P: AsRef<Path>>(path: P) -> FlattenResult<ReleaseFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(FlattenError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let mut files = ReleaseFiles::new();
    visit_dir(path, &mut files)?;
    files.ensure_required(path)?;
    files.historical_association_files.sort();

    Ok(files)
}

fn visit_dir(dir: &Path, files: &mut ReleaseFiles) -> FlattenResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();

        if entry_path.is_dir() {
            visit_dir(&entry_path, files)?;
            continue;
        }

        let filename = entry.file_name();
        let filename_str = filename.to_string_lossy();

        if !filename_str.ends_with(".txt") {
            continue;
        }

        if filename_str.starts_with("sct2_Concept_Snapshot") {
            if let Some(date) = extract_release_date(&filename_str) {
                files.release_date = Some(date);
            }
            files.concept_file = Some(entry_path);
        } else if filename_str.starts_with("sct2_Relationship_Snapshot") {
            files.relationship_file = Some(entry_path);
        } else if filename_str.starts_with("sct2_Description_Snapshot") {
            files.description_file = Some(entry_path);
        } else if filename_str.starts_with("der2_cRefset_Language") {
            files.language_refset_file = Some(entry_path);
        } else if filename_str.starts_with("der2_iRefset_ARTGId")
            || filename_str.starts_with("der2_iRefset_SimpleMap")
        {
            files.artg_refset_file = Some(entry_path);
        } else if filename_str.starts_with("der2_Refset_MedicinalProduct")
            || filename_str.starts_with("der2_Refset_Simple")
        {
            files.product_refset_file = Some(entry_path);
        } else if filename_str.starts_with("der2_cRefset_")
            && filename_str.contains("Association")
        {
            files.historical_association_files.push(entry_path);
        }
    }

    Ok(())
}

/// Extracts the release date (YYYYMMDD) from an RF2 filename.
///
/// Filenames end in `_<namespace>_<date>.txt`; the date is the final
/// underscore-delimited segment.
fn extract_release_date(filename: &str) -> Option<String> {
    let stem = filename.strip_suffix(".txt")?;
    let candidate = stem.rsplit('_').next()?;

    if candidate.len() == 8 && candidate.chars().all(|c| c.is_ascii_digit()) {
        Some(candidate.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn touch(dir: &Path, name: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(b"").unwrap();
    }

    fn seed_required(dir: &Path) {
        touch(dir, "sct2_Concept_Snapshot_AU1000036_20180430.txt");
        touch(dir, "sct2_Relationship_Snapshot_AU1000036_20180430.txt");
        touch(dir, "sct2_Description_Snapshot-en-AU_AU1000036_20180430.txt");
        touch(dir, "der2_cRefset_LanguageSnapshot-en-AU_AU1000036_20180430.txt");
        touch(dir, "der2_iRefset_ARTGIdSnapshot_AU1000036_20180430.txt");
        touch(dir, "der2_Refset_SimpleSnapshot_AU1000036_20180430.txt");
    }

    #[test]
    fn test_discovers_files_in_nested_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let terminology = tmp.path().join("Snapshot").join("Terminology");
        fs::create_dir_all(&terminology).unwrap();
        seed_required(&terminology);
        touch(
            &terminology,
            "der2_cRefset_AssociationReferenceSnapshot_AU1000036_20180430.txt",
        );

        let files = discover_release_files(tmp.path()).unwrap();
        assert!(files.concept_file.is_some());
        assert_eq!(files.release_date.as_deref(), Some("20180430"));
        assert_eq!(files.historical_association_files.len(), 1);
    }

    #[test]
    fn test_missing_mandatory_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        seed_required(tmp.path());
        fs::remove_file(
            tmp.path()
                .join("der2_iRefset_ARTGIdSnapshot_AU1000036_20180430.txt"),
        )
        .unwrap();

        let err = discover_release_files(tmp.path()).unwrap_err();
        match err {
            FlattenError::RequiredFileMissing { file_type, .. } => {
                assert!(file_type.contains("ARTG"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_directory_is_error() {
        let err = discover_release_files("/no/such/dir").unwrap_err();
        assert!(matches!(err, FlattenError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_extract_release_date() {
        assert_eq!(
            extract_release_date("sct2_Concept_Snapshot_AU1000036_20180430.txt"),
            Some("20180430".to_string())
        );
        assert_eq!(extract_release_date("sct2_Concept_Snapshot.txt"), None);
    }

    #[test]
    fn test_historical_files_are_optional() {
        let tmp = tempfile::tempdir().unwrap();
        seed_required(tmp.path());

        let files = discover_release_files(tmp.path()).unwrap();
        assert!(files.historical_association_files.is_empty());
    }
}
