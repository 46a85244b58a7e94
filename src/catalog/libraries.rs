//! Library catalog repository

use std::path::PathBuf;

use serde::Deserialize;

use super::{CatalogError, read_rows};

pub const LIBRARIES_CSV: &str = "libraries.csv";

/// Library row from `libraries.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

pub struct LibraryRepository {
    path: PathBuf,
}

impl LibraryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get all libraries in file order
    pub fn list(&self) -> Result<Vec<LibraryRecord>, CatalogError> {
        read_rows(&self.path)
    }

    /// Names of all libraries that have one
    pub fn list_names(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|lib| !lib.name.is_empty())
            .map(|lib| lib.name)
            .collect())
    }

    /// Get a library ID by its exact name (first match wins)
    pub fn id_by_name(&self, name: &str) -> Result<Option<String>, CatalogError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|lib| lib.name == name)
            .map(|lib| lib.id)
            .filter(|id| !id.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn repo_with(contents: &str) -> (tempfile::TempDir, LibraryRepository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LIBRARIES_CSV);
        fs::write(&path, contents).unwrap();
        (dir, LibraryRepository::new(path))
    }

    #[test]
    fn test_list_names_skips_unnamed() {
        let (_dir, repo) = repo_with("id,name,mediaType\nlib1,Audiobooki,book\nlib2,,book\nlib3,Podcasty,podcast\n");
        assert_eq!(repo.list_names().unwrap(), vec!["Audiobooki", "Podcasty"]);
    }

    #[test]
    fn test_id_by_name() {
        let (_dir, repo) = repo_with("id,name\nlib1,Audiobooki\nlib2,Audiobooki\n");
        assert_eq!(repo.id_by_name("Audiobooki").unwrap().as_deref(), Some("lib1"));
        assert_eq!(repo.id_by_name("audiobooki").unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LibraryRepository::new(dir.path().join(LIBRARIES_CSV));
        assert!(repo.list_names().unwrap().is_empty());
        assert_eq!(repo.id_by_name("x").unwrap(), None);
    }

    #[test]
    fn test_quoted_names() {
        let (_dir, repo) = repo_with("id,name\nlib1,\"Fantastyka, SF\"\n");
        assert_eq!(repo.list_names().unwrap(), vec!["Fantastyka, SF"]);
    }
}
