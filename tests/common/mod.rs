//! Shared fixtures: a CSV catalog export and an ID-keyed media root

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use abs_exporter::AppState;
use abs_exporter::config::Config;
use tempfile::TempDir;

pub const LIBRARIES: &str = "\
id,name,mediaType
lib1,Audiobooki,book
lib2,Podcasty,podcast
lib3,Puste,book
";

pub const ITEMS: &str = "\
id,libraryId,mediaType,isMissing,relPath,title,authorNamesFirstLast
it1,lib1,book,0,Jan Kowalski - Wielka Podróż (2019),Wielka Podróż,Jan Kowalski
it2,lib1,book,false,Anna Nowak - Inna Książka czyta Piotr Fronczewski [PL],Coś Innego,Ktoś Inny
it3,lib1,book,0,bez separatora,Tytuł,Autor
it4,lib1,book,1,Zaginiony - Brak,Brak,Zaginiony
it5,lib2,podcast,0,Podcast - Odcinek,Odcinek,Podcast
it6,lib1,book,0,,Bez Ścieżki,Nikt
";

pub struct Fixture {
    _dir: TempDir,
    pub csv_dir: PathBuf,
    pub media_root: PathBuf,
    pub export_root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv_dir = dir.path().join("csv_db");
        let media_root = dir.path().join("media");
        let export_root = dir.path().join("export");
        fs::create_dir_all(&csv_dir).unwrap();
        fs::create_dir_all(&media_root).unwrap();

        fs::write(csv_dir.join("libraries.csv"), LIBRARIES).unwrap();
        fs::write(csv_dir.join("library_items.csv"), ITEMS).unwrap();

        // it1 has both files, it2 only a cover, it3 nothing
        write_file(&media_root.join("it1").join("metadata.json"), r#"{"title":"Wielka Podróż"}"#.as_bytes());
        write_file(&media_root.join("it1").join("cover.jpg"), b"jpeg-1");
        write_file(&media_root.join("it2").join("cover.jpg"), b"jpeg-2");

        Self {
            _dir: dir,
            csv_dir,
            media_root,
            export_root,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            host: None,
            port: 0,
            csv_db_path: self.csv_dir.clone(),
            media_root: self.media_root.clone(),
            default_export_path: self.export_root.display().to_string(),
            match_check: true,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(Arc::new(self.config()))
    }
}

pub fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
