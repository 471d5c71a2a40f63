use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ReadError;

/// True when the file extension is one of `extensions` (compared case-insensitively).
pub fn is_supported_raster(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Lists the raster files directly inside `dir`, sorted by file name.
pub fn list_raster_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ReadError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ReadError::Listing {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && is_supported_raster(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn extensions() -> Vec<String> {
        vec!["tif".to_string(), "img".to_string()]
    }

    #[test]
    fn test_is_supported_raster() {
        assert!(is_supported_raster(Path::new("a/model.tif"), &extensions()));
        assert!(is_supported_raster(Path::new("model.IMG"), &extensions()));
        assert!(!is_supported_raster(Path::new("model.tif.aux.xml"), &extensions()));
        assert!(!is_supported_raster(Path::new("model"), &extensions()));
    }

    #[test]
    fn test_list_raster_files() {
        let dir = tempdir().unwrap();
        for name in ["b.img", "a.tif", "notes.txt", "c.tif.ovr"] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("nested.tif")).unwrap();
        File::create(dir.path().join("nested.tif").join("d.tif")).unwrap();

        let files = list_raster_files(dir.path(), &extensions()).unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("a.tif"), dir.path().join("b.img")]
        );
    }

    #[test]
    fn test_list_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let result = list_raster_files(&dir.path().join("Huron"), &extensions());

        assert!(matches!(result, Err(ReadError::Listing { .. })));
    }
}
