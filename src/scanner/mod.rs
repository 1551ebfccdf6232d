pub(crate) mod exif;

use crate::error::{Result, ShelfAiError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

fn image_info(path: &Path) -> Option<ImageInfo> {
    let ext = path.extension()?.to_string_lossy();
    if !is_image_extension(&ext) {
        return None;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Some(ImageInfo {
        path: path.to_path_buf(),
        file_name,
    })
}

/// フォルダ直下の画像を列挙（ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(ShelfAiError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| image_info(e.path()))
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// ファイルとフォルダの混在指定を画像リストに展開
///
/// 指定順を保ち、フォルダの中身はファイル名順に並べる。
/// 明示指定されたファイルは拡張子を問わず含める（デコード可否は取り込み時に判定）。
pub fn scan_paths(paths: &[PathBuf]) -> Result<Vec<ImageInfo>> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            images.extend(scan_folder(path)?);
        } else if path.is_file() {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            images.push(ImageInfo {
                path: path.clone(),
                file_name,
            });
        } else {
            return Err(ShelfAiError::FileNotFound(path.display().to_string()));
        }
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("png"));
        assert!(is_image_extension("WebP"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("pdf"));
        assert!(!is_image_extension("gif"));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(ShelfAiError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_with_images() {
        let temp_dir = tempfile::tempdir().unwrap();

        File::create(temp_dir.path().join("c.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("a.PNG")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("b.webp")).unwrap().write_all(b"dummy").unwrap();
        File::create(temp_dir.path().join("readme.txt")).unwrap().write_all(b"text").unwrap();
        fs::create_dir(temp_dir.path().join("sub.jpg")).unwrap();

        let result = scan_folder(temp_dir.path()).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.PNG", "b.webp", "c.jpg"]);
    }

    #[test]
    fn test_scan_paths_keeps_argument_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let folder = temp_dir.path().join("shelf");
        fs::create_dir(&folder).unwrap();
        File::create(folder.join("2.jpg")).unwrap();
        File::create(folder.join("1.jpg")).unwrap();
        let single = temp_dir.path().join("z.jpg");
        File::create(&single).unwrap();

        let result = scan_paths(&[single.clone(), folder]).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["z.jpg", "1.jpg", "2.jpg"]);
    }

    #[test]
    fn test_scan_paths_missing_file() {
        let result = scan_paths(&[PathBuf::from("/nonexistent/photo.jpg")]);
        assert!(matches!(result, Err(ShelfAiError::FileNotFound(_))));
    }
}
