use crate::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 批量重排默认接受的格式（包括 DICOM）
pub const DEFAULT_IMAGE_FORMATS: &[&str] = &["png", "jpg", "jpeg", "dcm"];

/// 推理默认接受的格式
pub const INFERENCE_IMAGE_FORMATS: &[&str] = &["png", "jpg", "jpeg"];

/// 文件名最后一个 '.' 之后的部分；没有 '.' 时就是整个文件名
fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn has_allowed_extension<S: AsRef<str>>(name: &str, formats: &[S]) -> bool {
    let ext = extension_of(name);
    formats.iter().any(|f| f.as_ref() == ext)
}

/// 扩展名在白名单中时返回路径本身
pub fn parse_path<'a, S: AsRef<str>>(path: &'a Path, formats: &[S]) -> Option<&'a Path> {
    let name = path.file_name()?.to_string_lossy();
    has_allowed_extension(&name, formats).then_some(path)
}

/// 目录条目按文件名升序返回
fn sorted_entries(folder: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(folder)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// 列出目录下扩展名在白名单中的直接子项
///
/// 只检查扩展名，不区分文件和目录：名为 `photo.png` 的目录也会被列出。
pub fn list_image_paths<S: AsRef<str>>(folder: &Path, formats: &[S]) -> Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = sorted_entries(folder)?
        .into_iter()
        .map(|entry| folder.join(entry.file_name()))
        .filter(|path| parse_path(path, formats).is_some())
        .collect();

    tracing::debug!("{}: {} image paths", folder.display(), paths.len());
    Ok(paths)
}

/// 所有子目录（非目录条目忽略）
fn subfolders(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in sorted_entries(folder)? {
        if entry.file_type()?.is_dir() {
            folders.push(folder.join(entry.file_name()));
        }
    }
    Ok(folders)
}

/// 指定名称的子目录，按目录枚举顺序
fn selected_subfolders<S: AsRef<str>>(folder: &Path, selection: &[S]) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(folder)?
        .into_iter()
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            selection.iter().any(|s| s.as_ref() == name)
        })
        .map(|entry| folder.join(entry.file_name()))
        .collect())
}

fn flatten_listing<S: AsRef<str>>(folders: &[PathBuf], formats: &[S]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for folder in folders {
        paths.extend(list_image_paths(folder, formats)?);
    }
    Ok(paths)
}

/// 遍历所有子目录并合并结果
pub fn list_subfolder_image_paths<S: AsRef<str>>(folder: &Path, formats: &[S]) -> Result<Vec<PathBuf>> {
    flatten_listing(&subfolders(folder)?, formats)
}

/// 只遍历 `selection` 中列出的子目录
pub fn list_subfolder_image_paths_selective<S: AsRef<str>, T: AsRef<str>>(
    folder: &Path,
    selection: &[S],
    formats: &[T],
) -> Result<Vec<PathBuf>> {
    flatten_listing(&selected_subfolders(folder, selection)?, formats)
}

/// 单个子目录的图像数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderCount {
    pub folder: String,
    pub count: usize,
}

/// 子目录图像计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderCounts {
    /// 全部子目录中的图像总数
    pub total: usize,
    pub folders: Vec<FolderCount>,
    /// `folders` 中计数之和
    pub selected_total: usize,
}

fn count_folders<S: AsRef<str>>(root: &Path, folders: &[PathBuf], formats: &[S]) -> Result<FolderCounts> {
    let total = list_subfolder_image_paths(root, formats)?.len();
    tracing::info!("There are {} total files.", total);

    let mut counts = Vec::with_capacity(folders.len());
    for folder in folders {
        let count = list_image_paths(folder, formats)?.len();
        let name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!("There are {} files in {}", count, name);
        counts.push(FolderCount { folder: name, count });
    }

    let selected_total = counts.iter().map(|c| c.count).sum();
    Ok(FolderCounts {
        total,
        folders: counts,
        selected_total,
    })
}

/// 统计每个子目录中的图像数量
pub fn count_files_in_subfolders<S: AsRef<str>>(folder: &Path, formats: &[S]) -> Result<FolderCounts> {
    count_folders(folder, &subfolders(folder)?, formats)
}

/// 只统计 `selection` 中列出的子目录
pub fn count_files_in_subfolders_selective<S: AsRef<str>, T: AsRef<str>>(
    folder: &Path,
    selection: &[S],
    formats: &[T],
) -> Result<FolderCounts> {
    let counts = count_folders(folder, &selected_subfolders(folder, selection)?, formats)?;
    tracing::info!("There are {} files in the selected folders.", counts.selected_total);
    Ok(counts)
}
