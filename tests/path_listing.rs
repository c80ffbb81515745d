use std::fs;
use std::path::PathBuf;

use inception_prep::batch::{
    count_files_in_subfolders, count_files_in_subfolders_selective, list_image_paths,
    list_subfolder_image_paths, list_subfolder_image_paths_selective, DEFAULT_IMAGE_FORMATS,
};

fn touch(path: &std::path::Path) {
    fs::write(path, b"").unwrap();
}

#[test]
fn lists_only_allowed_extensions() {
    let temp = tempfile::tempdir().unwrap();
    let folder = temp.path().join("test");
    fs::create_dir_all(&folder).unwrap();
    for name in ["a.png", "b.jpg", "c.txt"] {
        touch(&folder.join(name));
    }

    let paths = list_image_paths(&folder, &["png", "jpg"]).unwrap();
    assert_eq!(paths, vec![folder.join("a.png"), folder.join("b.jpg")]);
}

#[test]
fn listing_has_no_duplicates_and_is_ordered() {
    let temp = tempfile::tempdir().unwrap();
    for name in ["z.dcm", "m.jpeg", "a.png", "notes.md", "b.PNG", "noext"] {
        touch(&temp.path().join(name));
    }

    let paths = list_image_paths(temp.path(), DEFAULT_IMAGE_FORMATS).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.png", "m.jpeg", "z.dcm"]);
}

#[test]
fn directory_with_image_extension_is_listed() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir_all(temp.path().join("photo.png")).unwrap();

    let paths = list_image_paths(temp.path(), &["png"]).unwrap();
    assert_eq!(paths, vec![temp.path().join("photo.png")]);
}

#[test]
fn missing_folder_propagates_error() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("nope");
    assert!(list_image_paths(&missing, &["png"]).is_err());
}

fn labelled_tree() -> (tempfile::TempDir, PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("project");
    for (label, files) in [
        ("cats", vec!["1.png", "2.jpg", "readme.txt"]),
        ("dogs", vec!["3.png"]),
        ("empty", vec![]),
    ] {
        let dir = root.join(label);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            touch(&dir.join(file));
        }
    }
    // 根目录下的普通文件不参与子目录遍历
    touch(&root.join("stray.png"));
    (temp, root)
}

#[test]
fn subfolder_listing_flattens_in_folder_order() {
    let (_temp, root) = labelled_tree();

    let paths = list_subfolder_image_paths(&root, DEFAULT_IMAGE_FORMATS).unwrap();
    assert_eq!(
        paths,
        vec![
            root.join("cats").join("1.png"),
            root.join("cats").join("2.jpg"),
            root.join("dogs").join("3.png"),
        ]
    );
}

#[test]
fn selective_listing_only_visits_selected_folders() {
    let (_temp, root) = labelled_tree();

    let paths =
        list_subfolder_image_paths_selective(&root, &["dogs", "missing"], DEFAULT_IMAGE_FORMATS)
            .unwrap();
    assert_eq!(paths, vec![root.join("dogs").join("3.png")]);
}

#[test]
fn counts_per_subfolder() {
    let (_temp, root) = labelled_tree();

    let counts = count_files_in_subfolders(&root, DEFAULT_IMAGE_FORMATS).unwrap();
    assert_eq!(counts.total, 3);
    let per_folder: Vec<(&str, usize)> = counts
        .folders
        .iter()
        .map(|c| (c.folder.as_str(), c.count))
        .collect();
    assert_eq!(per_folder, vec![("cats", 2), ("dogs", 1), ("empty", 0)]);
    assert_eq!(counts.selected_total, 3);

    let selective = count_files_in_subfolders_selective(&root, &["cats"], DEFAULT_IMAGE_FORMATS).unwrap();
    assert_eq!(selective.total, 3);
    assert_eq!(selective.folders.len(), 1);
    assert_eq!(selective.selected_total, 2);
}
