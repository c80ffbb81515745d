pub mod copier;
pub mod paths;

pub use copier::BatchCopier;
pub use paths::{
    count_files_in_subfolders, count_files_in_subfolders_selective, list_image_paths,
    list_subfolder_image_paths, list_subfolder_image_paths_selective, parse_path, FolderCount,
    FolderCounts, DEFAULT_IMAGE_FORMATS, INFERENCE_IMAGE_FORMATS,
};
