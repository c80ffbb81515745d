use crate::config::TargetSize;
use crate::image::{DicomImage, GrayWriter, ImageLoader, ImageNormalizer};
use crate::utils::error::PrepError;
use crate::Result;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// 重排输出文件名前缀
pub const REFORMAT_PREFIX: &str = "reform_incept_v3_";

/// 原样复制输出文件名前缀
pub const COPY_PREFIX: &str = "copied ";

/// 批量图像重排 / 复制
pub struct BatchCopier;

impl BatchCopier {
    fn file_name(path: &Path) -> Result<String> {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PrepError::InvalidInput(format!("Path has no file name: {}", path.display())))
    }

    fn is_dicom(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "dcm")
    }

    /// 普通图像：缩放、单通道、归一化后以原格式写入输出目录
    pub fn reformat_and_copy(path: &Path, size: TargetSize, output_dir: &Path) -> Result<PathBuf> {
        let image = ImageLoader::load_array(path)?;
        let file_name = format!("{}{}", REFORMAT_PREFIX, Self::file_name(path)?);

        let normalized = ImageNormalizer::normalize_gray(&image, size)?;

        GrayWriter::ensure_dir(output_dir)?;
        let output_path = output_dir.join(file_name);
        GrayWriter::save(&normalized, &output_path)?;

        tracing::debug!("{} -> {}", path.display(), output_path.display());
        Ok(output_path)
    }

    /// DICOM：以 PatientName 命名，总是写出 PNG
    pub fn reformat_and_copy_dicom(path: &Path, size: TargetSize, output_dir: &Path) -> Result<PathBuf> {
        let DicomImage {
            patient_name,
            pixels,
        } = ImageLoader::from_dicom(path)?;
        let file_name = Self::dicom_output_name(&patient_name)?;

        let normalized = ImageNormalizer::normalize_gray(&pixels, size)?;

        GrayWriter::ensure_dir(output_dir)?;
        let output_path = output_dir.join(file_name);
        GrayWriter::save_with_format(&normalized, &output_path, ImageFormat::Png)?;

        tracing::debug!("{} -> {}", path.display(), output_path.display());
        Ok(output_path)
    }

    /// PatientName 中的路径分隔符替换为 '_'，追加 `.png`
    fn dicom_output_name(patient_name: &str) -> Result<String> {
        if patient_name.is_empty() {
            return Err(PrepError::InvalidInput("DICOM file has an empty PatientName".to_string()));
        }
        let safe: String = patient_name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        Ok(format!("{}.png", safe))
    }

    /// 不做任何变换，仅重新编码到输出目录
    pub fn copy_image(path: &Path, output_dir: &Path) -> Result<PathBuf> {
        if ImageLoader::detect_format(path).is_none() {
            return Err(PrepError::UnsupportedFormat(format!(
                "Cannot copy {}: unknown image format",
                path.display()
            )));
        }

        let image = ImageLoader::from_path(path)?;
        let file_name = format!("{}{}", COPY_PREFIX, Self::file_name(path)?);

        GrayWriter::ensure_dir(output_dir)?;
        let output_path = output_dir.join(file_name);
        image.save(&output_path)?;

        tracing::debug!("{} -> {}", path.display(), output_path.display());
        Ok(output_path)
    }

    /// 顺序处理全部路径，`.dcm` 走 DICOM 流程；遇到第一个错误即中止
    pub fn reformat_all(paths: &[PathBuf], size: TargetSize, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let start_time = Instant::now();
        tracing::info!(
            "Reformatting {} images to {}x{} into {}",
            paths.len(),
            size.width,
            size.height,
            output_dir.display()
        );

        let mut written = Vec::with_capacity(paths.len());
        for path in paths {
            let output = if Self::is_dicom(path) {
                Self::reformat_and_copy_dicom(path, size, output_dir)?
            } else {
                Self::reformat_and_copy(path, size, output_dir)?
            };
            written.push(output);
        }

        tracing::info!(
            "Reformatted {} images in {:.2}s",
            written.len(),
            start_time.elapsed().as_secs_f32()
        );
        Ok(written)
    }

    /// 顺序复制全部路径
    pub fn copy_all(paths: &[PathBuf], output_dir: &Path) -> Result<Vec<PathBuf>> {
        tracing::info!("Copying {} images into {}", paths.len(), output_dir.display());

        paths
            .iter()
            .map(|path| Self::copy_image(path, output_dir))
            .collect()
    }
}
