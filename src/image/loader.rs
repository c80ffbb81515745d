use crate::utils::error::PrepError;
use crate::Result;
use dicom_dictionary_std::tags;
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use image::{DynamicImage, GenericImageView, ImageFormat};
use ndarray::Array3;
use std::path::Path;

/// 从 DICOM 文件读取的像素数据和元信息
#[derive(Debug, Clone)]
pub struct DicomImage {
    /// PatientName 标签的值（已去除填充字符）
    pub patient_name: String,
    /// 第一帧像素 (HWC)，保持原始存储单位
    pub pixels: Array3<f32>,
}

pub struct ImageLoader;

impl ImageLoader {
    /// 从文件路径加载图像
    pub fn from_path(path: &Path) -> Result<DynamicImage> {
        let image = image::open(path).map_err(PrepError::ImageDecode)?;

        tracing::debug!(
            "Decoded {}: {}x{} {:?}",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );

        Ok(image)
    }

    /// 加载图像并保留原始通道数，像素值缩放到 [0, 1]
    pub fn load_array(path: &Path) -> Result<Array3<f32>> {
        let image = Self::from_path(path)?;
        Self::to_array3(&image)
    }

    /// 加载图像并强制转换为 RGB 三通道（推理用）
    pub fn load_rgb_array(path: &Path) -> Result<Array3<f32>> {
        let image = Self::from_path(path)?;
        Self::to_rgb_array3(&image)
    }

    /// 检测文件扩展名对应的格式
    pub fn detect_format(path: &Path) -> Option<ImageFormat> {
        ImageFormat::from_path(path).ok()
    }

    /// 转换DynamicImage为ndarray::Array3<f32> (HWC格式)，通道数与源图像一致
    pub fn to_array3(image: &DynamicImage) -> Result<Array3<f32>> {
        let (width, height) = image.dimensions();
        let channels = image.color().channel_count() as usize;

        let raw_data = match channels {
            1 => image.to_luma32f().into_raw(),
            2 => image.to_luma_alpha32f().into_raw(),
            3 => image.to_rgb32f().into_raw(),
            4 => image.to_rgba32f().into_raw(),
            other => {
                return Err(PrepError::UnsupportedFormat(format!(
                    "{} channel images are not supported",
                    other
                )))
            }
        };

        let array = Array3::from_shape_vec((height as usize, width as usize, channels), raw_data)?;
        Ok(array)
    }

    /// 转换为 RGB 三通道 Array3<f32> (HWC格式)
    pub fn to_rgb_array3(image: &DynamicImage) -> Result<Array3<f32>> {
        let rgb_image = image.to_rgb32f();
        let (width, height) = rgb_image.dimensions();
        let array = Array3::from_shape_vec((height as usize, width as usize, 3), rgb_image.into_raw())?;
        Ok(array)
    }

    /// 读取 DICOM 文件：PatientName 和第一帧像素
    pub fn from_dicom(path: &Path) -> Result<DicomImage> {
        let object = dicom_object::open_file(path)
            .map_err(|e| PrepError::Dicom(format!("{}: {}", path.display(), e)))?;

        let patient_name = object
            .element(tags::PATIENT_NAME)
            .map_err(|e| PrepError::Dicom(format!("{}: {}", path.display(), e)))?
            .to_str()
            .map_err(|e| PrepError::Dicom(format!("{}: {}", path.display(), e)))?
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string();

        let decoded = object
            .decode_pixel_data()
            .map_err(|e| PrepError::Dicom(format!("{}: {}", path.display(), e)))?;
        // 保持存储值，不做 RescaleSlope/RescaleIntercept 变换
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        let frames = decoded
            .to_ndarray_with_options::<f32>(&options)
            .map_err(|e| PrepError::Dicom(format!("{}: {}", path.display(), e)))?;

        // (frames, rows, columns, samples)，只取第一帧
        let (_, rows, columns, samples) = frames.dim();
        let first_frame: Vec<f32> = frames.iter().take(rows * columns * samples).copied().collect();
        let pixels = Array3::from_shape_vec((rows, columns, samples), first_frame)?;

        tracing::debug!(
            "Decoded DICOM {}: {}x{}x{} (patient '{}')",
            path.display(),
            rows,
            columns,
            samples,
            patient_name
        );

        Ok(DicomImage {
            patient_name,
            pixels,
        })
    }
}
