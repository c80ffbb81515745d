use crate::config::TargetSize;
use crate::image::transforms::ImageTransforms;
use crate::utils::error::PrepError;
use crate::Result;
use ndarray::{Array, Array2, Array3, Dimension};

/// Inception v3 输入归一化
pub struct ImageNormalizer;

impl ImageNormalizer {
    /// 单通道流水线：缩放 -> 取第一通道 -> 线性映射到 [-1, 1]
    ///
    /// 先缩放再降通道，处理的像素更少。
    pub fn normalize_gray(image: &Array3<f32>, size: TargetSize) -> Result<Array2<f32>> {
        let resized = ImageTransforms::resize(image, size)?;
        let gray = ImageTransforms::first_channel(&resized);
        Self::rescale(gray)
    }

    /// 三通道流水线（推理用）：缩放 -> 线性映射到 [-1, 1]
    pub fn normalize_rgb(image: &Array3<f32>, size: TargetSize) -> Result<Array3<f32>> {
        let channels = image.dim().2;
        if channels != 3 {
            return Err(PrepError::InvalidInput(format!(
                "Inception format expects 3 channels, got {}",
                channels
            )));
        }

        let resized = ImageTransforms::resize(image, size)?;
        Self::rescale(resized)
    }

    /// `output = (2 * value - max) / max`
    pub fn rescale<D: Dimension>(mut values: Array<f32, D>) -> Result<Array<f32, D>> {
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        // 全零图像会除零
        if max <= 0.0 || !max.is_finite() {
            return Err(PrepError::DegenerateImage(format!(
                "maximum pixel value is {}, cannot rescale",
                max
            )));
        }

        values.mapv_inplace(|v| (2.0 * v - max) / max);
        Ok(values)
    }
}
