use crate::Result;
use image::{GrayImage, ImageFormat, Luma};
use ndarray::Array2;
use std::fs;
use std::path::Path;

/// 灰度图像写出
pub struct GrayWriter;

impl GrayWriter {
    /// 灰度色图映射：数组最小值 -> 0，最大值 -> 255（自动缩放）
    pub fn to_gray_image(values: &Array2<f32>) -> GrayImage {
        let (height, width) = values.dim();
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;

        GrayImage::from_fn(width as u32, height as u32, |x, y| {
            let value = values[[y as usize, x as usize]];
            let level = if range > 0.0 {
                ((value - min) / range * 255.0).round().clamp(0.0, 255.0) as u8
            } else {
                0
            };
            Luma([level])
        })
    }

    /// 目标目录不存在时递归创建（每次写入前都检查）
    pub fn ensure_dir(dir: &Path) -> Result<()> {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            tracing::info!("Creating output directory: {}", dir.display());
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// 按扩展名推断格式写出
    pub fn save(values: &Array2<f32>, path: &Path) -> Result<()> {
        Self::to_gray_image(values).save(path)?;
        Ok(())
    }

    /// 固定格式写出，忽略扩展名
    pub fn save_with_format(values: &Array2<f32>, path: &Path, format: ImageFormat) -> Result<()> {
        Self::to_gray_image(values).save_with_format(path, format)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_map_spans_full_range() {
        let values = Array2::from_shape_vec((1, 3), vec![-1.0, 0.0, 1.0]).unwrap();
        let image = GrayWriter::to_gray_image(&values);
        assert_eq!(image.dimensions(), (3, 1));
        assert_eq!(image.get_pixel(0, 0).0, [0]);
        assert_eq!(image.get_pixel(1, 0).0, [128]);
        assert_eq!(image.get_pixel(2, 0).0, [255]);
    }

    #[test]
    fn constant_array_writes_black() {
        let values = Array2::from_elem((2, 2), 0.7);
        let image = GrayWriter::to_gray_image(&values);
        assert!(image.pixels().all(|p| p.0 == [0]));
    }

    #[test]
    fn width_and_height_follow_columns_and_rows() {
        let values = Array2::from_shape_fn((2, 5), |(r, c)| (r * 5 + c) as f32);
        let image = GrayWriter::to_gray_image(&values);
        assert_eq!(image.dimensions(), (5, 2));
        assert_eq!(image.get_pixel(4, 1).0, [255]);
    }
}
