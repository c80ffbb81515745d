use crate::config::TargetSize;
use crate::utils::error::PrepError;
use crate::Result;
use ndarray::{s, Array2, Array3, Axis};

/// 高斯核截断半径（以 sigma 为单位）
const GAUSSIAN_TRUNCATE: f32 = 4.0;

/// 图像变换工具集
pub struct ImageTransforms;

impl ImageTransforms {
    /// 双线性插值缩放到精确尺寸（不保持宽高比），保留全部通道
    ///
    /// 采样点按像素中心对齐：`src = (dst + 0.5) * scale - 0.5`，越界时钳制到边缘像素。
    /// 缩小时先做高斯抗锯齿，`sigma = (scale - 1) / 2`，逐轴独立计算。
    pub fn resize(image: &Array3<f32>, size: TargetSize) -> Result<Array3<f32>> {
        let (orig_h, orig_w, channels) = image.dim();
        if orig_h == 0 || orig_w == 0 || channels == 0 {
            return Err(PrepError::InvalidInput(format!(
                "Cannot resize empty image: {}x{}x{}",
                orig_h, orig_w, channels
            )));
        }

        let (target_h, target_w) = (size.height, size.width);
        let scale_h = orig_h as f32 / target_h as f32;
        let scale_w = orig_w as f32 / target_w as f32;

        let smoothed;
        let image = if scale_h > 1.0 || scale_w > 1.0 {
            smoothed = Self::anti_alias(image, scale_h, scale_w);
            &smoothed
        } else {
            image
        };

        let mut resized = Array3::<f32>::zeros((target_h, target_w, channels));

        for h in 0..target_h {
            let (h1, h2, dh) = Self::source_coords(h, scale_h, orig_h);
            for w in 0..target_w {
                let (w1, w2, dw) = Self::source_coords(w, scale_w, orig_w);

                for c in 0..channels {
                    let v11 = image[[h1, w1, c]];
                    let v12 = image[[h1, w2, c]];
                    let v21 = image[[h2, w1, c]];
                    let v22 = image[[h2, w2, c]];

                    resized[[h, w, c]] = v11 * (1.0 - dh) * (1.0 - dw)
                        + v12 * (1.0 - dh) * dw
                        + v21 * dh * (1.0 - dw)
                        + v22 * dh * dw;
                }
            }
        }

        Ok(resized)
    }

    /// 缩小前的高斯平滑，只在缩小的轴上进行
    pub fn anti_alias(image: &Array3<f32>, scale_h: f32, scale_w: f32) -> Array3<f32> {
        let sigma_h = ((scale_h - 1.0) / 2.0).max(0.0);
        let sigma_w = ((scale_w - 1.0) / 2.0).max(0.0);
        let blurred = Self::gaussian_blur_axis(image, Axis(0), sigma_h);
        Self::gaussian_blur_axis(&blurred, Axis(1), sigma_w)
    }

    /// 一维高斯卷积，边界镜像（不重复边缘像素）
    fn gaussian_blur_axis(image: &Array3<f32>, axis: Axis, sigma: f32) -> Array3<f32> {
        if sigma <= 0.0 {
            return image.clone();
        }

        let kernel = Self::gaussian_kernel(sigma);
        let radius = (kernel.len() / 2) as isize;
        let len = image.len_of(axis);
        let mut blurred = Array3::<f32>::zeros(image.dim());

        for (mut dst, src) in blurred
            .lanes_mut(axis)
            .into_iter()
            .zip(image.lanes(axis))
        {
            for i in 0..len {
                let mut sum = 0.0;
                for (k, weight) in kernel.iter().enumerate() {
                    let j = Self::mirror_index(i as isize + k as isize - radius, len);
                    sum += weight * src[j];
                }
                dst[i] = sum;
            }
        }

        blurred
    }

    /// 归一化的高斯核，长度 `2 * radius + 1`
    fn gaussian_kernel(sigma: f32) -> Vec<f32> {
        let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
        let weights: Vec<f32> = (-radius..=radius)
            .map(|x| (-0.5 * (x as f32 / sigma).powi(2)).exp())
            .collect();
        let total: f32 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    }

    /// 越界索引按 `d c b | a b c d | c b a` 镜像回到 `[0, len)`
    fn mirror_index(index: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let period = 2 * (len as isize - 1);
        let folded = index.rem_euclid(period);
        if folded < len as isize {
            folded as usize
        } else {
            (period - folded) as usize
        }
    }

    /// 目标坐标映射回源图像：返回相邻两个采样索引和插值权重
    fn source_coords(dst: usize, scale: f32, len: usize) -> (usize, usize, f32) {
        let max = (len - 1) as f32;
        let src = ((dst as f32 + 0.5) * scale - 0.5).clamp(0.0, max);
        let lo = src.floor() as usize;
        let hi = (lo + 1).min(len - 1);
        (lo, hi, src - lo as f32)
    }

    /// 只保留第一个通道，丢弃其余通道（不是亮度加权转换）
    pub fn first_channel(image: &Array3<f32>) -> Array2<f32> {
        image.slice(s![.., .., 0]).to_owned()
    }
}
