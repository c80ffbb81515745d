use crate::batch::paths::{list_image_paths, INFERENCE_IMAGE_FORMATS};
use crate::config::TargetSize;
use crate::image::{ImageLoader, ImageNormalizer};
use crate::inference::types::{ImagePrediction, Prediction};
use crate::models::{LabelTable, ScoreModel};
use crate::utils::error::PrepError;
use crate::Result;
use ndarray::{Array4, ArrayView1, Axis};
use std::cmp::Ordering;
use std::path::Path;
use std::time::Instant;

/// 每张图像输出的类别数
pub const TOP_K: usize = 5;

/// 分数最高的 `k` 个 `(索引, 分数)`，分数降序，同分时索引小的在前
pub fn top_k(scores: ArrayView1<f32>, k: usize) -> Result<Vec<(usize, f32)>> {
    if scores.len() < k {
        return Err(PrepError::Inference(format!(
            "Model returned {} classes, need at least {}",
            scores.len(),
            k
        )));
    }

    let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
    indexed.truncate(k);
    Ok(indexed)
}

/// 推理驱动：持有模型、标签表和输入尺寸
pub struct InferenceDriver<M: ScoreModel> {
    model: M,
    labels: LabelTable,
    size: TargetSize,
}

impl<M: ScoreModel> InferenceDriver<M> {
    pub fn new(model: M, labels: LabelTable, size: TargetSize) -> Self {
        Self {
            model,
            labels,
            size,
        }
    }

    /// 归还模型（结束会话由调用方决定）
    pub fn into_model(self) -> M {
        self.model
    }

    /// 对目录中所有图像做一次批量推理
    pub fn classify_folder(&mut self, folder: &Path) -> Result<Vec<ImagePrediction>> {
        let paths = list_image_paths(folder, INFERENCE_IMAGE_FORMATS)?;
        if paths.is_empty() {
            tracing::warn!("No images found in {}", folder.display());
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        let batch = self.load_batch(&paths)?;
        tracing::info!(
            "Loaded {} images in {:.2}s",
            paths.len(),
            start_time.elapsed().as_secs_f32()
        );

        let inference_start = Instant::now();
        let scores = self.model.predict(batch)?;
        tracing::info!(
            "Inference finished in {:.2}s",
            inference_start.elapsed().as_secs_f32()
        );

        if scores.nrows() != paths.len() {
            return Err(PrepError::Inference(format!(
                "Model returned {} rows for {} images",
                scores.nrows(),
                paths.len()
            )));
        }

        paths
            .iter()
            .zip(scores.axis_iter(Axis(0)))
            .map(|(path, row)| -> Result<ImagePrediction> {
                Ok(ImagePrediction {
                    path: path.display().to_string(),
                    top5: self.top_predictions(row)?,
                })
            })
            .collect()
    }

    /// 全部图像一次性载入内存，堆叠成 `[N, H, W, 3]`
    fn load_batch(&self, paths: &[std::path::PathBuf]) -> Result<Array4<f32>> {
        let (height, width) = (self.size.height, self.size.width);
        let mut batch = Array4::<f32>::zeros((paths.len(), height, width, 3));

        for (i, path) in paths.iter().enumerate() {
            let image = ImageLoader::load_rgb_array(path)?;
            let normalized = ImageNormalizer::normalize_rgb(&image, self.size)?;
            batch.index_axis_mut(Axis(0), i).assign(&normalized);
        }

        Ok(batch)
    }

    fn top_predictions(&self, row: ArrayView1<f32>) -> Result<Vec<Prediction>> {
        top_k(row, TOP_K)?
            .into_iter()
            .map(|(class_index, score)| -> Result<Prediction> {
                Ok(Prediction {
                    label: self.labels.label_for_output(class_index)?.to_string(),
                    class_index,
                    score,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn top_k_sorts_descending() {
        let scores = array![0.1f32, 0.7, 0.05, 0.3, 0.9, 0.2, 0.0];
        let top = top_k(scores.view(), 5).unwrap();
        let indices: Vec<usize> = top.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![4, 1, 3, 5, 0]);
    }

    #[test]
    fn ties_keep_lower_index_first() {
        let scores = array![0.5f32, 0.5, 0.5, 0.5, 0.5, 0.5];
        let top = top_k(scores.view(), 5).unwrap();
        let indices: Vec<usize> = top.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn too_few_classes_is_an_error() {
        let scores = array![0.5f32, 0.4];
        assert!(matches!(top_k(scores.view(), 5), Err(PrepError::Inference(_))));
    }
}
