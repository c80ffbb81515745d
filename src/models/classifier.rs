use crate::config::OnnxConfig;
use crate::utils::error::PrepError;
use crate::Result;
use ndarray::{Array2, Array4, Ix2};
use ort::{inputs, session::Session, value::Tensor};
use std::path::Path;

/// 批量打分模型：输入 NHWC `[N, H, W, 3]`，输出 `[N, classes]`
pub trait ScoreModel {
    fn predict(&mut self, batch: Array4<f32>) -> Result<Array2<f32>>;
}

/// 模型期望的输入布局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputLayout {
    /// TensorFlow 导出的 Inception v3
    #[default]
    Nhwc,
    Nchw,
}

/// ONNX Runtime 分类模型
///
/// 会话与值的生命周期一致，drop 时释放。
pub struct OnnxClassifier {
    session: Session,
    input_name: String,  // 动态发现的输入名称
    output_name: String, // 动态发现的输出名称
    layout: InputLayout,
}

impl OnnxClassifier {
    pub fn new(model_path: &Path, onnx_config: &OnnxConfig, layout: InputLayout) -> Result<Self> {
        if !model_path.exists() {
            return Err(PrepError::ModelLoad(format!(
                "Classification model not found: {}",
                model_path.display()
            )));
        }

        tracing::info!("Loading classification model from: {}", model_path.display());

        let session = Session::builder()?
            .with_optimization_level(onnx_config.graph_optimization_level())?
            .with_intra_threads(onnx_config.intra_threads)?
            .commit_from_file(model_path)?;

        let input_name = match session.inputs.first() {
            Some(input) => input.name.clone(),
            None => {
                return Err(PrepError::ModelLoad(
                    "Classification model has no inputs".to_string(),
                ))
            }
        };

        let output_name = match session.outputs.first() {
            Some(output) => output.name.clone(),
            None => {
                return Err(PrepError::ModelLoad(
                    "Classification model has no outputs".to_string(),
                ))
            }
        };

        tracing::info!(
            "Classification model input: '{}', output: '{}'",
            input_name,
            output_name
        );
        for (i, output) in session.outputs.iter().enumerate() {
            tracing::debug!("Classification output[{}]: '{}'", i, output.name);
        }

        Ok(Self {
            session,
            input_name,
            output_name,
            layout,
        })
    }
}

impl ScoreModel for OnnxClassifier {
    fn predict(&mut self, batch: Array4<f32>) -> Result<Array2<f32>> {
        let batch = match self.layout {
            InputLayout::Nhwc => batch,
            InputLayout::Nchw => batch.permuted_axes([0, 3, 1, 2]).as_standard_layout().into_owned(),
        };

        let input_tensor = Tensor::from_array(batch)?;
        let outputs = self
            .session
            .run(inputs![self.input_name.as_str() => input_tensor])?;

        let predictions = match outputs.get(&self.output_name) {
            Some(output) => output.try_extract_array::<f32>()?.into_owned(),
            None => {
                let available_outputs: Vec<String> = outputs.keys().map(|s| s.to_string()).collect();
                return Err(PrepError::Inference(format!(
                    "Classification output '{}' not found. Available outputs: {:?}",
                    self.output_name, available_outputs
                )));
            }
        };

        let scores = predictions.into_dimensionality::<Ix2>().map_err(|e| {
            PrepError::Inference(format!("Expected 2D classification tensor: {}", e))
        })?;
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_file_is_a_load_error() {
        let err = OnnxClassifier::new(
            Path::new("/nonexistent/inception_v3.onnx"),
            &OnnxConfig::default(),
            InputLayout::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, PrepError::ModelLoad(_)));
    }
}
