use crate::utils::error::PrepError;
use crate::Result;
use ort::session::builder::GraphOptimizationLevel;

/// Inception v3 默认输入边长
pub const INCEPTION_INPUT_SIZE: usize = 299;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// 输出图像尺寸
    pub target: TargetSize,

    /// ONNX Runtime配置
    pub onnx_config: OnnxConfig,
}

/// 目标尺寸（宽 x 高）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: usize,
    pub height: usize,
}

impl TargetSize {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PrepError::Config(format!(
                "Target size must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self {
            width: INCEPTION_INPUT_SIZE,
            height: INCEPTION_INPUT_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// CPU线程数
    pub intra_threads: usize,

    /// 优化级别 (0-3)
    pub optimization_level: u8,
}

impl OnnxConfig {
    pub fn graph_optimization_level(&self) -> GraphOptimizationLevel {
        match self.optimization_level {
            0 => GraphOptimizationLevel::Disable,
            1 => GraphOptimizationLevel::Level1,
            2 => GraphOptimizationLevel::Level2,
            _ => GraphOptimizationLevel::Level3,
        }
    }
}

impl Default for OnnxConfig {
    fn default() -> Self {
        Self {
            intra_threads: (num_cpus::get() * 3 / 4).max(1), // 使用75%的CPU核心
            optimization_level: 3,
        }
    }
}

impl Config {
    pub fn new(width: usize, height: usize, intra_threads: Option<usize>) -> Result<Self> {
        let target = TargetSize::new(width, height)?;

        let mut onnx_config = OnnxConfig::default();
        if let Some(threads) = intra_threads {
            if threads == 0 {
                return Err(PrepError::Config(
                    "Intra-op thread count must be at least 1".to_string(),
                ));
            }
            onnx_config.intra_threads = threads;
        }

        Ok(Self {
            target,
            onnx_config,
        })
    }
}
