pub mod batch;
pub mod config;
pub mod image;
pub mod inference;
pub mod models;
pub mod utils;

// 重新导出主要类型
pub use config::{Config, TargetSize};
pub use inference::{ImagePrediction, InferenceDriver};
pub use utils::error::PrepError;

pub type Result<T> = std::result::Result<T, PrepError>;
