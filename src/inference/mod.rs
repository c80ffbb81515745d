pub mod driver;
pub mod types;

pub use driver::{top_k, InferenceDriver, TOP_K};
pub use types::{ImagePrediction, Prediction, ResultFormatter};
