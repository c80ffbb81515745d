pub mod classifier;
pub mod labels;

pub use classifier::{InputLayout, OnnxClassifier, ScoreModel};
pub use labels::LabelTable;
