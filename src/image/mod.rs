pub mod loader;
pub mod preprocessing;
pub mod transforms;
pub mod writer;

pub use loader::{DicomImage, ImageLoader};
pub use preprocessing::ImageNormalizer;
pub use transforms::ImageTransforms;
pub use writer::GrayWriter;
