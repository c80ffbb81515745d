use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Degenerate image: {0}")]
    DegenerateImage(String),

    #[error("DICOM error: {0}")]
    Dicom(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("ORT error: {0}")]
    Ort(#[from] ort::Error),
}

impl PrepError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PrepError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            PrepError::ImageProcessing(_) => "IMAGE_PROCESSING_ERROR",
            PrepError::Inference(_) => "INFERENCE_ERROR",
            PrepError::InvalidInput(_) => "INVALID_INPUT",
            PrepError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            PrepError::DegenerateImage(_) => "DEGENERATE_IMAGE",
            PrepError::Dicom(_) => "DICOM_ERROR",
            PrepError::Config(_) => "CONFIG_ERROR",
            PrepError::Io(_) => "IO_ERROR",
            PrepError::Json(_) => "JSON_ERROR",
            PrepError::ImageDecode(_) => "IMAGE_DECODE_ERROR",
            PrepError::Shape(_) => "SHAPE_ERROR",
            PrepError::Ort(_) => "ORT_ERROR",
        }
    }

    /// 是否为输入数据本身的问题（而非环境或模型问题）
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PrepError::InvalidInput(_)
                | PrepError::UnsupportedFormat(_)
                | PrepError::DegenerateImage(_)
                | PrepError::ImageDecode(_)
                | PrepError::Dicom(_)
        )
    }
}
