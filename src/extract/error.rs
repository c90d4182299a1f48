use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("PDF extraction error: {0}")]
    Pdf(String),

    #[error("Word document extraction error: {0}")]
    Docx(String),

    #[error("CSV extraction error: {0}")]
    Csv(String),

    #[error("Text decoding error: {0}")]
    Text(String),

    #[error("Image decoding error: {0}")]
    Image(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ExtractError {
    fn from(err: csv::Error) -> Self {
        ExtractError::Csv(err.to_string())
    }
}
