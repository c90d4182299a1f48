//! Image text recognition.
//!
//! Images are decoded and converted to grayscale before recognition. By
//! default the `tesseract` executable is invoked; with the `native-ocr`
//! feature the library bindings are used instead.

use std::path::Path;
use std::process::Command;

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use super::ExtractError;
use crate::config::OcrConfig;

pub fn recognize(bytes: &[u8], config: &OcrConfig) -> Result<String, ExtractError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ExtractError::Image(format!("Failed to decode image: {}", e)))?;
    let processed = preprocess(img);

    let staged = tempfile::Builder::new()
        .prefix("ocr-")
        .suffix(".png")
        .tempfile()?;
    processed
        .save_with_format(staged.path(), ImageFormat::Png)
        .map_err(|e| ExtractError::Image(e.to_string()))?;

    debug!(
        width = processed.width(),
        height = processed.height(),
        language = %config.language,
        "Running OCR"
    );
    run_engine(staged.path(), config)
}

fn preprocess(img: DynamicImage) -> DynamicImage {
    img.grayscale()
}

#[cfg(not(feature = "native-ocr"))]
fn run_engine(image_path: &Path, config: &OcrConfig) -> Result<String, ExtractError> {
    let output = Command::new(&config.command)
        .arg(image_path)
        .arg("stdout")
        .arg("-l")
        .arg(&config.language)
        .output()
        .map_err(|e| ExtractError::Ocr(format!("Failed to run {}: {}", config.command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractError::Ocr(format!(
            "{} exited with {}: {}",
            config.command,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(feature = "native-ocr")]
fn run_engine(image_path: &Path, config: &OcrConfig) -> Result<String, ExtractError> {
    let path = image_path
        .to_str()
        .ok_or_else(|| ExtractError::Ocr("image path is not valid UTF-8".to_string()))?;

    tesseract::Tesseract::new(None, Some(config.language.as_str()))
        .map_err(|e| ExtractError::Ocr(e.to_string()))?
        .set_image(path)
        .map_err(|e| ExtractError::Ocr(e.to_string()))?
        .get_text()
        .map_err(|e| ExtractError::Ocr(e.to_string()))
}

/// Whether the configured OCR executable can be started.
pub fn engine_available(config: &OcrConfig) -> bool {
    if cfg!(feature = "native-ocr") {
        return true;
    }
    Command::new(&config.command)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}
