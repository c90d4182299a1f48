use lopdf::Document;

use super::ExtractError;

/// Text of every page in page order, one page per line group.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        let text = doc
            .extract_text(&[*page_number])
            .map_err(|e| ExtractError::Pdf(format!("page {}: {}", page_number, e)))?;
        pages.push(text.trim_end_matches('\n').to_string());
    }

    Ok(pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures;

    #[test]
    fn single_page() {
        let bytes = fixtures::pdf_with_pages(&["Hello World"]);
        assert_eq!(extract(&bytes).unwrap(), "Hello World");
    }

    #[test]
    fn pages_joined_in_order() {
        let bytes = fixtures::pdf_with_pages(&["First page", "Second page", "Third page"]);
        assert_eq!(extract(&bytes).unwrap(), "First page\nSecond page\nThird page");
    }

    #[test]
    fn corrupt_pdf_is_an_error() {
        let err = extract(b"%PDF-1.4\nthis is not really a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
