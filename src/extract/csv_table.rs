use csv::ReaderBuilder;

use super::ExtractError;

const MISSING_CELL: &str = "NaN";
const COLUMN_GAP: &str = "  ";

/// Render CSV data as a fixed-width text table: header line first, then one
/// line per record, every column right-aligned to its widest cell. No index
/// column is added.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(ExtractError::Csv("no columns to parse from file".to_string()));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(ExtractError::Csv(format!(
                "expected {} fields in line {}, saw {}",
                headers.len(),
                idx + 2,
                record.len()
            )));
        }
        let mut row: Vec<String> = record.iter().map(|v| v.to_string()).collect();
        row.resize(headers.len(), MISSING_CELL.to_string());
        rows.push(row);
    }

    Ok(render_table(&headers, &rows))
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    std::iter::once(headers)
        .chain(rows.iter().map(|row| row.as_slice()))
        .map(|cells| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
