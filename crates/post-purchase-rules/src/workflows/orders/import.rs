use super::table::RawTable;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum OrderImportError {
    #[error("failed to read order export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid order CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads order exports into a [`RawTable`] without interpreting any cell.
pub struct OrderCsvImporter;

impl OrderCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RawTable, OrderImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Short rows are padded with blanks so they fail validation on their own
    /// instead of aborting the whole read. Cells that are not valid UTF-8 are
    /// decoded lossily for the same reason.
    pub fn from_reader<R: Read>(reader: R) -> Result<RawTable, OrderImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = decode_cells(csv_reader.byte_headers()?);
        let mut rows = Vec::new();
        for record in csv_reader.byte_records() {
            let record = record?;
            let mut cells = decode_cells(&record);
            if cells.len() < headers.len() {
                cells.resize(headers.len(), String::new());
            }
            rows.push(cells);
        }

        Ok(RawTable::new(headers, rows))
    }
}

fn decode_cells(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}
