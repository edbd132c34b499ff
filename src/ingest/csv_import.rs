//! CSV adapter
//!
//! Reads a CSV file into the raw cell grid the engine ingests. The
//! header row is kept as the grid's first row so the column mapper can
//! inspect it. Malformed records are counted and reported, never fatal.

use std::io::Read;
use std::path::Path;

use super::IngestError;

/// Outcome of reading a CSV source into a grid.
#[derive(Debug)]
pub struct GridReadResult {
    /// All rows, header first
    pub grid: Vec<Vec<String>>,
    /// Records the CSV reader could not produce
    pub records_failed: usize,
    /// Per-record error messages, truncated after the first 20
    pub errors: Vec<String>,
}

/// Read a CSV file into a cell grid
pub fn read_grid(path: &Path) -> Result<GridReadResult, IngestError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    collect_grid(reader)
}

/// Read CSV data from a string into a cell grid (useful for testing)
pub fn read_grid_str(data: &str) -> Result<GridReadResult, IngestError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());
    collect_grid(reader)
}

fn collect_grid<R: Read>(mut reader: csv::Reader<R>) -> Result<GridReadResult, IngestError> {
    let mut grid = Vec::new();
    let mut records_failed = 0;
    let mut errors = Vec::new();

    for (line, result) in reader.records().enumerate() {
        match result {
            Ok(record) => grid.push(record.iter().map(str::to_string).collect()),
            Err(e) => {
                records_failed += 1;
                errors.push(format!("Line {}: {}", line + 1, e));
            }
        }
    }

    if errors.len() > 20 {
        let total = errors.len();
        errors.truncate(20);
        errors.push(format!("... and {} more errors", total - 20));
    }

    Ok(GridReadResult {
        grid,
        records_failed,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_grid_str_keeps_header_row() {
        let data = "agent,date,calls\nAna,2024-01-01,3\nBruno,2024-01-02,2";
        let result = read_grid_str(data).unwrap();

        assert_eq!(result.grid.len(), 3);
        assert_eq!(result.grid[0], vec!["agent", "date", "calls"]);
        assert_eq!(result.grid[2], vec!["Bruno", "2024-01-02", "2"]);
        assert_eq!(result.records_failed, 0);
    }

    #[test]
    fn test_read_grid_str_accepts_uneven_records() {
        let data = "agent,date,calls\nAna\nBruno,2024-01-02,2,extra";
        let result = read_grid_str(data).unwrap();

        assert_eq!(result.grid.len(), 3);
        assert_eq!(result.grid[1], vec!["Ana"]);
        assert_eq!(result.grid[2].len(), 4);
    }

    #[test]
    fn test_read_grid_handles_quoted_fields() {
        let data = "agent,queue\n\"Silva, Ana\",support";
        let result = read_grid_str(data).unwrap();

        assert_eq!(result.grid[1], vec!["Silva, Ana", "support"]);
    }

    #[test]
    fn test_read_grid_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "agent,date").unwrap();
        writeln!(file, "Ana,2024-01-01").unwrap();

        let result = read_grid(&path).unwrap();
        assert_eq!(result.grid.len(), 2);
        assert_eq!(result.grid[1], vec!["Ana", "2024-01-01"]);
    }

    #[test]
    fn test_read_grid_missing_file_is_an_error() {
        let result = read_grid(Path::new("/nonexistent/calls.csv"));
        assert!(result.is_err());
    }
}
