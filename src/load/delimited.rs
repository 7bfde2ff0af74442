use csv::ReaderBuilder;
use std::{fs::File, path::Path};

use super::{LoadError, RawTable};

/// Read a comma-separated export. Rows may have differing field counts.
pub fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::unreadable(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| LoadError::unreadable(path, e))?
        .iter()
        .map(|s| s.to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            LoadError::unreadable(path, format!("CSV parse error at record {}: {e}", idx + 1))
        })?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}
