use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use super::{LoadError, RawTable};

/// Read the first worksheet of an Excel/ODS workbook. The first row is the header.
pub fn read_first_sheet(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::unreadable(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Empty(path.to_path_buf()))?
        .map_err(|e| LoadError::unreadable(path, e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(r) => r.iter().map(cell_text).collect(),
        None => return Err(LoadError::Empty(path.to_path_buf())),
    };
    let rows = rows.map(|r| r.iter().map(cell_text).collect()).collect();

    Ok(RawTable { headers, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // integral floats print without a trailing `.0`
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        // `#N/A`, `#DIV/0!` and friends carry no value
        Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::load_dataset;
    use anyhow::Result;
    use calamine::CellErrorType;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    #[test]
    fn reads_numeric_cells_from_xlsx() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("panel.xlsx");

        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        for (c, h) in ["IMPUESTO", "AÑO", "MES", "ADUANA", "RECAUDACIÓN", "LATITUD", "LONGITUD"]
            .iter()
            .enumerate()
        {
            ws.write_string(0, c as u16, *h)?;
        }
        ws.write_string(1, 0, "IVA")?;
        ws.write_number(1, 1, 2024.0)?;
        ws.write_string(1, 2, "Enero")?;
        ws.write_string(1, 3, "Nuevo Laredo")?;
        ws.write_number(1, 4, 1250.75)?;
        ws.write_number(1, 5, 27.48)?;
        ws.write_number(1, 6, -99.51)?;
        wb.save(&path)?;

        let raw = read_first_sheet(&path)?;
        assert_eq!(raw.headers[1], "AÑO");
        assert_eq!(raw.rows[0][1], "2024");

        let ds = load_dataset(&path)?;
        assert_eq!(ds.len(), 1);
        let r = &ds.records()[0];
        assert_eq!(r.year, 2024);
        assert_eq!(r.customs_office, "Nuevo Laredo");
        assert_eq!(r.collection_amount, 1250.75);
        Ok(())
    }

    #[test]
    fn error_cells_read_as_blank() {
        assert_eq!(cell_text(&Data::Error(CellErrorType::NA)), "");
        assert_eq!(cell_text(&Data::Error(CellErrorType::Div0)), "");
        assert_eq!(cell_text(&Data::Float(2024.0)), "2024");
    }

    #[test]
    fn corrupt_workbook_is_unreadable() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip")?;
        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, LoadError::Unreadable { .. }));
        Ok(())
    }
}
