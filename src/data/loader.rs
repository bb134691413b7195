use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::RawRow;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw season rows from a CSV file.
///
/// Any unreadable file or malformed record fails the whole load; the
/// pipeline must not run on partial data.
pub fn load_file(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext != "csv" {
        bail!("Unsupported file extension: .{ext}");
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    load_rows(file).with_context(|| format!("loading {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one player-team stint per row.
/// Every cell is kept as text; typing happens in the row filter.
///
/// The season export starts with an unnamed index column; like any other
/// column it is carried under its (empty) header name.
pub fn load_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
,Year,Player,Pos,Age,Tm,3PA,3P%,2PA,2P%,TS%,MP
0,2005.0,Ray Allen,SG,29,SEA,653,0.376,1001,0.481,0.564,3179
1,2005.0,Ben Wallace,C,30,DET,1,,700,0.454,0.481,2780
";

    #[test]
    fn reads_rows_as_text() {
        let rows = load_rows(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Player"], "Ray Allen");
        assert_eq!(rows[0]["Year"], "2005.0");
        assert_eq!(rows[1]["3P%"], "");
        assert_eq!(rows[1][""], "1");
    }

    #[test]
    fn ragged_record_fails_the_load() {
        let csv = "Year,Player\n2005,A\n2006\n";
        let err = load_rows(Cursor::new(csv)).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }

    #[test]
    fn rejects_non_csv_extension() {
        let err = load_file(Path::new("stats.json")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_file(Path::new("/definitely/not/here.csv")).is_err());
    }
}
