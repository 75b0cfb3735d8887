//! Table loading and normalisation for the training log.
//!
//! Accepts the formats the log has actually lived in (comma- and
//! tab-separated text, Excel workbooks), resolves the header row
//! against the configured column map, and produces clean
//! [`DayRecord`]s: dates parsed, the sparse week label carried
//! forward, and the month bucket derived from the date.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use fitdash_core::error::{FitdashError, Result};
use fitdash_core::models::{month_key, parse_log_date, DayRecord};
use fitdash_core::schema::{is_synthetic_header, ColumnMap};
use tracing::{debug, warn};

use crate::store::ObjectStore;

// ── Formats ───────────────────────────────────────────────────────────────────

/// Concrete encodings the training log is distributed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated text (`.csv`).
    Delimited,
    /// Tab-separated text (`.tsv`, `.txt`).
    TabDelimited,
    /// Excel workbook (`.xlsx`, `.xls`); only the first sheet is read.
    Spreadsheet,
}

impl TableFormat {
    /// Pick the format from a file name or object key.
    ///
    /// Returns [`FitdashError::UnsupportedFormat`] for anything else,
    /// so an unrecognised source always fails loudly instead of
    /// producing an empty table.
    pub fn from_source_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(TableFormat::Delimited),
            "tsv" | "txt" => Ok(TableFormat::TabDelimited),
            "xlsx" | "xls" => Ok(TableFormat::Spreadsheet),
            _ => Err(FitdashError::UnsupportedFormat { extension }),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and normalise the log from a local file.
pub fn load_file(path: &Path, map: &ColumnMap) -> Result<Vec<DayRecord>> {
    let format = TableFormat::from_source_name(&path.to_string_lossy())?;
    let bytes = std::fs::read(path).map_err(|e| FitdashError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(
        "Read {} ({} bytes, {:?})",
        path.display(),
        bytes.len(),
        format
    );
    decode_bytes(&bytes, format, map)
}

/// Load and normalise the log from an object store.
///
/// The format is decided from the key's extension before any bytes are
/// fetched, so an unsupported key never costs a round trip.
pub fn load_object(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    map: &ColumnMap,
) -> Result<Vec<DayRecord>> {
    let format = TableFormat::from_source_name(key)?;
    let bytes = store.fetch(bucket, key)?;
    decode_bytes(&bytes, format, map)
}

/// Decode raw table bytes in the given format into normalised records.
pub fn decode_bytes(bytes: &[u8], format: TableFormat, map: &ColumnMap) -> Result<Vec<DayRecord>> {
    let table = match format {
        TableFormat::Delimited => read_delimited(bytes, b',')?,
        TableFormat::TabDelimited => read_delimited(bytes, b'\t')?,
        TableFormat::Spreadsheet => read_spreadsheet(bytes)?,
    };
    build_records(table, map)
}

// ── Raw table parsing ─────────────────────────────────────────────────────────

/// A parsed but not yet normalised table: the header row plus string
/// cells, `None` for blanks.
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

fn read_delimited(bytes: &[u8], delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FitdashError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FitdashError::Csv(e.to_string()))?;
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

fn read_spreadsheet(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| FitdashError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(FitdashError::EmptyTable)?
        .map_err(|e| FitdashError::Spreadsheet(e.to_string()))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row
            .iter()
            .map(|c| spreadsheet_cell(c).unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };

    let rows: Vec<Vec<Option<String>>> = rows_iter
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

/// Trim a text cell, mapping blanks to `None`.
fn text_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Render one workbook cell the way the text formats would carry it.
fn spreadsheet_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => text_cell(s),
        Data::Float(f) => Some(format_workbook_number(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| ndt.date().format("%Y/%m/%d").to_string()),
        Data::DateTimeIso(s) => text_cell(s),
        Data::DurationIso(s) => text_cell(s),
        Data::Error(e) => {
            warn!("Workbook error cell treated as blank: {:?}", e);
            None
        }
    }
}

/// Integral floats print without the trailing `.0` Excel never shows.
fn format_workbook_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ── Normalisation ─────────────────────────────────────────────────────────────

fn build_records(table: RawTable, map: &ColumnMap) -> Result<Vec<DayRecord>> {
    let synthetic = table
        .headers
        .iter()
        .filter(|h| is_synthetic_header(h))
        .count();
    if synthetic > 0 {
        debug!("Ignoring {} synthetic column(s) in header", synthetic);
    }

    let columns = map.resolve(&table.headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        // Row numbers count the header as row 1, matching what the
        // spreadsheet shows.
        let row_number = i + 2;

        if row.iter().all(Option::is_none) {
            debug!("Skipping blank row {}", row_number);
            continue;
        }

        let date = match cell(row, columns.date) {
            Some(value) => {
                parse_log_date(value).ok_or_else(|| FitdashError::MalformedDate {
                    value: value.to_string(),
                    row: row_number,
                })?
            }
            None => {
                return Err(FitdashError::MalformedDate {
                    value: String::new(),
                    row: row_number,
                })
            }
        };

        records.push(DayRecord {
            date,
            week: cell(row, columns.week).map(str::to_string),
            month: month_key(date),
            weight: parse_metric(row, columns.weight, "Weight", row_number),
            calories: parse_metric(row, columns.calories, "Calories", row_number),
            protein: parse_metric(row, columns.protein, "Protein", row_number),
            steps: parse_steps(row, columns.steps, row_number),
            workout: cell(row, columns.workout).map(str::to_string),
            conditioning: columns
                .conditioning
                .and_then(|idx| cell(row, idx).map(str::to_string)),
        });
    }

    forward_fill_week(&mut records);

    debug!("Normalised {} day records", records.len());
    Ok(records)
}

/// The trimmed cell at `idx`, `None` when the row is short or blank.
fn cell(row: &[Option<String>], idx: usize) -> Option<&str> {
    row.get(idx).and_then(|c| c.as_deref())
}

/// Parse a floating-point metric cell. Values that do not parse (or
/// parse to a non-finite number) count as not logged.
fn parse_metric(row: &[Option<String>], idx: usize, name: &str, row_number: usize) -> Option<f64> {
    let value = cell(row, idx)?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(
                "Unparseable {} value at row {}: {:?}",
                name, row_number, value
            );
            None
        }
    }
}

/// Parse a step-count cell. Workbook exports store counts as floats,
/// so `9500.0` style values are accepted and rounded.
fn parse_steps(row: &[Option<String>], idx: usize, row_number: usize) -> Option<i64> {
    let value = cell(row, idx)?;
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v.round() as i64),
        _ => {
            warn!("Unparseable Steps value at row {}: {:?}", row_number, value);
            None
        }
    }
}

/// Carry the week label forward over unlabelled rows. Rows before the
/// first label keep `None`.
fn forward_fill_week(records: &mut [DayRecord]) {
    let mut current: Option<String> = None;
    for record in records.iter_mut() {
        match &record.week {
            Some(label) => current = Some(label.clone()),
            None => record.week = current.clone(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FsObjectStore;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// A realistic slice of the log: sparse week labels, holes in the
    /// metrics, and a stray index column from a spreadsheet export.
    fn sample_csv() -> &'static str {
        "Unnamed: 0,Date,Week,Weight,Calories,Protein,Steps,Workout,Conditioning\n\
         0,2024/03/11,Week 10,185.2,2500,180,9500,\"Push, Pull\",Rowing 150\n\
         1,2024/03/12,,184.8,2450,175,10200,,\n\
         2,2024/03/13,,,2600,,8800,Legs,\n\
         3,2024/03/14,Week 11,184.1,,170,,\"Push, Legs\",Bike 200\n"
    }

    fn write_log(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    fn decode_csv(content: &str) -> Result<Vec<DayRecord>> {
        decode_bytes(
            content.as_bytes(),
            TableFormat::Delimited,
            &ColumnMap::default(),
        )
    }

    // ── TableFormat ───────────────────────────────────────────────────────────

    #[test]
    fn test_format_from_source_name() {
        assert_eq!(
            TableFormat::from_source_name("log.csv").unwrap(),
            TableFormat::Delimited
        );
        assert_eq!(
            TableFormat::from_source_name("log.tsv").unwrap(),
            TableFormat::TabDelimited
        );
        assert_eq!(
            TableFormat::from_source_name("log.txt").unwrap(),
            TableFormat::TabDelimited
        );
        assert_eq!(
            TableFormat::from_source_name("log.xlsx").unwrap(),
            TableFormat::Spreadsheet
        );
        assert_eq!(
            TableFormat::from_source_name("log.xls").unwrap(),
            TableFormat::Spreadsheet
        );
    }

    #[test]
    fn test_format_is_case_insensitive() {
        assert_eq!(
            TableFormat::from_source_name("LOG.CSV").unwrap(),
            TableFormat::Delimited
        );
        assert_eq!(
            TableFormat::from_source_name("archive/2024.XLSX").unwrap(),
            TableFormat::Spreadsheet
        );
    }

    #[test]
    fn test_format_rejects_unknown_extension() {
        let err = TableFormat::from_source_name("log.pdf").unwrap_err();
        match err {
            FitdashError::UnsupportedFormat { extension } => assert_eq!(extension, "pdf"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_format_rejects_missing_extension() {
        let err = TableFormat::from_source_name("log").unwrap_err();
        assert!(matches!(err, FitdashError::UnsupportedFormat { .. }));
    }

    // ── CSV decoding ──────────────────────────────────────────────────────────

    #[test]
    fn test_decode_basic_csv() {
        let records = decode_csv(sample_csv()).unwrap();
        assert_eq!(records.len(), 4);

        let first = &records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(first.weight, Some(185.2));
        assert_eq!(first.calories, Some(2500.0));
        assert_eq!(first.protein, Some(180.0));
        assert_eq!(first.steps, Some(9_500));
        assert_eq!(first.workout.as_deref(), Some("Push, Pull"));
        assert_eq!(first.conditioning.as_deref(), Some("Rowing 150"));
    }

    #[test]
    fn test_decode_derives_month() {
        let records = decode_csv(sample_csv()).unwrap();
        assert!(records.iter().all(|r| r.month == "2024-03"));
    }

    #[test]
    fn test_week_label_carried_forward() {
        let records = decode_csv(sample_csv()).unwrap();
        assert_eq!(records[0].week.as_deref(), Some("Week 10"));
        assert_eq!(records[1].week.as_deref(), Some("Week 10"));
        assert_eq!(records[2].week.as_deref(), Some("Week 10"));
        assert_eq!(records[3].week.as_deref(), Some("Week 11"));
    }

    #[test]
    fn test_rows_before_first_week_label_stay_unlabelled() {
        let csv = "Date,Week,Weight,Calories,Protein,Steps,Workout\n\
                   2024/03/10,,183.0,2400,160,9000,\n\
                   2024/03/11,Week 10,185.2,2500,180,9500,\n";
        let records = decode_csv(csv).unwrap();
        assert_eq!(records[0].week, None);
        assert_eq!(records[1].week.as_deref(), Some("Week 10"));
    }

    #[test]
    fn test_missing_cells_become_none() {
        let records = decode_csv(sample_csv()).unwrap();
        let third = &records[2];
        assert_eq!(third.weight, None);
        assert_eq!(third.protein, None);
        assert_eq!(third.conditioning, None);
        // The logged cells still come through.
        assert_eq!(third.calories, Some(2600.0));
        assert_eq!(third.steps, Some(8_800));
    }

    #[test]
    fn test_synthetic_index_column_is_ignored() {
        // sample_csv carries an `Unnamed: 0` column; resolution must
        // still land on the named columns.
        let records = decode_csv(sample_csv()).unwrap();
        assert_eq!(records[0].weight, Some(185.2));
    }

    #[test]
    fn test_iso_dates_also_accepted() {
        let csv = "Date,Week,Weight,Calories,Protein,Steps,Workout\n\
                   2024-03-11,Week 10,185.2,2500,180,9500,\n";
        let records = decode_csv(csv).unwrap();
        assert_eq!(
            records[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn test_malformed_date_reports_spreadsheet_row() {
        let csv = "Date,Week,Weight,Calories,Protein,Steps,Workout\n\
                   2024/03/11,Week 10,185.2,2500,180,9500,\n\
                   13/45/2024,,184.8,2450,175,10200,\n";
        let err = decode_csv(csv).unwrap_err();
        match err {
            FitdashError::MalformedDate { value, row } => {
                assert_eq!(value, "13/45/2024");
                // Header is row 1, the bad entry is the second data row.
                assert_eq!(row, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Date,Week,Calories,Protein,Steps,Workout\n\
                   2024/03/11,Week 10,2500,180,9500,\n";
        let err = decode_csv(csv).unwrap_err();
        assert!(matches!(
            err,
            FitdashError::MissingColumn { field: "Weight", .. }
        ));
    }

    #[test]
    fn test_header_alias_spellings_accepted() {
        let csv = "Date,Week,Weight (lb),Calories,Protein (g),Steps,Workout,\
                   Conditioning (cal estimated using apps)\n\
                   2024/03/11,Week 10,185.2,2500,180,9500,Push,Rowing 150\n";
        let records = decode_csv(csv).unwrap();
        assert_eq!(records[0].weight, Some(185.2));
        assert_eq!(records[0].protein, Some(180.0));
        assert_eq!(records[0].conditioning.as_deref(), Some("Rowing 150"));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let csv = "Date,Week,Weight,Calories,Protein,Steps,Workout\n\
                   2024/03/11,Week 10,185.2,2500,180,9500,\n\
                   ,,,,,,\n\
                   2024/03/12,,184.8,2450,175,10200,\n";
        let records = decode_csv(csv).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_empty_input_is_empty_table() {
        let err = decode_csv("").unwrap_err();
        assert!(matches!(err, FitdashError::EmptyTable));
    }

    #[test]
    fn test_header_only_yields_no_records() {
        let csv = "Date,Week,Weight,Calories,Protein,Steps,Workout\n";
        let records = decode_csv(csv).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_unparseable_metric_becomes_none() {
        let csv = "Date,Week,Weight,Calories,Protein,Steps,Workout\n\
                   2024/03/11,Week 10,heavy,2500,NaN,lots,\n";
        let records = decode_csv(csv).unwrap();
        assert_eq!(records[0].weight, None);
        assert_eq!(records[0].protein, None);
        assert_eq!(records[0].steps, None);
        assert_eq!(records[0].calories, Some(2500.0));
    }

    #[test]
    fn test_steps_accepts_workbook_style_floats() {
        let csv = "Date,Week,Weight,Calories,Protein,Steps,Workout\n\
                   2024/03/11,Week 10,185.2,2500,180,9500.0,\n";
        let records = decode_csv(csv).unwrap();
        assert_eq!(records[0].steps, Some(9_500));
    }

    #[test]
    fn test_short_rows_are_padded_with_none() {
        let csv = "Date,Week,Weight,Calories,Protein,Steps,Workout\n\
                   2024/03/11,Week 10,185.2\n";
        let records = decode_csv(csv).unwrap();
        assert_eq!(records[0].weight, Some(185.2));
        assert_eq!(records[0].calories, None);
        assert_eq!(records[0].workout, None);
    }

    // ── TSV decoding ──────────────────────────────────────────────────────────

    #[test]
    fn test_decode_tab_delimited() {
        let tsv = "Date\tWeek\tWeight\tCalories\tProtein\tSteps\tWorkout\n\
                   2024/03/11\tWeek 10\t185.2\t2500\t180\t9500\tPush, Pull\n";
        let records = decode_bytes(
            tsv.as_bytes(),
            TableFormat::TabDelimited,
            &ColumnMap::default(),
        )
        .unwrap();
        assert_eq!(records[0].workout.as_deref(), Some("Push, Pull"));
    }

    // ── Spreadsheet cells ─────────────────────────────────────────────────────

    #[test]
    fn test_spreadsheet_cell_numbers() {
        assert_eq!(
            spreadsheet_cell(&Data::Float(9500.0)),
            Some("9500".to_string())
        );
        assert_eq!(
            spreadsheet_cell(&Data::Float(185.2)),
            Some("185.2".to_string())
        );
        assert_eq!(spreadsheet_cell(&Data::Int(42)), Some("42".to_string()));
    }

    #[test]
    fn test_spreadsheet_cell_strings_and_blanks() {
        assert_eq!(
            spreadsheet_cell(&Data::String(" Push, Pull ".to_string())),
            Some("Push, Pull".to_string())
        );
        assert_eq!(spreadsheet_cell(&Data::String("  ".to_string())), None);
        assert_eq!(spreadsheet_cell(&Data::Empty), None);
    }

    #[test]
    fn test_spreadsheet_bytes_must_be_a_workbook() {
        let err = decode_bytes(
            b"Date,Week\n",
            TableFormat::Spreadsheet,
            &ColumnMap::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FitdashError::Spreadsheet(_)));
    }

    // ── File and object entry points ──────────────────────────────────────────

    #[test]
    fn test_load_file_happy_path() {
        let tmp = TempDir::new().unwrap();
        let path = write_log(&tmp, "log.csv", sample_csv());

        let records = load_file(&path, &ColumnMap::default()).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_load_file_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_file(&tmp.path().join("absent.csv"), &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, FitdashError::FileRead { .. }));
    }

    #[test]
    fn test_load_file_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = write_log(&tmp, "log.json", "{}");
        let err = load_file(&path, &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, FitdashError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_object_happy_path() {
        let tmp = TempDir::new().unwrap();
        let bucket_dir = tmp.path().join("fitness-logs");
        std::fs::create_dir_all(&bucket_dir).unwrap();
        std::fs::write(bucket_dir.join("2024.csv"), sample_csv()).unwrap();

        let store = FsObjectStore::new(tmp.path());
        let records =
            load_object(&store, "fitness-logs", "2024.csv", &ColumnMap::default()).unwrap();
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_load_object_rejects_format_before_fetch() {
        let tmp = TempDir::new().unwrap();
        let store = FsObjectStore::new(tmp.path());

        // Bucket does not exist either, but the key's format is
        // checked first.
        let err =
            load_object(&store, "no-bucket", "notes.pdf", &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, FitdashError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_object_missing_bucket() {
        let tmp = TempDir::new().unwrap();
        let store = FsObjectStore::new(tmp.path());
        let err =
            load_object(&store, "no-bucket", "2024.csv", &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, FitdashError::BucketNotFound { .. }));
    }
}
