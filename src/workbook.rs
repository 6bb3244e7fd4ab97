use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use calamine::{Data, Range, Reader as _, open_workbook_auto_from_rs};

use crate::error::{ErrorKind, ScrollyError, ScrollyResult};
use crate::formats::{REQUIRED_SHEETS, RawTables, STEPS_SHEET, STORY_SHEET, Table};
use crate::source::{Lookup, TableSource};

pub const DEFAULT_DATA_PATH: &str = "data/StoryData.xlsx";

/// Spreadsheet workbook on the local filesystem (xlsx, xls, xlsb or ods).
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TableSource for WorkbookSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn lookup(&self) -> ScrollyResult<Lookup> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "workbook not found");
                return Ok(Lookup::NotFound);
            }
            Err(err) => return Ok(Lookup::Malformed(format!("read workbook: {err}"))),
        };
        read_workbook(bytes)
    }
}

pub fn read_workbook(bytes: Vec<u8>) -> ScrollyResult<Lookup> {
    let mut workbook = match open_workbook_auto_from_rs(Cursor::new(bytes)) {
        Ok(workbook) => workbook,
        Err(err) => return Ok(Lookup::Malformed(format!("open workbook: {err}"))),
    };

    ensure_sheets(&workbook.sheet_names()).map_err(|sheet| {
        ScrollyError::new(
            "processing spreadsheet",
            ErrorKind::MissingSheet(sheet.to_owned()),
        )
    })?;

    let story = match workbook.worksheet_range(STORY_SHEET) {
        Ok(range) => table_from_range(&range),
        Err(err) => return Ok(Lookup::Malformed(format!("read {STORY_SHEET} sheet: {err}"))),
    };
    let steps = match workbook.worksheet_range(STEPS_SHEET) {
        Ok(range) => table_from_range(&range),
        Err(err) => return Ok(Lookup::Malformed(format!("read {STEPS_SHEET} sheet: {err}"))),
    };

    Ok(Lookup::Found(RawTables { story, steps }))
}

/// First required sheet absent from `names`, as an error.
pub fn ensure_sheets(names: &[String]) -> Result<(), &'static str> {
    match REQUIRED_SHEETS
        .into_iter()
        .find(|required| !names.iter().any(|name| name == required))
    {
        Some(missing) => Err(missing),
        None => Ok(()),
    }
}

/// Rows of the used range as text; rows whose cells are all blank are dropped.
pub fn table_from_range(range: &Range<Data>) -> Table {
    range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}
