//! Spreadsheet access
//!
//! [`ExcelDataAccess`] works on one `.xlsx` workbook through an in-memory
//! sheet model. Existing files are read with `calamine`, and the model is
//! written back with `rust_xlsxwriter` on [`ExcelDataAccess::save`]. Only
//! cell values, merged regions and the formatting applied through this type
//! survive a load/save cycle.

use calamine::{open_workbook, Data, DataType, ExcelDateTime, Reader, Xlsx};
use chrono::{NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Url, Workbook};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::error::{AutopiaError, Result};

/// File extension of workbooks handled by [`ExcelDataAccess`]
pub const EXCEL_EXTENSION: &str = "xlsx";

/// Lowest custom palette index
pub const PALETTE_MIN: u8 = 0x8;
/// Highest custom palette index
pub const PALETTE_MAX: u8 = 0x40;

/// Serializes read-modify-write cycles on shared workbook files
pub static DATATABLE_WRITE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn validate_palette_index(index: u8) -> Result<u8> {
    if !(PALETTE_MIN..=PALETTE_MAX).contains(&index) {
        error!(index, "Palette index out of range");
        return Err(AutopiaError::framework(
            "Valid indexes for the Excel custom palette are from 0x8 to 0x40 (inclusive)!",
        ));
    }
    Ok(index)
}

/// Parse a `#RRGGBB` color string
pub fn parse_hex_color(hex: &str) -> Result<u32> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return Err(AutopiaError::framework(format!(
            "Invalid color code: {}",
            hex
        )));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|_| AutopiaError::framework(format!("Invalid color code: {}", hex)))
}

/// Cell formatting applied by [`ExcelDataAccess::set_value_at`]
///
/// Colors are palette indexes; the actual colors are registered per workbook
/// with [`ExcelDataAccess::set_custom_palette_color`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcelCellFormatting {
    pub font_name: String,
    pub font_size: u16,
    back_color_index: Option<u8>,
    fore_color_index: Option<u8>,
    pub bold: bool,
    pub italics: bool,
    pub centered: bool,
}

impl Default for ExcelCellFormatting {
    fn default() -> Self {
        Self {
            font_name: "Verdana".to_string(),
            font_size: 10,
            back_color_index: None,
            fore_color_index: None,
            bold: false,
            italics: false,
            centered: false,
        }
    }
}

impl ExcelCellFormatting {
    pub fn new(font_name: impl Into<String>, font_size: u16) -> Self {
        Self {
            font_name: font_name.into(),
            font_size,
            ..Default::default()
        }
    }

    pub fn back_color_index(&self) -> Option<u8> {
        self.back_color_index
    }

    pub fn fore_color_index(&self) -> Option<u8> {
        self.fore_color_index
    }

    pub fn set_back_color_index(&mut self, index: u8) -> Result<()> {
        self.back_color_index = Some(validate_palette_index(index)?);
        Ok(())
    }

    pub fn set_fore_color_index(&mut self, index: u8) -> Result<()> {
        self.fore_color_index = Some(validate_palette_index(index)?);
        Ok(())
    }

    /// Builder form of the color setters
    pub fn with_colors(mut self, back: u8, fore: u8) -> Result<Self> {
        self.set_back_color_index(back)?;
        self.set_fore_color_index(fore)?;
        Ok(self)
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    fn to_format(&self, palette: &HashMap<u8, u32>, bordered: bool) -> Format {
        let mut format = Format::new()
            .set_font_name(self.font_name.as_str())
            .set_font_size(self.font_size);

        if self.bold {
            format = format.set_bold();
        }
        if self.italics {
            format = format.set_italic();
        }
        if self.centered {
            format = format.set_align(FormatAlign::Center);
        }
        if let Some(rgb) = self.back_color_index.and_then(|i| palette.get(&i)) {
            format = format.set_background_color(*rgb);
        }
        if let Some(rgb) = self.fore_color_index.and_then(|i| palette.get(&i)) {
            format = format.set_font_color(*rgb);
        }
        if bordered {
            format = format.set_border(FormatBorder::Thin);
        }
        format
    }
}

#[derive(Debug, Clone, Default)]
struct CellData {
    value: String,
    formatting: Option<ExcelCellFormatting>,
    hyperlink: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MergedRegion {
    first_row: usize,
    last_row: usize,
    first_col: usize,
    last_col: usize,
}

#[derive(Debug, Clone, Default)]
struct SheetData {
    name: String,
    cells: BTreeMap<(usize, usize), CellData>,
    /// Highest row index that exists, including rows without values
    last_row: Option<usize>,
    merges: Vec<MergedRegion>,
    auto_fit: bool,
    bordered: bool,
}

impl SheetData {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn value(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(&(row, col))
            .map(|c| c.value.as_str())
            .unwrap_or("")
    }

    fn touch_row(&mut self, row: usize) {
        self.last_row = Some(self.last_row.map_or(row, |last| last.max(row)));
    }

    fn last_column(&self, row: usize) -> Option<usize> {
        self.cells
            .range((row, 0)..=(row, usize::MAX))
            .map(|((_, col), _)| *col)
            .max()
    }
}

/// Text of a loaded cell, close to what a spreadsheet shows
///
/// Whole numbers drop their fraction, booleans read `TRUE`/`FALSE` and dates
/// are rendered as `YYYY-MM-DD`, with `HH:MM:SS` added when a time is set.
fn cell_text(value: &Data) -> String {
    let rendered = match value {
        Data::Bool(true) => Some("TRUE".to_string()),
        Data::Bool(false) => Some("FALSE".to_string()),
        Data::DateTime(datetime) => excel_datetime_text(datetime),
        Data::DateTimeIso(_) => value.as_datetime().map(|naive| datetime_text(naive, false)),
        _ => None,
    };
    rendered.unwrap_or_else(|| value.to_string())
}

fn excel_datetime_text(datetime: &ExcelDateTime) -> Option<String> {
    if datetime.is_duration() {
        return None;
    }
    let naive = datetime.as_datetime()?;
    Some(datetime_text(naive, datetime.as_f64() < 1.0))
}

fn datetime_text(naive: NaiveDateTime, time_only: bool) -> String {
    let pattern = if time_only {
        "%H:%M:%S"
    } else if naive.time().num_seconds_from_midnight() == 0 {
        "%Y-%m-%d"
    } else {
        "%Y-%m-%d %H:%M:%S"
    };
    naive.format(pattern).to_string()
}

#[derive(Debug, Clone, Default)]
struct WorkbookData {
    sheets: Vec<SheetData>,
    palette: HashMap<u8, u32>,
}

impl WorkbookData {
    fn load(file: &Path) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook(file)?;
        workbook.load_merged_regions()?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name)?;
            let mut sheet = SheetData::new(&name);
            let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

            for (row, col, value) in range.used_cells() {
                let row = row + row_offset as usize;
                let col = col + col_offset as usize;
                sheet.cells.insert(
                    (row, col),
                    CellData {
                        value: cell_text(value),
                        ..Default::default()
                    },
                );
                sheet.touch_row(row);
            }

            for (_, _, dims) in workbook.merged_regions_by_sheet(&name) {
                sheet.merges.push(MergedRegion {
                    first_row: dims.start.0 as usize,
                    first_col: dims.start.1 as usize,
                    last_row: dims.end.0 as usize,
                    last_col: dims.end.1 as usize,
                });
            }

            sheets.push(sheet);
        }

        Ok(Self {
            sheets,
            palette: HashMap::new(),
        })
    }

    fn save(&self, file: &Path) -> Result<()> {
        let mut workbook = Workbook::new();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name.as_str())?;

            for ((row, col), cell) in &sheet.cells {
                let (row, col) = to_xlsx_position(*row, *col)?;
                let format = cell
                    .formatting
                    .as_ref()
                    .map(|f| f.to_format(&self.palette, sheet.bordered));

                match (&cell.hyperlink, &format) {
                    (Some(link), Some(format)) => {
                        let url = Url::new(format!("file:///{}", link)).set_text(cell.value.as_str());
                        worksheet.write_url_with_format(row, col, url, format)?;
                    }
                    (Some(link), None) => {
                        let url = Url::new(format!("file:///{}", link)).set_text(cell.value.as_str());
                        worksheet.write_url(row, col, url)?;
                    }
                    (None, Some(format)) => {
                        worksheet.write_string_with_format(row, col, cell.value.as_str(), format)?;
                    }
                    (None, None) => {
                        worksheet.write_string(row, col, cell.value.as_str())?;
                    }
                }
            }

            for region in &sheet.merges {
                let (first_row, first_col) = to_xlsx_position(region.first_row, region.first_col)?;
                let (last_row, last_col) = to_xlsx_position(region.last_row, region.last_col)?;
                let anchor = sheet.cells.get(&(region.first_row, region.first_col));
                let format = anchor
                    .and_then(|c| c.formatting.as_ref())
                    .map(|f| f.to_format(&self.palette, sheet.bordered))
                    .unwrap_or_default();
                let text = anchor.map(|c| c.value.as_str()).unwrap_or("");
                worksheet.merge_range(first_row, first_col, last_row, last_col, text, &format)?;
            }

            if sheet.auto_fit {
                worksheet.autofit();
            }
        }

        workbook.save(file)?;
        Ok(())
    }
}

fn to_xlsx_position(row: usize, col: usize) -> Result<(u32, u16)> {
    let row = u32::try_from(row)
        .map_err(|_| AutopiaError::framework(format!("Row index {} is out of range", row)))?;
    let col = u16::try_from(col)
        .map_err(|_| AutopiaError::framework(format!("Column index {} is out of range", col)))?;
    Ok((row, col))
}

/// Access to one `.xlsx` workbook and its current datasheet
///
/// Rows and columns are zero-based. The workbook is read from disk on first
/// use and kept in memory; changes are persisted with [`save`](Self::save).
#[derive(Debug)]
pub struct ExcelDataAccess {
    file_path: PathBuf,
    file_name: String,
    datasheet: Option<String>,
    workbook: Option<WorkbookData>,
}

impl ExcelDataAccess {
    pub fn new(file_path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            file_name: file_name.into(),
            datasheet: None,
            workbook: None,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the workbook file
    pub fn file(&self) -> PathBuf {
        self.file_path
            .join(format!("{}.{}", self.file_name, EXCEL_EXTENSION))
    }

    pub fn datasheet_name(&self) -> Option<&str> {
        self.datasheet.as_deref()
    }

    pub fn set_datasheet_name(&mut self, datasheet: impl Into<String>) {
        self.datasheet = Some(datasheet.into());
    }

    /// Create a new empty workbook, replacing any existing file
    pub fn create_workbook(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.file_path)?;
        self.workbook = Some(WorkbookData::default());
        self.datasheet = None;
        info!(file = %self.file().display(), "Created workbook");
        self.save()
    }

    fn workbook(&mut self) -> Result<&mut WorkbookData> {
        if self.workbook.is_none() {
            let file = self.file();
            if !file.exists() {
                error!(file = %file.display(), "Workbook not found");
                return Err(AutopiaError::framework(format!(
                    "The specified file \"{}\" does not exist!",
                    file.display()
                )));
            }
            debug!(file = %file.display(), "Loading workbook");
            self.workbook = Some(WorkbookData::load(&file)?);
        }

        match self.workbook.as_mut() {
            Some(workbook) => Ok(workbook),
            None => Err(AutopiaError::framework("Workbook is not loaded")),
        }
    }

    pub fn sheet_names(&mut self) -> Result<Vec<String>> {
        Ok(self
            .workbook()?
            .sheets
            .iter()
            .map(|s| s.name.clone())
            .collect())
    }

    /// Add a sheet and make it the current datasheet
    pub fn add_sheet(&mut self, name: &str) -> Result<()> {
        let workbook = self.workbook()?;
        if workbook.sheets.iter().any(|s| s.name == name) {
            return Err(AutopiaError::framework(format!(
                "The sheet \"{}\" already exists!",
                name
            )));
        }
        workbook.sheets.push(SheetData::new(name));
        self.datasheet = Some(name.to_string());
        Ok(())
    }

    fn sheet(&mut self) -> Result<&mut SheetData> {
        let datasheet = match &self.datasheet {
            Some(name) => name.clone(),
            None => {
                error!("Datasheet name is not set");
                return Err(AutopiaError::framework("The datasheet name is not set!"));
            }
        };
        let file_name = format!("{}.{}", self.file_name, EXCEL_EXTENSION);

        let workbook = self.workbook()?;
        match workbook.sheets.iter_mut().find(|s| s.name == datasheet) {
            Some(sheet) => Ok(sheet),
            None => {
                error!(sheet = %datasheet, file = %file_name, "Sheet not found");
                Err(AutopiaError::autopia(format!(
                    "The specified sheet \"{}\" does not exist within the workbook \"{}\"",
                    datasheet, file_name
                )))
            }
        }
    }

    /// Row index of the first cell in `column` equal to `key`, scanning from `start_row`
    pub fn row_num(&mut self, key: &str, column: usize, start_row: usize) -> Result<Option<usize>> {
        let sheet = self.sheet()?;
        let last_row = match sheet.last_row {
            Some(last) => last,
            None => return Ok(None),
        };

        Ok((start_row..=last_row).find(|row| sheet.value(*row, column) == key))
    }

    /// Index of the last row in the datasheet (0 for an empty sheet)
    pub fn last_row_num(&mut self) -> Result<usize> {
        Ok(self.sheet()?.last_row.unwrap_or(0))
    }

    /// Append a row after the last row and return its index
    pub fn add_row(&mut self) -> Result<usize> {
        let sheet = self.sheet()?;
        let row = sheet.last_row.map_or(0, |last| last + 1);
        sheet.touch_row(row);
        Ok(row)
    }

    /// Column index of `header` within `row`
    pub fn column_num(&mut self, header: &str, row: usize) -> Result<Option<usize>> {
        let sheet = self.sheet()?;
        Ok(sheet
            .cells
            .range((row, 0)..=(row, usize::MAX))
            .find(|(_, cell)| cell.value == header)
            .map(|((_, col), _)| *col))
    }

    /// Column index of `header` in the header row, or an error naming the sheet
    pub fn header_column(&mut self, header: &str) -> Result<usize> {
        match self.column_num(header, 0)? {
            Some(col) => Ok(col),
            None => {
                let datasheet = self.datasheet.clone().unwrap_or_default();
                error!(header, sheet = %datasheet, "Column header not found");
                Err(AutopiaError::autopia(format!(
                    "The specified column header \"{}\" is not found in the sheet \"{}\"!",
                    header, datasheet
                )))
            }
        }
    }

    pub fn value_at(&mut self, row: usize, column: usize) -> Result<String> {
        Ok(self.sheet()?.value(row, column).to_string())
    }

    /// Value in `row` under the column headed `header` (headers live in row 0)
    pub fn value(&mut self, row: usize, header: &str) -> Result<String> {
        let column = self.header_column(header)?;
        self.value_at(row, column)
    }

    pub fn set_value_at(
        &mut self,
        row: usize,
        column: usize,
        value: &str,
        formatting: Option<&ExcelCellFormatting>,
    ) -> Result<()> {
        let sheet = self.sheet()?;
        let cell = sheet.cells.entry((row, column)).or_default();
        cell.value = value.to_string();
        if let Some(formatting) = formatting {
            cell.formatting = Some(formatting.clone());
        }
        sheet.touch_row(row);
        Ok(())
    }

    pub fn set_value(
        &mut self,
        row: usize,
        header: &str,
        value: &str,
        formatting: Option<&ExcelCellFormatting>,
    ) -> Result<()> {
        let column = self.header_column(header)?;
        self.set_value_at(row, column, value, formatting)
    }

    /// Append a column header to row 0 and return its index
    pub fn add_column(
        &mut self,
        header: &str,
        formatting: Option<&ExcelCellFormatting>,
    ) -> Result<usize> {
        let column = self.sheet()?.last_column(0).map_or(0, |last| last + 1);
        self.set_value_at(0, column, header, formatting)?;
        Ok(column)
    }

    pub fn merge_cells(
        &mut self,
        first_row: usize,
        last_row: usize,
        first_col: usize,
        last_col: usize,
    ) -> Result<()> {
        let region = MergedRegion {
            first_row,
            last_row,
            first_col,
            last_col,
        };
        let sheet = self.sheet()?;
        if !sheet.merges.contains(&region) {
            sheet.merges.push(region);
        }
        Ok(())
    }

    /// Link the cell at `row`/`column` to a file relative to the workbook
    pub fn set_hyperlink(&mut self, row: usize, column: usize, link: &str) -> Result<()> {
        let sheet = self.sheet()?;
        sheet.cells.entry((row, column)).or_default().hyperlink = Some(link.to_string());
        sheet.touch_row(row);
        Ok(())
    }

    /// Register `hex` (`#RRGGBB`) under a custom palette index
    pub fn set_custom_palette_color(&mut self, index: u8, hex: &str) -> Result<()> {
        let index = validate_palette_index(index)?;
        let rgb = parse_hex_color(hex)?;
        self.workbook()?.palette.insert(index, rgb);
        Ok(())
    }

    pub fn palette_color(&mut self, index: u8) -> Result<Option<u32>> {
        Ok(self.workbook()?.palette.get(&index).copied())
    }

    /// Size the datasheet's columns to their contents when saved
    pub fn auto_fit_contents(&mut self) -> Result<()> {
        self.sheet()?.auto_fit = true;
        Ok(())
    }

    /// Draw thin borders around the formatted cells of the datasheet when saved
    pub fn add_borders(&mut self) -> Result<()> {
        self.sheet()?.bordered = true;
        Ok(())
    }

    /// Merged regions of the datasheet as `(first_row, last_row, first_col, last_col)`
    pub fn merged_regions(&mut self) -> Result<Vec<(usize, usize, usize, usize)>> {
        Ok(self
            .sheet()?
            .merges
            .iter()
            .map(|m| (m.first_row, m.last_row, m.first_col, m.last_col))
            .collect())
    }

    pub fn hyperlink(&mut self, row: usize, column: usize) -> Result<Option<String>> {
        Ok(self
            .sheet()?
            .cells
            .get(&(row, column))
            .and_then(|c| c.hyperlink.clone()))
    }

    /// Write the in-memory workbook to disk
    pub fn save(&mut self) -> Result<()> {
        let file = self.file();
        let workbook = self.workbook()?;
        workbook.save(&file)?;
        debug!(file = %file.display(), "Saved workbook");
        Ok(())
    }

    /// Drop the in-memory copy so the next access re-reads the file
    pub fn reload(&mut self) {
        self.workbook = None;
    }
}
