//! Spreadsheet input and output.

use crate::error::{Result, ScraperError};
use crate::flatten::ProceedingRow;
use crate::optout::{OptOutRow, OptOutTables};
use calamine::{open_workbook, Reader, Xlsx};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the patent-number column from the first worksheet of an input
/// workbook. A leading "Patent Number" header cell is skipped; values are
/// trimmed and blank cells ignored.
pub fn read_patent_numbers(path: &Path) -> Result<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ScraperError::Input(format!("{} has no worksheets", path.display())))??;

    let mut numbers = Vec::new();
    for (index, row) in range.rows().enumerate() {
        let Some(cell) = row.first() else { continue };
        let value = cell.to_string().trim().to_string();
        if value.is_empty() {
            continue;
        }
        if index == 0 && value.eq_ignore_ascii_case("patent number") {
            continue;
        }
        numbers.push(value);
    }

    if numbers.is_empty() {
        return Err(ScraperError::Input(format!(
            "{} contains no patent numbers",
            path.display()
        )));
    }
    Ok(numbers)
}

/// Writes the opt-out workbook: "Latest" sheet first, "Historical" second.
/// Returns the path of the written file.
pub fn write_opt_outs(output_dir: &Path, tables: &OptOutTables) -> Result<PathBuf> {
    let path = timestamped_path(output_dir)?;
    let mut workbook = Workbook::new();

    let latest = workbook.add_worksheet().set_name("Latest")?;
    write_sheet(latest, &OptOutRow::COLUMNS, tables.latest.iter().map(OptOutRow::values))?;

    let historical = workbook.add_worksheet().set_name("Historical")?;
    write_sheet(
        historical,
        &OptOutRow::COLUMNS,
        tables.historical.iter().map(OptOutRow::values),
    )?;

    workbook.save(&path)?;
    Ok(path)
}

/// Writes the proceedings workbook: a single sheet in the published
/// column order. Returns the path of the written file.
pub fn write_proceedings(output_dir: &Path, rows: &[ProceedingRow]) -> Result<PathBuf> {
    let path = timestamped_path(output_dir)?;
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    write_sheet(sheet, &ProceedingRow::COLUMNS, rows.iter().map(ProceedingRow::values))?;

    workbook.save(&path)?;
    Ok(path)
}

/// Output filename carries the run timestamp, matching the established
/// `YYYY-MM-DD HHMM.xlsx` naming.
fn timestamped_path(output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    Ok(output_dir.join(format!("{}.xlsx", Local::now().format("%Y-%m-%d %H%M"))))
}

/// Header row followed by data rows. No index column.
fn write_sheet<'a, const N: usize>(
    sheet: &mut Worksheet,
    columns: &[&str; N],
    rows: impl Iterator<Item = [&'a str; N]>,
) -> Result<()> {
    for (col, header) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (row_index, row) in rows.enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet.write_string(row_index as u32 + 1, col as u16, *value)?;
        }
    }
    Ok(())
}
