//! Audit workbook: what each provider's products sell for, and the profit
//! on each.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::CatalogError;
use crate::store::tmp_path;
use crate::types::PrivateCatalog;

const PRODUCTS_SHEET: &str = "Productos";
const PROFIT_SHEET: &str = "Ganancias";

/// `ganancias_ram_<dd-mm-YYYY>.xlsx`
#[must_use]
pub fn spreadsheet_file_name(date: NaiveDate) -> String {
    format!("ganancias_ram_{}.xlsx", date.format("%d-%m-%Y"))
}

/// Writes the audit workbook for `private` into `dir`.
///
/// # Errors
///
/// Returns [`CatalogError::Spreadsheet`] when the workbook cannot be built
/// or saved and [`CatalogError::Io`] when it cannot be moved into place.
pub fn write_spreadsheet(
    dir: &Path,
    private: &PrivateCatalog,
    date: NaiveDate,
) -> Result<PathBuf, CatalogError> {
    let path = dir.join(spreadsheet_file_name(date));
    std::fs::create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;

    let mut workbook = build_workbook(private)?;
    let tmp = tmp_path(&path);
    workbook.save(&tmp)?;
    std::fs::rename(&tmp, &path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        CatalogError::io(&path, e)
    })?;

    tracing::info!(path = %path.display(), rows = private.products.len(), "spreadsheet written");
    Ok(path)
}

fn build_workbook(private: &PrivateCatalog) -> Result<Workbook, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(PRODUCTS_SHEET)?;
    write_header(sheet, &["Descripción", "Precio Venta", "Proveedor"], &header)?;
    for (row, entry) in (1u32..).zip(&private.products) {
        sheet.write_string(row, 0, &entry.name)?;
        sheet.write_number(row, 1, f64::from(entry.price))?;
        sheet.write_string(row, 2, &entry.provider)?;
    }
    sheet.set_column_width(0, 48)?;
    sheet.set_column_width(2, 20)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(PROFIT_SHEET)?;
    write_header(
        sheet,
        &["Equipo", "Precio Venta", "Precio Costo", "Ganancia"],
        &header,
    )?;
    for (row, entry) in (1u32..).zip(&private.products) {
        sheet.write_string(row, 0, &entry.name)?;
        sheet.write_number(row, 1, f64::from(entry.price))?;
        sheet.write_number(row, 2, as_f64(entry.cost_price))?;
        sheet.write_number(row, 3, as_f64(entry.profit()))?;
    }
    sheet.set_column_width(0, 48)?;

    Ok(workbook)
}

fn write_header(sheet: &mut Worksheet, titles: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in (0u16..).zip(titles) {
        sheet.write_string_with_format(0, col, *title, format)?;
    }
    Ok(())
}

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
