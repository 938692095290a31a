//! Spreadsheet export.
//!
//! The data is saved first and presentation formatting (column widths, header
//! style, wrapped links) is applied in a second save. If formatting fails the
//! unformatted file is kept.

use crate::error::ExportError;
use crate::exporters::Exporter;
use crate::results::{COLUMNS, ProductRecord};
use crate::utils;
use chrono::Local;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use std::fs;
use std::path::{Path, PathBuf};

/// Padding added to the widest value of each column
const WIDTH_PADDING: usize = 2;
/// Upper bound on a column's display width
const MAX_WIDTH: usize = 50;

/// Writes records to `scraped_products_<timestamp>.xlsx` in a directory
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    output_dir: PathBuf,
}

impl XlsxExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `records` to `path`, then format and save again
    pub fn write_to(&self, path: &Path, records: &[ProductRecord]) -> Result<(), ExportError> {
        let write_err = |source: XlsxError| ExportError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        write_rows(worksheet, records).map_err(write_err)?;
        workbook.save(path).map_err(write_err)?;
        ::log::info!("Saved {} products to {}", records.len(), path.display());

        if let Err(e) = format_and_save(&mut workbook, path, records) {
            ::log::warn!(
                "Formatting {} failed, keeping unformatted data: {}",
                path.display(),
                e
            );
        }
        Ok(())
    }
}

impl Exporter for XlsxExporter {
    fn export(&self, records: &[ProductRecord]) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self
            .output_dir
            .join(utils::timestamped_file_name(&Local::now(), "xlsx"));
        self.write_to(&path, records)?;
        Ok(path)
    }
}

/// Header row followed by one row per record. Empty fields are left blank.
fn write_rows(worksheet: &mut Worksheet, records: &[ProductRecord]) -> Result<(), XlsxError> {
    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.fields().iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row, col as u16, *value)?;
            }
        }
    }
    Ok(())
}

fn format_and_save(
    workbook: &mut Workbook,
    path: &Path,
    records: &[ProductRecord],
) -> Result<(), XlsxError> {
    let worksheet = workbook.worksheet_from_index(0)?;
    apply_formatting(worksheet, records)?;
    workbook.save(path)
}

fn apply_formatting(worksheet: &mut Worksheet, records: &[ProductRecord]) -> Result<(), XlsxError> {
    for (col, width) in column_widths(records).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    let header = Format::new().set_bold().set_align(FormatAlign::Center);
    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    let wrap = Format::new().set_text_wrap();
    let last = COLUMNS.len() - 1;
    for (i, record) in records.iter().enumerate() {
        let value = record.fields()[last];
        if !value.is_empty() {
            worksheet.write_string_with_format((i + 1) as u32, last as u16, value, &wrap)?;
        }
    }
    Ok(())
}

/// Display width of each column: widest value (header included) plus padding, capped
pub fn column_widths(records: &[ProductRecord]) -> [usize; 5] {
    let mut widths = COLUMNS.map(|header| header.chars().count());
    for record in records {
        for (width, value) in widths.iter_mut().zip(record.fields()) {
            *width = (*width).max(value.chars().count());
        }
    }
    widths.map(|w| (w + WIDTH_PADDING).min(MAX_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook};

    fn record(name: &str, image: &str, price: &str, rating: &str, link: &str) -> ProductRecord {
        ProductRecord::new(
            name.to_string(),
            image.to_string(),
            price.to_string(),
            rating.to_string(),
            link.to_string(),
        )
    }

    /// Rows of the first sheet as strings; blank cells read back as ""
    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_column_widths() {
        let records = vec![
            record("Short", "", "Rs. 99", "4.1", "https://a.example/p/1"),
            record(&"N".repeat(80), "", "", "", "https://a.example/p/2"),
        ];
        let widths = column_widths(&records);
        // Name capped, Image/Rating fall back to header width
        assert_eq!(widths, [50, 7, 8, 8, 23]);
    }

    #[test]
    fn test_column_widths_header_only() {
        assert_eq!(column_widths(&[]), [6, 7, 7, 8, 6]);
    }

    #[test]
    fn test_export_round_trip_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = XlsxExporter::new(dir.path());
        let records = vec![
            record(
                "Men Slim Fit Shirt",
                "https://assets.example/1.jpg",
                "Rs. 649",
                "4.2",
                "https://www.myntra.com/shirts/1/buy",
            ),
            record("", "", "", "", "https://www.myntra.com/shirts/2/buy"),
            record("Kurta", "", "Rs. 1,299", "", "https://www.myntra.com/kurtas/3/buy"),
        ];

        let path = exporter.export(&records).unwrap();
        assert!(path.exists());

        let rows = read_rows(&path);
        assert_eq!(rows[0], COLUMNS.map(String::from).to_vec());
        assert_eq!(rows.len(), records.len() + 1);
        for (row, record) in rows[1..].iter().zip(&records) {
            let expected: Vec<String> = record.fields().iter().map(|f| f.to_string()).collect();
            assert_eq!(row, &expected);
        }
    }

    /// Raw XML of one part of the saved package
    fn package_part(path: &Path, name: &str) -> String {
        use std::io::Read;
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut xml = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    /// Opening `<c>` tag of a cell, e.g. `<c r="A1" s="1" t="s">`
    fn cell_tag<'a>(sheet_xml: &'a str, cell: &str) -> &'a str {
        let start = sheet_xml
            .find(&format!("<c r=\"{}\"", cell))
            .unwrap_or_else(|| panic!("cell {cell} not written"));
        let end = start + sheet_xml[start..].find('>').unwrap();
        &sheet_xml[start..=end]
    }

    #[test]
    fn test_saved_file_is_formatted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formatted.xlsx");
        let records = vec![
            record("Shirt", "", "Rs. 499", "4.0", "https://www.myntra.com/shirts/1/buy"),
            record("Kurta", "", "Rs. 899", "", "https://www.myntra.com/kurtas/2/buy"),
        ];
        XlsxExporter::new(dir.path()).write_to(&path, &records).unwrap();

        let sheet = package_part(&path, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<cols>"));
        assert!(sheet.contains("customWidth=\"1\""));

        // Header cells and link cells carry a style, other data cells do not
        for header in ["A1", "B1", "C1", "D1", "E1"] {
            assert!(cell_tag(&sheet, header).contains(" s=\""), "{header}");
        }
        assert!(cell_tag(&sheet, "E2").contains(" s=\""));
        assert!(cell_tag(&sheet, "E3").contains(" s=\""));
        assert!(!cell_tag(&sheet, "A2").contains(" s=\""));
        assert!(!cell_tag(&sheet, "C3").contains(" s=\""));

        let styles = package_part(&path, "xl/styles.xml");
        assert!(styles.contains("<b/>"));
        assert!(styles.contains("horizontal=\"center\""));
        assert!(styles.contains("wrapText=\"1\""));
    }

    #[test]
    fn test_export_file_name_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = XlsxExporter::new(dir.path().join("out"));
        let path = exporter
            .export(&[record("A", "", "", "", "https://a.example/a")])
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("scraped_products_"));
        assert!(name.ends_with(".xlsx"));
        // scraped_products_ + YYYYMMDD_HHMMSS + .xlsx
        assert_eq!(name.len(), "scraped_products_".len() + 15 + ".xlsx".len());
        assert_eq!(path.parent().unwrap(), dir.path().join("out"));
    }

    #[test]
    fn test_export_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        let exporter = XlsxExporter::new(&blocker);
        let result = exporter.export(&[record("A", "", "", "", "https://a.example/a")]);
        assert!(matches!(result, Err(ExportError::OutputDir { .. })));
    }
}
