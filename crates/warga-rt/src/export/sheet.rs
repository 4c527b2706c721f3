use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::registry::domain::{Resident, Transaction};

pub const RESIDENT_HEADERS: [&str; 8] = [
    "NIK",
    "Nama Lengkap",
    "Jenis Kelamin",
    "Tanggal Lahir",
    "Alamat",
    "Pekerjaan",
    "Status Perkawinan",
    "No. Telepon",
];

pub const TRANSACTION_HEADERS: [&str; 5] =
    ["Tanggal", "Keterangan", "Kategori", "Jenis", "Jumlah (Rp)"];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn as_csv_field(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => format!("{value}"),
        }
    }
}

/// One worksheet worth of rows under fixed headers.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

/// Which dataset an export file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Residents,
    Transactions,
}

impl ExportKind {
    const fn file_prefix(self) -> &'static str {
        match self {
            Self::Residents => "Data_Warga_RT",
            Self::Transactions => "Data_Kas_RT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("xlsx writer failed: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("csv writer failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// `Data_Warga_RT_2026-10-18.xlsx` and friends.
pub fn export_file_name(kind: ExportKind, format: ExportFormat, on: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        kind.file_prefix(),
        on.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn resident_table(residents: &[Resident]) -> SheetTable {
    let rows = residents
        .iter()
        .map(|resident| {
            vec![
                Cell::text(&resident.nik),
                Cell::text(&resident.full_name),
                Cell::text(resident.gender.label()),
                Cell::text(resident.birth_date.format("%Y-%m-%d").to_string()),
                Cell::text(&resident.address),
                Cell::text(&resident.occupation),
                Cell::text(resident.marital_status.label()),
                Cell::text(&resident.phone_number),
            ]
        })
        .collect();

    SheetTable {
        sheet_name: "Warga",
        headers: &RESIDENT_HEADERS,
        rows,
    }
}

pub fn transaction_table(transactions: &[Transaction]) -> SheetTable {
    let rows = transactions
        .iter()
        .map(|transaction| {
            vec![
                Cell::text(transaction.date.format("%Y-%m-%d").to_string()),
                Cell::text(&transaction.description),
                Cell::text(&transaction.category),
                Cell::text(transaction.kind.label()),
                Cell::Number(transaction.amount as f64),
            ]
        })
        .collect();

    SheetTable {
        sheet_name: "Kas",
        headers: &TRANSACTION_HEADERS,
        rows,
    }
}

pub fn write_table(table: &SheetTable, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Xlsx => write_xlsx(table),
        ExportFormat::Csv => write_csv(table),
    }
}

/// Single-sheet workbook with a bold header row.
pub fn write_xlsx(table: &SheetTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(table.sheet_name)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = (index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string(row_number, col as u16, value.as_str())?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(row_number, col as u16, *value)?;
                }
            }
        }
    }
    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

pub fn write_csv(table: &SheetTable) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers.iter())?;
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::as_csv_field))?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::seed::{demo_residents, demo_transactions};

    #[test]
    fn resident_rows_follow_header_order() {
        let table = resident_table(&demo_residents());
        assert_eq!(table.headers, &RESIDENT_HEADERS);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(
            table.rows[0],
            vec![
                Cell::text("3171012001900001"),
                Cell::text("Budi Santoso"),
                Cell::text("Laki-laki"),
                Cell::text("1980-05-15"),
                Cell::text("Jl. Merpati No. 4"),
                Cell::text("Wiraswasta"),
                Cell::text("Kawin"),
                Cell::text("081234567890"),
            ]
        );
    }

    #[test]
    fn transaction_rows_use_indonesian_type_labels() {
        let table = transaction_table(&demo_transactions());
        assert_eq!(table.sheet_name, "Kas");
        assert_eq!(table.rows[2][3], Cell::text("Pengeluaran"));
        assert_eq!(table.rows[2][4], Cell::Number(350_000.0));
    }

    #[test]
    fn csv_output_starts_with_headers() {
        let bytes = write_csv(&resident_table(&demo_residents())).expect("csv");
        let text = String::from_utf8(bytes).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("NIK,Nama Lengkap,Jenis Kelamin,Tanggal Lahir,Alamat,Pekerjaan,Status Perkawinan,No. Telepon")
        );
        assert_eq!(lines.count(), 5);
    }

    #[test]
    fn xlsx_output_is_a_zip_container() {
        let bytes = write_xlsx(&resident_table(&demo_residents())).expect("xlsx");
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_registry_still_exports_headers() {
        let bytes = write_csv(&resident_table(&[])).expect("csv");
        assert_eq!(String::from_utf8(bytes).expect("utf8").lines().count(), 1);
    }

    #[test]
    fn file_names_carry_the_export_date() {
        let on = NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        assert_eq!(
            export_file_name(ExportKind::Residents, ExportFormat::Xlsx, on),
            "Data_Warga_RT_2026-10-18.xlsx"
        );
        assert_eq!(
            export_file_name(ExportKind::Transactions, ExportFormat::Csv, on),
            "Data_Kas_RT_2026-10-18.csv"
        );
    }
}
