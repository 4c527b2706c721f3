//! Spreadsheet export and the one-way remote sheet sync.

pub mod sheet;
pub mod sync;

pub use sheet::{
    export_file_name, resident_table, transaction_table, write_csv, write_table, write_xlsx, Cell,
    ExportError, ExportFormat, ExportKind, SheetTable, RESIDENT_HEADERS, TRANSACTION_HEADERS,
};
pub use sync::{parse_endpoint, SheetSyncClient, SyncError, SyncPayload, SyncRow};
