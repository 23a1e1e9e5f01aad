pub mod config;
pub mod error;
pub mod logo;
pub mod pdf;
pub mod sheet;
pub mod storage;
pub mod store;

pub use config::{Company, Config, PdfSettings};
pub use error::{ExpenseError, Result};
pub use pdf::{export_report, ReportSnapshot};
pub use sheet::{ExpenseRow, ReportMeta, Sheet};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{Settings, Store};
