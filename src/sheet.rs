use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, Result};
use crate::storage::{Storage, SHEET_KEY};

/// A single expense line. Amounts are kept as entered text so the sheet
/// round-trips exactly what the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpenseRow {
    pub date: String,
    pub description: String,
    pub merchant: String,
    pub amount: String,
}

impl Default for ExpenseRow {
    fn default() -> Self {
        Self {
            date: String::new(),
            description: String::new(),
            merchant: String::new(),
            amount: "0.00".into(),
        }
    }
}

impl ExpenseRow {
    /// A row is blank when every field is empty and the amount is the
    /// untouched `0.00`. Blank rows are kept in the sheet but skipped
    /// when rendering.
    pub fn is_blank(&self) -> bool {
        self.date.is_empty()
            && self.description.is_empty()
            && self.merchant.is_empty()
            && self.amount == "0.00"
    }

    pub fn amount_value(&self) -> f64 {
        self.amount.trim().parse().unwrap_or(0.0)
    }
}

/// Report-level fields shown in the details block under the header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportMeta {
    pub submitted_by: String,
    pub submitted_on: String,
    pub report_to: String,
    pub period_from: String,
    pub period_to: String,
    pub report_title: String,
    pub business_purpose: String,
}

/// The expense data itself: the line-item rows plus the report metadata.
/// Persisted under its own key, independently of the customization tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sheet {
    pub rows: Vec<ExpenseRow>,
    pub meta: ReportMeta,
}

impl Default for Sheet {
    fn default() -> Self {
        Self {
            rows: vec![ExpenseRow::default(); 3],
            meta: ReportMeta::default(),
        }
    }
}

impl Sheet {
    /// Load the saved sheet, falling back to an empty three-row sheet
    /// when nothing is saved or the blob is unreadable.
    pub fn load(storage: &Arc<dyn Storage>) -> Self {
        match storage.get(SHEET_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(sheet) => sheet,
                Err(e) => {
                    warn!("failed to parse saved expense data, starting fresh: {e}");
                    Sheet::default()
                }
            },
            Ok(None) => Sheet::default(),
            Err(e) => {
                warn!("failed to load saved expense data, starting fresh: {e}");
                Sheet::default()
            }
        }
    }

    pub fn save(&self, storage: &Arc<dyn Storage>) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        storage.put(SHEET_KEY, &raw)
    }

    /// Mutable access to a row by its 1-based position.
    pub fn row_mut(&mut self, position: usize) -> Result<&mut ExpenseRow> {
        if position == 0 || position > self.rows.len() {
            return Err(ExpenseError::RowNotFound(position));
        }
        Ok(&mut self.rows[position - 1])
    }

    pub fn push_row(&mut self, row: ExpenseRow) {
        self.rows.push(row);
    }

    /// Sum of all row amounts, blank rows included (they contribute zero).
    pub fn total(&self) -> f64 {
        self.rows.iter().map(ExpenseRow::amount_value).sum()
    }

    pub fn total_text(&self) -> String {
        format!("{:.2}", self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn memory() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn fresh_sheet_has_three_blank_rows() {
        let sheet = Sheet::default();
        assert_eq!(sheet.rows.len(), 3);
        assert!(sheet.rows.iter().all(ExpenseRow::is_blank));
        assert_eq!(sheet.total_text(), "0.00");
    }

    #[test]
    fn blank_detection_requires_untouched_amount() {
        let mut row = ExpenseRow::default();
        assert!(row.is_blank());
        row.amount = "0.000".into();
        assert!(!row.is_blank());
        row.amount = "0.00".into();
        row.merchant = "Acme".into();
        assert!(!row.is_blank());
    }

    #[test]
    fn row_positions_are_one_based() {
        let mut sheet = Sheet::default();
        sheet.row_mut(1).unwrap().merchant = "Acme".into();
        assert_eq!(sheet.rows[0].merchant, "Acme");
        assert!(matches!(sheet.row_mut(0), Err(ExpenseError::RowNotFound(0))));
        assert!(matches!(sheet.row_mut(4), Err(ExpenseError::RowNotFound(4))));
    }

    #[test]
    fn total_ignores_unparsable_amounts() {
        let mut sheet = Sheet::default();
        sheet.rows[0].amount = "12.50".into();
        sheet.rows[1].amount = "oops".into();
        sheet.rows[2].amount = "7.5".into();
        assert_eq!(sheet.total_text(), "20.00");
    }

    #[test]
    fn save_load_round_trip() {
        let storage = memory();
        let mut sheet = Sheet::default();
        sheet.rows[0] = ExpenseRow {
            date: "2026-02-03".into(),
            description: "Team lunch".into(),
            merchant: "Cafe Rio".into(),
            amount: "42.75".into(),
        };
        sheet.meta.submitted_by = "Jordan Fisher".into();
        sheet.save(&storage).unwrap();

        assert_eq!(Sheet::load(&storage), sheet);
    }

    #[test]
    fn corrupt_saved_sheet_falls_back_to_default() {
        let storage = memory();
        storage.put(SHEET_KEY, "not json").unwrap();
        assert_eq!(Sheet::load(&storage), Sheet::default());
    }
}
