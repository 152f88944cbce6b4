//! Trade table extraction
//!
//! Finds the trades table on a listing page and turns each body row into a
//! [`TradeRecord`]. A missing table or a short row is never an error; it only
//! reduces what the page yields.

use crate::storage::TradeRecord;
use scraper::{ElementRef, Html, Selector};

/// Class signature of the trades table
pub const TABLE_SELECTOR: &str = "table.w-full.caption-bottom.text-size-3.text-txt";

const ROW_SELECTOR: &str = "tbody tr";
const CELL_SELECTOR: &str = "td";

/// Number of cells a row must have to become a record
pub const FIELD_COUNT: usize = 9;

/// Non-fatal conditions noticed while extracting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// The page has no trades table
    TableNotFound,

    /// A body row had too few cells (zero-based row position, cell count)
    MalformedRow { row: usize, cells: usize },
}

/// Records found on one page, in document order
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<TradeRecord>,
    pub warnings: Vec<ParseWarning>,
}

impl Extraction {
    /// True unless the trades table was missing
    pub fn table_found(&self) -> bool {
        !self.warnings.contains(&ParseWarning::TableNotFound)
    }

    pub fn malformed_rows(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ParseWarning::MalformedRow { .. }))
            .count()
    }
}

/// Extracts trade records from a parsed listing page
///
/// Rows with fewer than nine cells are skipped; cells beyond the ninth are
/// ignored. The transaction type is lowercased.
pub fn extract_records(document: &Html) -> Extraction {
    let mut extraction = Extraction::default();

    let (Ok(table_selector), Ok(row_selector), Ok(cell_selector)) = (
        Selector::parse(TABLE_SELECTOR),
        Selector::parse(ROW_SELECTOR),
        Selector::parse(CELL_SELECTOR),
    ) else {
        extraction.warnings.push(ParseWarning::TableNotFound);
        return extraction;
    };

    let Some(table) = document.select(&table_selector).next() else {
        tracing::warn!("Could not find the main trades table");
        extraction.warnings.push(ParseWarning::TableNotFound);
        return extraction;
    };

    for (position, row) in table.select(&row_selector).enumerate() {
        let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();

        if cells.len() < FIELD_COUNT {
            tracing::debug!(
                "Skipping row {} with {} of {} cells",
                position,
                cells.len(),
                FIELD_COUNT
            );
            extraction.warnings.push(ParseWarning::MalformedRow {
                row: position,
                cells: cells.len(),
            });
            continue;
        }

        if let Some(record) = TradeRecord::from_cells(&cells[..FIELD_COUNT]) {
            extraction.records.push(record);
        }
    }

    extraction
}

/// Text of a cell: each text fragment trimmed, empty fragments dropped, the
/// rest joined without separators
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}
