//! Date-indexed cashflow tables.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use cashmatch_core::Date;

use crate::error::{PortfolioError, PortfolioResult};

/// Column name of the liability schedule in a unified table.
pub const TARGET_COLUMN: &str = "target";

/// A date × column table of amounts.
///
/// Rows are in strictly ascending date order and every row has one value per
/// column. Bond columns are keyed by instrument id; a unified table also
/// carries [`TARGET_COLUMN`] first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CashflowTable {
    dates: Vec<Date>,
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl CashflowTable {
    /// Creates a table, checking shape and date order.
    ///
    /// # Errors
    ///
    /// Returns `PortfolioError::DimensionMismatch` if the row count differs
    /// from the date count or a row has the wrong width, and
    /// `PortfolioError::InvalidPortfolio` if dates are not strictly ascending.
    pub fn new(dates: Vec<Date>, columns: Vec<String>, rows: Vec<Vec<f64>>) -> PortfolioResult<Self> {
        if rows.len() != dates.len() {
            return Err(PortfolioError::dimension_mismatch(
                "table rows",
                dates.len(),
                rows.len(),
            ));
        }
        if let Some(row) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(PortfolioError::dimension_mismatch(
                "table row width",
                columns.len(),
                row.len(),
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PortfolioError::invalid_portfolio(
                "table dates must be strictly ascending",
            ));
        }
        Ok(Self {
            dates,
            columns,
            rows,
        })
    }

    /// A table with columns but no rows.
    #[must_use]
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            dates: Vec::new(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Row dates, ascending.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row-major values.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of dates.
    pub fn nrows(&self) -> usize {
        self.dates.len()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// True if the table has no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of a column in date order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Values on a given date.
    pub fn row_for(&self, date: Date) -> Option<&[f64]> {
        let idx = self.dates.binary_search(&date).ok()?;
        Some(&self.rows[idx])
    }

    /// Value at a date and column.
    pub fn value(&self, date: Date, column: &str) -> Option<f64> {
        let col = self.column_index(column)?;
        self.row_for(date).map(|row| row[col])
    }

    /// Copies the values into a dense matrix.
    #[must_use]
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.nrows(), self.ncols(), |i, j| self.rows[i][j])
    }

    /// Splits a unified table into the target vector `Y` and bond matrix `C`.
    ///
    /// Bond columns keep their order; their names are returned alongside.
    ///
    /// # Errors
    ///
    /// Returns `PortfolioError::InvalidPortfolio` if there is no
    /// [`TARGET_COLUMN`].
    pub fn split_target(&self) -> PortfolioResult<(DVector<f64>, DMatrix<f64>, Vec<String>)> {
        let target = self.column_index(TARGET_COLUMN).ok_or_else(|| {
            PortfolioError::invalid_portfolio(format!("table has no '{TARGET_COLUMN}' column"))
        })?;

        let bond_cols: Vec<usize> = (0..self.ncols()).filter(|&j| j != target).collect();
        let names = bond_cols.iter().map(|&j| self.columns[j].clone()).collect();

        let y = DVector::from_fn(self.nrows(), |i, _| self.rows[i][target]);
        let c = DMatrix::from_fn(self.nrows(), bond_cols.len(), |i, k| {
            self.rows[i][bond_cols[k]]
        });
        Ok((y, c, names))
    }
}
