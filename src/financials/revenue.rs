//! Locally persisted branch revenue figures.
//!
//! Revenue is entered by hand per branch and kept in a small JSON file
//! next to the process, never in the table store. A missing or damaged
//! file reads as an empty book.

use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{OpsError, OpsResult};
use crate::payroll::coerce_amount;

/// Branch name → revenue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueBook {
    path: Option<PathBuf>,
    revenues: BTreeMap<String, Decimal>,
}

impl RevenueBook {
    /// A book that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the book stored at `path`.
    ///
    /// Values may be numbers or numeric strings; anything else reads as zero.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let revenues = match fs::read_to_string(&path) {
            Ok(content) => parse_book(&path, &content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No revenue book yet, starting empty");
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path),
            revenues,
        }
    }

    /// Revenue recorded for a branch, zero when unset.
    pub fn revenue_for(&self, branch: &str) -> Decimal {
        self.revenues.get(branch).copied().unwrap_or(Decimal::ZERO)
    }

    /// Every recorded figure, by branch name.
    pub fn entries(&self) -> &BTreeMap<String, Decimal> {
        &self.revenues
    }

    /// Records a branch's revenue and saves the book.
    ///
    /// The figure is kept only once the file write succeeds; on failure the
    /// book is unchanged.
    pub fn set(&mut self, branch: impl Into<String>, revenue: Decimal) -> OpsResult<()> {
        let branch = branch.into();
        if branch.trim().is_empty() {
            return Err(OpsError::validation("branch", "Branch name is required"));
        }
        let mut staged = self.revenues.clone();
        staged.insert(branch, revenue);
        self.write(&staged)?;
        self.revenues = staged;
        Ok(())
    }

    /// Writes the book to its file, if it has one.
    pub fn save(&self) -> OpsResult<()> {
        self.write(&self.revenues)
    }

    fn write(&self, revenues: &BTreeMap<String, Decimal>) -> OpsResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_error = |message: String| OpsError::Io {
            path: path.display().to_string(),
            message,
        };
        let json = serde_json::to_string_pretty(revenues).map_err(|e| io_error(e.to_string()))?;
        fs::write(path, json).map_err(|e| io_error(e.to_string()))
    }
}

fn parse_book(path: &Path, content: &str) -> BTreeMap<String, Decimal> {
    match serde_json::from_str::<BTreeMap<String, Value>>(content) {
        Ok(raw) => raw
            .into_iter()
            .map(|(branch, value)| {
                let revenue = match value {
                    Value::Number(n) => coerce_amount(&n.to_string()),
                    Value::String(s) => coerce_amount(&s),
                    _ => Decimal::ZERO,
                };
                (branch, revenue)
            })
            .collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Revenue book is corrupt, starting empty");
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let book = RevenueBook::load(dir.path().join("branch_revenues.json"));
        assert!(book.entries().is_empty());
        assert_eq!(book.revenue_for("A"), Decimal::ZERO);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("branch_revenues.json");
        fs::write(&path, "{ this is not json").unwrap();

        let book = RevenueBook::load(&path);
        assert!(book.entries().is_empty());
    }

    #[test]
    fn test_set_persists_across_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("branch_revenues.json");

        let mut book = RevenueBook::load(&path);
        book.set("Colombo 03", Decimal::from(125000)).unwrap();
        book.set("Kandy", Decimal::new(995050, 2)).unwrap();

        let reloaded = RevenueBook::load(&path);
        assert_eq!(reloaded.revenue_for("Colombo 03"), Decimal::from(125000));
        assert_eq!(reloaded.revenue_for("Kandy"), Decimal::new(995050, 2));
    }

    #[test]
    fn test_lenient_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("branch_revenues.json");
        fs::write(&path, r#"{"A": "1500", "B": 2500, "C": "n/a", "D": null}"#).unwrap();

        let book = RevenueBook::load(&path);
        assert_eq!(book.revenue_for("A"), Decimal::from(1500));
        assert_eq!(book.revenue_for("B"), Decimal::from(2500));
        assert_eq!(book.revenue_for("C"), Decimal::ZERO);
        assert_eq!(book.revenue_for("D"), Decimal::ZERO);
    }

    #[test]
    fn test_failed_write_leaves_book_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("branch_revenues.json");

        let mut book = RevenueBook::load(&path);
        match book.set("A", Decimal::from(5000)) {
            Err(OpsError::Io { .. }) => {}
            other => panic!("Expected Io, got {:?}", other),
        }
        assert_eq!(book.revenue_for("A"), Decimal::ZERO);
        assert!(book.entries().is_empty());
    }

    #[test]
    fn test_blank_branch_is_rejected() {
        let mut book = RevenueBook::in_memory();
        assert!(book.set("  ", Decimal::ONE).unwrap_err().is_validation());
    }
}
