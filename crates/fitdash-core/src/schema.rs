//! Column-mapping configuration for the training-log table.
//!
//! The raw spreadsheet is hand-maintained, so header spellings drift
//! over time (`Protein` vs `Protein (g)`, a renamed conditioning
//! column). Rather than hard-coding positions, every logical field
//! carries an ordered list of accepted header spellings and is resolved
//! against the actual header row at load time.

use crate::error::{FitdashError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Logical fields of the daily training log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogField {
    /// Calendar day of the entry.
    Date,
    /// Training-week label.
    Week,
    /// Morning body weight.
    Weight,
    /// Calories eaten.
    Calories,
    /// Protein eaten.
    Protein,
    /// Daily step count.
    Steps,
    /// Lifting-session description.
    Workout,
    /// Conditioning entry.
    Conditioning,
}

impl LogField {
    /// Every logical field, in canonical table order.
    pub const ALL: [LogField; 8] = [
        LogField::Date,
        LogField::Week,
        LogField::Weight,
        LogField::Calories,
        LogField::Protein,
        LogField::Steps,
        LogField::Workout,
        LogField::Conditioning,
    ];

    /// Canonical display name of the field.
    pub fn name(self) -> &'static str {
        match self {
            LogField::Date => "Date",
            LogField::Week => "Week",
            LogField::Weight => "Weight",
            LogField::Calories => "Calories",
            LogField::Protein => "Protein",
            LogField::Steps => "Steps",
            LogField::Workout => "Workout",
            LogField::Conditioning => "Conditioning",
        }
    }

    /// Whether loading fails when the field cannot be resolved.
    ///
    /// Conditioning is the one column the log only gained partway
    /// through, so older exports legitimately lack it.
    pub fn is_required(self) -> bool {
        !matches!(self, LogField::Conditioning)
    }
}

/// True for header cells that name no real column: blank cells and the
/// `Unnamed: N` placeholders spreadsheet exports insert for stray
/// index columns.
pub fn is_synthetic_header(header: &str) -> bool {
    let trimmed = header.trim();
    if trimmed.is_empty() {
        return true;
    }
    let re = Regex::new(r"^Unnamed(: *\d+)?$").expect("regex is valid");
    re.is_match(trimmed)
}

/// Ordered header spellings accepted for each logical field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMap {
    headers: HashMap<LogField, Vec<String>>,
}

impl Default for ColumnMap {
    /// The spellings the real log has used across its lifetime.
    fn default() -> Self {
        let mut map = ColumnMap {
            headers: HashMap::new(),
        };
        for field in LogField::ALL {
            map.headers.insert(field, vec![field.name().to_string()]);
        }
        map.add_alias(LogField::Weight, "Weight (lb)");
        map.add_alias(LogField::Protein, "Protein (g)");
        map.add_alias(
            LogField::Conditioning,
            "Conditioning (cal estimated using apps)",
        );
        map
    }
}

impl ColumnMap {
    /// The accepted spellings for a field, in match-priority order.
    pub fn headers_for(&self, field: LogField) -> &[String] {
        self.headers.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the accepted spellings for a field with a single header.
    pub fn set_header(&mut self, field: LogField, header: impl Into<String>) {
        self.headers.insert(field, vec![header.into()]);
    }

    /// Append another accepted spelling for a field.
    pub fn add_alias(&mut self, field: LogField, header: impl Into<String>) {
        let header = header.into();
        let spellings = self.headers.entry(field).or_default();
        if !spellings.contains(&header) {
            spellings.push(header);
        }
    }

    /// Resolve every logical field against an actual header row.
    ///
    /// Matching is exact on the trimmed header cell, first matching
    /// column wins. Returns [`FitdashError::MissingColumn`] for the
    /// first required field that no header cell satisfies, and
    /// [`FitdashError::EmptyTable`] when no header cell names a real
    /// column (a missing header row, or one that is all blanks and
    /// `Unnamed: N` placeholders).
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns> {
        if headers.iter().all(|h| is_synthetic_header(h)) {
            return Err(FitdashError::EmptyTable);
        }
        let find = |field: LogField| -> Option<usize> {
            let spellings = self.headers_for(field);
            headers
                .iter()
                .position(|h| spellings.iter().any(|s| s == h.trim()))
        };
        let require = |field: LogField| -> Result<usize> {
            find(field).ok_or_else(|| FitdashError::MissingColumn {
                field: field.name(),
                expected: self.headers_for(field).join(", "),
            })
        };

        Ok(ResolvedColumns {
            date: require(LogField::Date)?,
            week: require(LogField::Week)?,
            weight: require(LogField::Weight)?,
            calories: require(LogField::Calories)?,
            protein: require(LogField::Protein)?,
            steps: require(LogField::Steps)?,
            workout: require(LogField::Workout)?,
            conditioning: find(LogField::Conditioning),
        })
    }
}

/// Column indices of every logical field in one concrete table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub date: usize,
    pub week: usize,
    pub weight: usize,
    pub calories: usize,
    pub protein: usize,
    pub steps: usize,
    pub workout: usize,
    /// `None` when the table predates the conditioning column.
    pub conditioning: Option<usize>,
}
