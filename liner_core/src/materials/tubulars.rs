//! Tubular Reference Table (API 5CT / API 5DP)
//!
//! Nominal dimensions for common casing, liner and drill pipe sizes. The
//! table is immutable once built: the built-in set is constructed on first
//! use and shared read-only, and a CSV-loaded table is an owned value passed
//! into whatever needs it. Nothing overwrites a table in place.
//!
//! ## CSV Format
//!
//! ```text
//! label,kind,od_in,id_in,weight_ppf,grade
//! 7in 26# P-110,Casing,7.0,6.276,26.0,P-110
//! ```
//!
//! ## Example
//!
//! ```rust
//! use liner_core::materials::tubulars::builtin_tubulars;
//!
//! let table = builtin_tubulars();
//! let liner = table.lookup("7in 26# P-110").unwrap();
//! assert_eq!(liner.od_in, 7.0);
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::units::parse_lenient_f64;

/// Tubular category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TubularKind {
    /// Casing or liner joint
    Casing,
    /// Drill pipe (nominal body dimensions)
    DrillPipe,
    /// Heavy-weight drill pipe
    HeavyWeight,
}

impl TubularKind {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TubularKind::Casing => "Casing / Liner",
            TubularKind::DrillPipe => "Drill Pipe",
            TubularKind::HeavyWeight => "Heavy-Weight Drill Pipe",
        }
    }
}

impl FromStr for TubularKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASING" | "LINER" => Ok(TubularKind::Casing),
            "DRILLPIPE" | "DRILL PIPE" | "DP" => Ok(TubularKind::DrillPipe),
            "HEAVYWEIGHT" | "HWDP" => Ok(TubularKind::HeavyWeight),
            other => Err(CalcError::invalid_input("kind", other, "Unknown tubular kind")),
        }
    }
}

impl std::fmt::Display for TubularKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One size entry in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubularSize {
    /// Lookup label (e.g., "7in 26# P-110")
    pub label: String,

    pub kind: TubularKind,

    /// Outer diameter (in)
    pub od_in: f64,

    /// Inner diameter (in)
    pub id_in: f64,

    /// Nominal weight (lb/ft)
    pub weight_ppf: f64,

    /// Steel grade, carried for display only
    pub grade: String,
}

impl std::fmt::Display for TubularSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (OD={:.3} in, ID={:.3} in, {:.1} lb/ft)",
            self.label, self.od_in, self.id_in, self.weight_ppf
        )
    }
}

/// Immutable tubular lookup table keyed by uppercase label.
#[derive(Debug, Clone, Default)]
pub struct TubularTable {
    sizes: BTreeMap<String, TubularSize>,

    /// Source of the table (e.g., "builtin", a CSV path)
    pub source: Option<String>,
}

impl TubularTable {
    /// Build a table from a list of sizes. Later duplicates replace earlier ones.
    pub fn from_sizes(sizes: impl IntoIterator<Item = TubularSize>, source: impl Into<String>) -> Self {
        let sizes = sizes
            .into_iter()
            .map(|s| (s.label.to_uppercase(), s))
            .collect();
        TubularTable {
            sizes,
            source: Some(source.into()),
        }
    }

    /// Load a table from a CSV file with the header described in the module docs.
    pub fn load_from_csv(path: &str) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("open", path, format!("Failed to read CSV: {}", e)))?;
        let table = Self::parse_csv(&text, path)?;
        debug!(path, sizes = table.len(), "Loaded tubular table");
        Ok(table)
    }

    /// Parse CSV text. Rows without a label or with an unknown kind are skipped.
    pub fn parse_csv(text: &str, source: &str) -> CalcResult<Self> {
        let mut lines = text.lines();
        let header = lines
            .next()
            .ok_or_else(|| CalcError::file_error("read", source, "CSV file is empty"))?;
        let headers: Vec<&str> = header.split(',').map(str::trim).collect();
        let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let label_idx = col("label").ok_or_else(|| CalcError::file_error("parse", source, "Missing 'label' column"))?;
        let od_idx = col("od_in").ok_or_else(|| CalcError::file_error("parse", source, "Missing 'od_in' column"))?;
        let id_idx = col("id_in").ok_or_else(|| CalcError::file_error("parse", source, "Missing 'id_in' column"))?;
        let kind_idx = col("kind");
        let wt_idx = col("weight_ppf");
        let grade_idx = col("grade");

        let mut sizes = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let label = fields.get(label_idx).copied().unwrap_or("");
            if label.is_empty() {
                continue;
            }
            let kind = match kind_idx.and_then(|i| fields.get(i)) {
                Some(k) => match k.parse::<TubularKind>() {
                    Ok(kind) => kind,
                    Err(_) => continue,
                },
                None => TubularKind::Casing,
            };
            let get = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).map(|v| parse_lenient_f64(v)).unwrap_or(0.0);

            sizes.push(TubularSize {
                label: label.to_string(),
                kind,
                od_in: get(Some(od_idx)),
                id_in: get(Some(id_idx)),
                weight_ppf: get(wt_idx),
                grade: grade_idx
                    .and_then(|i| fields.get(i))
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            });
        }

        Ok(Self::from_sizes(sizes, source))
    }

    /// Look up a size by label (case-insensitive)
    pub fn lookup(&self, label: &str) -> CalcResult<&TubularSize> {
        self.sizes
            .get(&label.to_uppercase())
            .ok_or_else(|| CalcError::tubular_not_found(label))
    }

    /// All sizes of one kind, ordered by label
    pub fn of_kind(&self, kind: TubularKind) -> Vec<&TubularSize> {
        self.sizes.values().filter(|s| s.kind == kind).collect()
    }

    /// All sizes, ordered by label
    pub fn iter(&self) -> impl Iterator<Item = &TubularSize> {
        self.sizes.values()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

static BUILTIN: Lazy<TubularTable> = Lazy::new(|| {
    // (label, kind, od, id, weight, grade)
    let rows: [(&str, TubularKind, f64, f64, f64, &str); 16] = [
        // Casing / liner
        ("13-3/8in 72# N-80", TubularKind::Casing, 13.375, 12.347, 72.0, "N-80"),
        ("9-5/8in 47# P-110", TubularKind::Casing, 9.625, 8.681, 47.0, "P-110"),
        ("9-5/8in 53.5# P-110", TubularKind::Casing, 9.625, 8.535, 53.5, "P-110"),
        ("7-5/8in 29.7# P-110", TubularKind::Casing, 7.625, 6.875, 29.7, "P-110"),
        ("7in 26# P-110", TubularKind::Casing, 7.0, 6.276, 26.0, "P-110"),
        ("7in 29# P-110", TubularKind::Casing, 7.0, 6.184, 29.0, "P-110"),
        ("7in 32# P-110", TubularKind::Casing, 7.0, 6.094, 32.0, "P-110"),
        ("5-1/2in 17# P-110", TubularKind::Casing, 5.5, 4.892, 17.0, "P-110"),
        ("5-1/2in 20# P-110", TubularKind::Casing, 5.5, 4.778, 20.0, "P-110"),
        ("4-1/2in 13.5# P-110", TubularKind::Casing, 4.5, 3.920, 13.5, "P-110"),
        // Drill pipe
        ("5-1/2in 21.9# S-135", TubularKind::DrillPipe, 5.5, 4.778, 21.9, "S-135"),
        ("5in 19.5# S-135", TubularKind::DrillPipe, 5.0, 4.276, 19.5, "S-135"),
        ("4-1/2in 16.6# S-135", TubularKind::DrillPipe, 4.5, 3.826, 16.6, "S-135"),
        ("4in 14# S-135", TubularKind::DrillPipe, 4.0, 3.340, 14.0, "S-135"),
        ("3-1/2in 13.3# S-135", TubularKind::DrillPipe, 3.5, 2.764, 13.3, "S-135"),
        // Heavy-weight
        ("5in HWDP 49.3#", TubularKind::HeavyWeight, 5.0, 3.0, 49.3, "1340 MOD"),
    ];

    TubularTable::from_sizes(
        rows.into_iter().map(|(label, kind, od, id, wt, grade)| TubularSize {
            label: label.to_string(),
            kind,
            od_in: od,
            id_in: id,
            weight_ppf: wt,
            grade: grade.to_string(),
        }),
        "builtin",
    )
});

/// Built-in table of common sizes, constructed once and shared read-only.
pub fn builtin_tubulars() -> &'static TubularTable {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let table = builtin_tubulars();
        assert!(table.len() >= 16);

        let dp = table.lookup("5in 19.5# S-135").unwrap();
        assert_eq!(dp.kind, TubularKind::DrillPipe);
        assert_eq!(dp.id_in, 4.276);

        // Case-insensitive
        let lower = table.lookup("7IN 26# p-110").unwrap();
        assert_eq!(lower.weight_ppf, 26.0);
    }

    #[test]
    fn test_builtin_dimensions_consistent() {
        for size in builtin_tubulars().iter() {
            assert!(size.od_in > size.id_in, "{} has od <= id", size.label);
            assert!(size.weight_ppf > 0.0);
        }
    }

    #[test]
    fn test_not_found() {
        let err = builtin_tubulars().lookup("12in unobtainium").unwrap_err();
        assert_eq!(err.error_code(), "TUBULAR_NOT_FOUND");
    }

    #[test]
    fn test_filter_by_kind() {
        let casing = builtin_tubulars().of_kind(TubularKind::Casing);
        assert!(!casing.is_empty());
        assert!(casing.iter().all(|s| s.kind == TubularKind::Casing));
    }

    #[test]
    fn test_parse_csv() {
        let csv = "label,kind,od_in,id_in,weight_ppf,grade\n\
                   7in 23# L-80,Casing,7.0,6.366,23.0,L-80\n\
                   ,Casing,1,1,1,x\n\
                   odd,Rocket,1,1,1,x\n\
                   3-1/2in 15.5# S-135,DP,3.5,2.602,n/a,S-135\n";
        let table = TubularTable::parse_csv(csv, "inline").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("7in 23# L-80").unwrap().id_in, 6.366);
        // Unparsable weight becomes zero
        assert_eq!(table.lookup("3-1/2in 15.5# S-135").unwrap().weight_ppf, 0.0);
        assert_eq!(table.source.as_deref(), Some("inline"));
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let csv = "label,od_in\nfoo,1.0\n";
        assert!(TubularTable::parse_csv(csv, "inline").is_err());
    }
}
