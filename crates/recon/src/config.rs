use std::fmt;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::ComparisonData;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub files: FilesConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Source files, resolved relative to the config file's directory.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    pub orders: String,
    pub pbi: String,
    #[serde(default)]
    pub metadata: Option<String>,
}

// ---------------------------------------------------------------------------
// Ingest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub decimal: DecimalStyle,
    /// Decode non-UTF-8 files as Windows-1252 instead of rejecting them.
    #[serde(default)]
    pub encoding_fallback: bool,
}

/// Field delimiter: a fixed ASCII byte, or sniffed from the first lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Delimiter {
    Auto,
    Byte(u8),
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::Byte(b',')
    }
}

impl TryFrom<String> for Delimiter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        if value == "\\t" {
            return Ok(Self::Byte(b'\t'));
        }
        match value.as_bytes() {
            [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(Self::Byte(*b)),
            _ => Err(format!(
                "delimiter must be a single ASCII character or \"auto\", got {value:?}"
            )),
        }
    }
}

/// Which character separates the integer and fractional part of amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalStyle {
    /// Decide per value from the separators present.
    #[default]
    Auto,
    /// `1,234.56`
    Point,
    /// `1.234,56`
    Comma,
}

impl fmt::Display for DecimalStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Point => write!(f, "point"),
            Self::Comma => write!(f, "comma"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tolerance + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToleranceConfig {
    /// Absolute discrepancy, in percent, above which an ASIN is flagged.
    #[serde(default)]
    pub discrepancy_pct: f64,
}

impl ToleranceConfig {
    /// True when either discrepancy of `c` is beyond the tolerance.
    pub fn exceeded_by(&self, c: &ComparisonData) -> bool {
        c.sales_discrepancy.abs() > self.discrepancy_pct
            || c.units_discrepancy.abs() > self.discrepancy_pct
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.files.orders.trim().is_empty() {
            return Err(ReconError::ConfigValidation("files.orders is empty".into()));
        }
        if self.files.pbi.trim().is_empty() {
            return Err(ReconError::ConfigValidation("files.pbi is empty".into()));
        }
        if matches!(&self.files.metadata, Some(path) if path.trim().is_empty()) {
            return Err(ReconError::ConfigValidation("files.metadata is empty".into()));
        }

        let pct = self.tolerance.discrepancy_pct;
        if !pct.is_finite() || pct < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.discrepancy_pct must be a non-negative number, got {pct}"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "EU marketplaces, week 42"

[files]
orders = "orders.csv"
pbi = "pbi.csv"
metadata = "asin-metadata.csv"

[ingest]
delimiter = ";"
decimal = "comma"
encoding_fallback = true

[tolerance]
discrepancy_pct = 5.0

[output]
json = "report.json"
"#;

    #[test]
    fn parse_valid() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "EU marketplaces, week 42");
        assert_eq!(config.files.orders, "orders.csv");
        assert_eq!(config.files.metadata.as_deref(), Some("asin-metadata.csv"));
        assert_eq!(config.ingest.delimiter, Delimiter::Byte(b';'));
        assert_eq!(config.ingest.decimal, DecimalStyle::Comma);
        assert!(config.ingest.encoding_fallback);
        assert_eq!(config.tolerance.discrepancy_pct, 5.0);
        assert_eq!(config.output.json.as_deref(), Some("report.json"));
    }

    #[test]
    fn defaults_when_sections_omitted() {
        let config = ReconConfig::from_toml(
            r#"
name = "minimal"
[files]
orders = "o.csv"
pbi = "p.csv"
"#,
        )
        .unwrap();
        assert!(config.files.metadata.is_none());
        assert_eq!(config.ingest.delimiter, Delimiter::Byte(b','));
        assert_eq!(config.ingest.decimal, DecimalStyle::Auto);
        assert!(!config.ingest.encoding_fallback);
        assert_eq!(config.tolerance.discrepancy_pct, 0.0);
        assert!(config.output.json.is_none());
    }

    #[test]
    fn auto_and_tab_delimiters() {
        assert_eq!(Delimiter::try_from("auto".to_string()), Ok(Delimiter::Auto));
        assert_eq!(Delimiter::try_from("\t".to_string()), Ok(Delimiter::Byte(b'\t')));
        assert_eq!(Delimiter::try_from("\\t".to_string()), Ok(Delimiter::Byte(b'\t')));
    }

    #[test]
    fn reject_bad_delimiter() {
        let input = VALID.replace(r#"delimiter = ";""#, r#"delimiter = ";;""#);
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
        assert!(err.to_string().contains("delimiter"));
    }

    #[test]
    fn reject_unknown_decimal_style() {
        let input = VALID.replace(r#"decimal = "comma""#, r#"decimal = "dot""#);
        assert!(matches!(
            ReconConfig::from_toml(&input),
            Err(ReconError::ConfigParse(_))
        ));
    }

    #[test]
    fn reject_negative_tolerance() {
        let input = VALID.replace("discrepancy_pct = 5.0", "discrepancy_pct = -1.0");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn reject_empty_orders_path() {
        let input = VALID.replace(r#"orders = "orders.csv""#, r#"orders = "  ""#);
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("files.orders"));
    }

    #[test]
    fn reject_missing_files_section() {
        assert!(matches!(
            ReconConfig::from_toml(r#"name = "x""#),
            Err(ReconError::ConfigParse(_))
        ));
    }
}
