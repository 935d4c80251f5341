use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ExtractError;

/// Output serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub const ACCEPTED: [&'static str; 2] = ["csv", "xlsx"];

    /// Infer the format from an output path's extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(ExtractError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Xlsx => write!(f, "xlsx"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_accepted_formats() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("XLSX".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
    }

    #[test]
    fn rejects_unknown_format_listing_choices() {
        let err = "json".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, ExtractError::InvalidFormat(_)));
        assert!(err.to_string().contains("csv, xlsx"));
    }

    #[test]
    fn infers_from_extension() {
        assert_eq!(
            OutputFormat::from_extension(Path::new("out.CSV")),
            Some(OutputFormat::Csv)
        );
        assert_eq!(
            OutputFormat::from_extension(Path::new("out.xlsx")),
            Some(OutputFormat::Xlsx)
        );
        assert_eq!(OutputFormat::from_extension(Path::new("out.json")), None);
        assert_eq!(OutputFormat::from_extension(Path::new("out")), None);
    }
}
