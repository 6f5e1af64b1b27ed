use std::path::PathBuf;

/// Errors raised while turning dumped pages and price files into records.
///
/// Numeric text never produces one of these: malformed numbers degrade to
/// zero in [`crate::parse::parse_number`]. Structural absence does.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("section `{section}` not found")]
    MissingSection { section: &'static str },
    #[error("table `{table}` not found")]
    MissingTable { table: String },
    #[error("row `{row}` not found in table `{table}`")]
    MissingRow { table: String, row: String },
    #[error("required file {} not found", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("column `{column}` missing in {}", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("invalid date `{value}` in {}", path.display())]
    InvalidDate { path: PathBuf, value: String },
    #[error("invalid rating count `{value}` for `{category}`")]
    InvalidCount { category: String, value: String },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the lookup failures that mean the page lacks data we require.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            Self::MissingFile { .. }
                | Self::MissingSection { .. }
                | Self::MissingTable { .. }
                | Self::MissingRow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
