use std::fmt;

#[derive(Debug)]
pub enum TableError {
    /// A named column does not exist in the table.
    UnknownColumn(String),
    /// A pushed row's width doesn't match the header.
    WidthMismatch { expected: usize, got: usize },
    /// A join would introduce a column name the left side already has.
    DuplicateColumn(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColumn(name) => write!(f, "unknown column: {name}"),
            Self::WidthMismatch { expected, got } => {
                write!(f, "row has {got} fields, table has {expected} columns")
            }
            Self::DuplicateColumn(name) => {
                write!(f, "join would duplicate column '{name}'")
            }
        }
    }
}

impl std::error::Error for TableError {}
