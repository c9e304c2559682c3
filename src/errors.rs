/// Error type that can be returned by fallible operations in this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A stored line could not be decoded into an [`Expense`](crate::types::Expense).
    ///
    /// `line` is 1-based within the storage resource.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// The line number the record was read from
        line: usize,
        /// What was wrong with it
        reason: String,
    },
    /// The storage resource could not be opened, read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    /// A removal position outside `1..=len`. The ledger is left unchanged.
    #[error("No expense at position {index} (ledger holds {len})")]
    IndexOutOfRange {
        /// The requested 1-based position
        index: usize,
        /// The number of records at the time of the request
        len: usize,
    },
    /// Error writing a CSV report; could wrap IO or serialization errors
    #[error("Error exporting CSV")]
    Export(#[from] csv::Error),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}
