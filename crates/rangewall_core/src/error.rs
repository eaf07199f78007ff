use thiserror::Error;

/// Errors raised while loading rule records or reading packet queries.
///
/// Line numbers are 1-based positions in the source the record came from, or `0` when the
/// record did not come from a line-oriented source.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong field count, bad number, out-of-range port or octet, or trailing garbage.
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// The (direction, protocol) pair is not one of the four known classifications.
    #[error("line {line}: unknown classification ({direction}, {protocol})")]
    UnknownClassification {
        line: usize,
        direction: String,
        protocol: String,
    },

    /// A rule whose lower bound exceeds its upper bound on some axis.
    ///
    /// Address bounds are compared octet by octet, so `10.0.0.200-10.0.1.5` is inverted even
    /// though it is ascending as a 32-bit number. `reason` names the offending axis.
    #[error("line {line}: inverted range in rule {rule}: {reason}")]
    InvariantViolation {
        line: usize,
        rule: String,
        reason: String,
    },

    /// A packet query that could not be understood.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Re-attributes a record-level error to the given source line.
    pub fn at_line(self, at: usize) -> Self {
        match self {
            Error::MalformedRecord { reason, .. } => Error::MalformedRecord { line: at, reason },
            Error::UnknownClassification {
                direction,
                protocol,
                ..
            } => Error::UnknownClassification {
                line: at,
                direction,
                protocol,
            },
            Error::InvariantViolation { rule, reason, .. } => Error::InvariantViolation {
                line: at,
                rule,
                reason,
            },
            other => other,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedRecord { line, .. }
            | Error::UnknownClassification { line, .. }
            | Error::InvariantViolation { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
