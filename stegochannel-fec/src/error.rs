use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RsErrorKind {
    /// More symbol errors were present than the parity budget could correct.
    Uncorrectable,
    /// Zero-length data, or a parity length that doesn't fit the field.
    BadInput,
}

impl fmt::Display for RsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsErrorKind::Uncorrectable => write!(f, "uncorrectable"),
            RsErrorKind::BadInput => write!(f, "bad_input"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsFailure {
    kind: RsErrorKind,
}

impl RsFailure {
    pub fn uncorrectable() -> Self {
        RsFailure { kind: RsErrorKind::Uncorrectable }
    }

    pub fn bad_input() -> Self {
        RsFailure { kind: RsErrorKind::BadInput }
    }

    pub fn is_uncorrectable(&self) -> bool {
        self.kind == RsErrorKind::Uncorrectable
    }
}

impl fmt::Display for RsFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reed-solomon failure: {}", self.kind)
    }
}

impl std::error::Error for RsFailure {}
