use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BeaconErrorKind {
    /// Fresh fetch failed and no cache entry within grace was available.
    Unavailable,
    /// The source returned a value that fails basic shape checks (empty
    /// epoch id, `expires_at` not after `valid_from`).
    BadSource,
}

impl fmt::Display for BeaconErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeaconErrorKind::Unavailable => write!(f, "unavailable"),
            BeaconErrorKind::BadSource => write!(f, "bad_source"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconFailure {
    kind: BeaconErrorKind,
    detail: String,
}

impl BeaconFailure {
    pub fn unavailable(detail: impl Into<String>) -> Self {
        BeaconFailure { kind: BeaconErrorKind::Unavailable, detail: detail.into() }
    }

    pub fn bad_source(detail: impl Into<String>) -> Self {
        BeaconFailure { kind: BeaconErrorKind::BadSource, detail: detail.into() }
    }

    pub fn is_unavailable(&self) -> bool {
        self.kind == BeaconErrorKind::Unavailable
    }
}

impl fmt::Display for BeaconFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "beacon failure ({}): {}", self.kind, self.detail)
    }
}

impl std::error::Error for BeaconFailure {}
