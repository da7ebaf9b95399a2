use std::fmt;

/// Kind tag for a cryptographic failure, per the protocol's error taxonomy.
///
/// Every wrapper in this crate collapses whatever its underlying crate
/// reports into one of these three kinds; callers should match on the kind,
/// not on the underlying library's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoErrorKind {
    /// An input or output buffer had the wrong length for the operation.
    BadLength,
    /// An AEAD open or HMAC verification failed.
    AuthFail,
    /// The system CSPRNG could not be read.
    RandFail,
}

impl fmt::Display for CryptoErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoErrorKind::BadLength => write!(f, "bad_length"),
            CryptoErrorKind::AuthFail => write!(f, "auth_fail"),
            CryptoErrorKind::RandFail => write!(f, "rand_fail"),
        }
    }
}

/// A single tagged error type that every primitive in this crate returns.
/// Always fatal to the current operation; callers must not retry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoFailure {
    kind: CryptoErrorKind,
}

impl CryptoFailure {
    pub fn new(kind: CryptoErrorKind) -> Self {
        CryptoFailure { kind }
    }

    pub fn bad_length() -> Self {
        Self::new(CryptoErrorKind::BadLength)
    }

    pub fn auth_fail() -> Self {
        Self::new(CryptoErrorKind::AuthFail)
    }

    pub fn rand_fail() -> Self {
        Self::new(CryptoErrorKind::RandFail)
    }

    pub fn kind(&self) -> CryptoErrorKind {
        self.kind
    }
}

impl fmt::Display for CryptoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crypto failure: {}", self.kind)
    }
}

impl std::error::Error for CryptoFailure {}
