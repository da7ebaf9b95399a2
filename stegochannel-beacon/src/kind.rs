use std::fmt;

/// Which public randomness source a channel's epoch boundaries follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeaconKind {
    /// Hash of the most recent confirmed Bitcoin block.
    Btc,
    /// Pulse value from the NIST Randomness Beacon.
    Nist,
    /// SHA-256 of the current UTC date, `YYYY-MM-DD`.
    Date,
}

impl BeaconKind {
    pub const ALL: [BeaconKind; 3] = [BeaconKind::Btc, BeaconKind::Nist, BeaconKind::Date];

    /// Index for use in small fixed-size per-kind arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            BeaconKind::Btc => 0,
            BeaconKind::Nist => 1,
            BeaconKind::Date => 2,
        }
    }

    /// Grace window applied past `expires_at` before a stale cache entry is
    /// refused outright.
    pub fn default_grace_period_seconds(self) -> u64 {
        match self {
            BeaconKind::Btc => 120,
            BeaconKind::Nist => 30,
            BeaconKind::Date => 300,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BeaconKind::Btc => "btc",
            BeaconKind::Nist => "nist",
            BeaconKind::Date => "date",
        }
    }

    pub fn parse(s: &str) -> Option<BeaconKind> {
        match s {
            "btc" => Some(BeaconKind::Btc),
            "nist" => Some(BeaconKind::Nist),
            "date" => Some(BeaconKind::Date),
            _ => None,
        }
    }
}

impl fmt::Display for BeaconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
