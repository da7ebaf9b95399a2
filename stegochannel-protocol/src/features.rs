//! Maps observable post features to bits, and the reverse: suggesting the
//! smallest edit that makes a post's features match a target bit pattern.

use crate::error::ProtocolFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureId {
    /// `1` iff the post's UTF-8 code-point count is at or above the
    /// channel's length threshold.
    Len,
    /// `1` iff the post carries media.
    Media,
    /// `1` iff the post text contains `?` (U+003F).
    Qmark,
}

impl FeatureId {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureId::Len => "len",
            FeatureId::Media => "media",
            FeatureId::Qmark => "qmark",
        }
    }

    pub fn parse(s: &str) -> Option<FeatureId> {
        match s {
            "len" => Some(FeatureId::Len),
            "media" => Some(FeatureId::Media),
            "qmark" => Some(FeatureId::Qmark),
            _ => None,
        }
    }

    fn label(self, to: bool) -> &'static str {
        match (self, to) {
            (FeatureId::Len, true) => "make longer",
            (FeatureId::Len, false) => "make shorter",
            (FeatureId::Media, true) => "add media",
            (FeatureId::Media, false) => "remove media",
            (FeatureId::Qmark, true) => "add question mark",
            (FeatureId::Qmark, false) => "remove question mark",
        }
    }
}

/// An ordered, non-empty, duplicate-free selection of features. Order
/// fixes each feature's bit position within a post's contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet(Vec<FeatureId>);

impl FeatureSet {
    pub fn new(features: Vec<FeatureId>) -> Result<FeatureSet, ProtocolFailure> {
        if features.is_empty() || features.len() > 3 {
            return Err(ProtocolFailure::bad_config(
                "feature_set must have between 1 and 3 features",
            ));
        }
        let mut seen = Vec::with_capacity(features.len());
        for f in &features {
            if seen.contains(f) {
                return Err(ProtocolFailure::bad_config("feature_set has duplicate features"));
            }
            seen.push(*f);
        }
        Ok(FeatureSet(features))
    }

    pub fn as_slice(&self) -> &[FeatureId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_csv(&self) -> String {
        self.0.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(",")
    }

    pub fn parse_csv(s: &str) -> Result<FeatureSet, ProtocolFailure> {
        let features = s
            .split(',')
            .map(|part| {
                FeatureId::parse(part)
                    .ok_or_else(|| ProtocolFailure::bad_config(format!("unknown feature '{part}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        FeatureSet::new(features)
    }
}

/// Extracts one bit per feature in `feature_set` order.
pub fn extract_bits(
    text: &str,
    has_media: bool,
    length_threshold: u32,
    feature_set: &FeatureSet,
) -> Vec<bool> {
    feature_set
        .as_slice()
        .iter()
        .map(|f| match f {
            FeatureId::Len => text.chars().count() as u32 >= length_threshold,
            FeatureId::Media => has_media,
            FeatureId::Qmark => text.contains('\u{003F}'),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub feature: FeatureId,
    pub from: bool,
    pub to: bool,
    pub label: &'static str,
}

/// Per-feature edit instructions that turn `current` into `target`, in
/// `feature_set` order. Features that already match are omitted.
pub fn suggest_edits(current: &[bool], target: &[bool], feature_set: &FeatureSet) -> Vec<Suggestion> {
    feature_set
        .as_slice()
        .iter()
        .zip(current.iter())
        .zip(target.iter())
        .filter_map(|((feature, &from), &to)| {
            if from == to {
                None
            } else {
                Some(Suggestion { feature: *feature, from, to, label: feature.label(to) })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs(features: &[FeatureId]) -> FeatureSet {
        FeatureSet::new(features.to_vec()).unwrap()
    }

    #[test]
    fn extract_bits_follows_feature_set_order() {
        let set = fs(&[FeatureId::Media, FeatureId::Len, FeatureId::Qmark]);
        let bits = extract_bits("short?", true, 50, &set);
        assert_eq!(bits, vec![true, false, true]);
    }

    #[test]
    fn len_threshold_is_inclusive() {
        let set = fs(&[FeatureId::Len]);
        let exactly_at_threshold = "a".repeat(50);
        assert_eq!(extract_bits(&exactly_at_threshold, false, 50, &set), vec![true]);
        let one_short = "a".repeat(49);
        assert_eq!(extract_bits(&one_short, false, 50, &set), vec![false]);
    }

    #[test]
    fn feature_set_rejects_empty_and_duplicates() {
        assert!(FeatureSet::new(vec![]).is_err());
        assert!(FeatureSet::new(vec![FeatureId::Len, FeatureId::Len]).is_err());
    }

    #[test]
    fn csv_roundtrips() {
        let set = fs(&[FeatureId::Qmark, FeatureId::Len]);
        assert_eq!(FeatureSet::parse_csv(&set.to_csv()).unwrap(), set);
    }

    #[test]
    fn suggestions_only_cover_mismatches_in_order() {
        let set = fs(&[FeatureId::Len, FeatureId::Media, FeatureId::Qmark]);
        let current = vec![false, true, false];
        let target = vec![true, true, true];
        let suggestions = suggest_edits(&current, &target, &set);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].feature, FeatureId::Len);
        assert_eq!(suggestions[0].label, "make longer");
        assert_eq!(suggestions[1].feature, FeatureId::Qmark);
        assert_eq!(suggestions[1].label, "add question mark");
    }
}
