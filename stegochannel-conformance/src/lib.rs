//! Shared fixtures for the integration tests in `tests/`: synthetic posts
//! that carry an arbitrary bit vector through a given feature set, and the
//! inverse (applying a suggestion list to a post's text/media).

use stegochannel_engine::Post;
use stegochannel_protocol::{FeatureId, FeatureSet, Suggestion};
use std::time::SystemTime;

/// Builds a post whose extracted features equal `bits`, one bit per
/// feature in `feature_set` order. `length_threshold` controls where the
/// `len` feature's boundary falls.
pub fn post_with_bits(
    id: &str,
    bits: &[bool],
    feature_set: &FeatureSet,
    length_threshold: u32,
    created_at: SystemTime,
) -> Post {
    let (text, has_media) = render(bits, feature_set, length_threshold);
    Post { id: id.to_string(), author_id: "peer".into(), text, has_media, created_at }
}

fn render(bits: &[bool], feature_set: &FeatureSet, length_threshold: u32) -> (String, bool) {
    let mut has_media = false;
    let mut want_long = false;
    let mut want_qmark = false;
    for (feature, &bit) in feature_set.as_slice().iter().zip(bits.iter()) {
        match feature {
            FeatureId::Len => want_long = bit,
            FeatureId::Media => has_media = bit,
            FeatureId::Qmark => want_qmark = bit,
        }
    }
    let mut text = if want_long {
        "a".repeat(length_threshold as usize + 10)
    } else {
        "short".to_string()
    };
    if want_qmark {
        text.push('?');
    }
    (text, has_media)
}

/// Applies `suggestions` to a post's current `(text, has_media)`, returning
/// the edited pair. Mirrors the minimal edit each [`Suggestion`] names.
pub fn apply_suggestions(
    text: &str,
    has_media: bool,
    suggestions: &[Suggestion],
    length_threshold: u32,
) -> (String, bool) {
    let mut text = text.to_string();
    let mut has_media = has_media;
    for s in suggestions {
        match s.feature {
            FeatureId::Len => {
                // `?` is always appended as a trailing character (see
                // `render`/`post_with_bits`); shortening must not clip it
                // off and silently flip the qmark feature too.
                let had_trailing_qmark = text.ends_with('?');
                let mut base = if had_trailing_qmark {
                    text[..text.len() - 1].to_string()
                } else {
                    text.clone()
                };
                if s.to {
                    while base.chars().count() < length_threshold as usize {
                        base.push('a');
                    }
                } else {
                    base = base.chars().take((length_threshold as usize).saturating_sub(1)).collect();
                }
                if had_trailing_qmark {
                    base.push('?');
                }
                text = base;
            }
            FeatureId::Media => has_media = s.to,
            FeatureId::Qmark => {
                if s.to {
                    if !text.contains('?') {
                        text.push('?');
                    }
                } else {
                    text = text.chars().filter(|&c| c != '?').collect();
                }
            }
        }
    }
    (text, has_media)
}
