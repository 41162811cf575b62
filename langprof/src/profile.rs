use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// The longest n-gram that contributes to a model.
pub const MAX_NGRAM_LENGTH: usize = 3;

/// N-gram statistics of a single language.
///
/// The field names follow the JSON profile format: `name` is the language
/// identifier, `freq` maps each observed n-gram to its occurrence count and
/// `n_words[k]` is the total count of all n-grams of length `k + 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageProfile {
    pub(crate) name: String,
    pub(crate) freq: HashMap<String, u64>,
    pub(crate) n_words: [u64; MAX_NGRAM_LENGTH],
}

impl LanguageProfile {
    /// Creates a new profile.
    ///
    /// # Arguments
    ///
    /// * `name` - A language identifier.
    /// * `freq` - Occurrence counts of n-grams.
    /// * `n_words` - Total counts of n-grams of length 1, 2, and 3.
    ///
    /// # Returns
    ///
    /// A new profile.
    pub fn new<S>(name: S, freq: HashMap<String, u64>, n_words: [u64; MAX_NGRAM_LENGTH]) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            freq,
            n_words,
        }
    }

    /// Gets a reference to the language identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a reference to the n-gram counts.
    pub const fn frequencies(&self) -> &HashMap<String, u64> {
        &self.freq
    }

    /// Gets the total counts of n-grams of length 1, 2, and 3.
    pub const fn total_by_length(&self) -> &[u64; MAX_NGRAM_LENGTH] {
        &self.n_words
    }
}

/// Error returned by a [`ProfileDecoder`].
pub type ProfileDecodeError = Box<dyn std::error::Error + Send + Sync>;

/// Converts one serialized record into a [`LanguageProfile`].
///
/// The returned error becomes the source of a format error that names the
/// failing record, so implementations do not need to repeat it.
pub trait ProfileDecoder: Send + Sync {
    fn decode(&self, raw: &[u8]) -> Result<LanguageProfile, ProfileDecodeError>;
}

/// Decoder of JSON profiles.
#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonProfileDecoder;

#[cfg(feature = "json")]
impl ProfileDecoder for JsonProfileDecoder {
    fn decode(&self, raw: &[u8]) -> Result<LanguageProfile, ProfileDecodeError> {
        Ok(serde_json::from_slice(raw)?)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[test]
    fn test_json_decode() {
        let raw = br#"{"name":"en","freq":{"a":10,"ab":3},"n_words":[100,40,0]}"#;
        let profile = JsonProfileDecoder.decode(raw).unwrap();

        assert_eq!("en", profile.name());
        assert_eq!(Some(&10), profile.frequencies().get("a"));
        assert_eq!(Some(&3), profile.frequencies().get("ab"));
        assert_eq!(&[100, 40, 0], profile.total_by_length());
    }

    #[test]
    fn test_json_decode_missing_field() {
        let raw = br#"{"name":"en","freq":{"a":10}}"#;

        let err = JsonProfileDecoder.decode(raw).unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn test_json_decode_short_totals() {
        let raw = br#"{"name":"en","freq":{"a":10},"n_words":[100,40]}"#;

        assert!(JsonProfileDecoder.decode(raw).is_err());
    }

    #[test]
    fn test_json_decode_negative_count() {
        let raw = br#"{"name":"en","freq":{"a":-1},"n_words":[100,0,0]}"#;

        assert!(JsonProfileDecoder.decode(raw).is_err());
    }
}
