use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::errors::{LangProfError, Result};
use crate::utils::Indexer;

#[derive(Encode, Decode)]
struct ModelData {
    languages: Vec<String>,
    ngrams: Vec<String>,
    probabilities: Vec<f64>,
    seed: Option<u64>,
}

/// Language model consumed by a classifier.
///
/// Each n-gram is mapped to a vector that has one probability per language. The
/// vectors are stored back to back in a single buffer, so the vector of the
/// n-gram with slot `i` occupies `probabilities[i * n_languages..(i + 1) * n_languages]`.
#[derive(Clone, Debug)]
pub struct LanguageModel {
    pub(crate) languages: Indexer<String>,
    pub(crate) ngrams: Indexer<String>,
    pub(crate) probabilities: Vec<f64>,
    pub(crate) seed: Option<u64>,
}

impl LanguageModel {
    /// Gets the language identifiers. The position of each language is its column in
    /// every probability vector.
    pub fn languages(&self) -> &[String] {
        self.languages.keys()
    }

    pub fn n_languages(&self) -> usize {
        self.languages.len()
    }

    /// Gets the column of a language.
    pub fn language_index(&self, language: &str) -> Option<usize> {
        self.languages.get(language)
    }

    /// Number of n-grams in the model.
    pub fn len(&self) -> usize {
        self.ngrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ngrams.is_empty()
    }

    /// Gets the probability vector of an n-gram.
    ///
    /// # Returns
    ///
    /// A slice of length [`Self::n_languages()`], or `None` if no profile observed `ngram`.
    pub fn probabilities(&self, ngram: &str) -> Option<&[f64]> {
        self.ngrams.get(ngram).map(|slot| self.vector(slot))
    }

    /// Gets the probability of an n-gram in one language, or `0` if it was never observed.
    pub fn probability(&self, ngram: &str, language: &str) -> f64 {
        match (self.probabilities(ngram), self.language_index(language)) {
            (Some(probs), Some(idx)) => probs[idx],
            _ => 0.0,
        }
    }

    /// Iterates over n-grams and their probability vectors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> + '_ {
        self.ngrams
            .keys()
            .iter()
            .enumerate()
            .map(move |(slot, ngram)| (ngram.as_str(), self.vector(slot)))
    }

    /// Gets the reproducibility seed. The value is opaque to this crate and only
    /// stored for the classifier.
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Replaces the reproducibility seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn vector(&self, slot: usize) -> &[f64] {
        let n = self.n_languages();
        &self.probabilities[slot * n..(slot + 1) * n]
    }

    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<usize>
    where
        W: Write,
    {
        let data = ModelData {
            languages: self.languages.keys().to_vec(),
            ngrams: self.ngrams.keys().to_vec(),
            probabilities: self.probabilities.clone(),
            seed: self.seed,
        };
        Ok(bincode::encode_into_std_write(
            &data,
            wtr,
            bincode::config::standard(),
        )?)
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is.
    /// When the data is inconsistent, [`LangProfError::InvalidModel`] will be returned.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let data: ModelData = bincode::decode_from_std_read(rdr, bincode::config::standard())?;

        let n_languages = data.languages.len();
        if n_languages == 0 && !data.ngrams.is_empty() {
            return Err(LangProfError::invalid_model("n-grams without languages"));
        }
        let expected = data
            .ngrams
            .len()
            .checked_mul(n_languages)
            .ok_or_else(|| LangProfError::invalid_model("too many n-grams"))?;
        if data.probabilities.len() != expected {
            return Err(LangProfError::invalid_model(format!(
                "expected {expected} probabilities, but got {}",
                data.probabilities.len()
            )));
        }
        let languages = Indexer::from_keys(data.languages)
            .ok_or_else(|| LangProfError::invalid_model("duplicated language"))?;
        let ngrams = Indexer::from_keys(data.ngrams)
            .ok_or_else(|| LangProfError::invalid_model("duplicated n-gram"))?;

        Ok(Self {
            languages,
            ngrams,
            probabilities: data.probabilities,
            seed: data.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LanguageModel {
        LanguageModel {
            languages: Indexer::from_keys(vec!["en".to_string(), "fr".to_string()]).unwrap(),
            ngrams: Indexer::from_keys(vec!["a".to_string(), "é".to_string()]).unwrap(),
            probabilities: vec![0.1, 0.1, 0.0, 0.02],
            seed: Some(42),
        }
    }

    #[test]
    fn test_probabilities() {
        let model = model();

        assert_eq!(Some(&[0.1, 0.1][..]), model.probabilities("a"));
        assert_eq!(Some(&[0.0, 0.02][..]), model.probabilities("é"));
        assert_eq!(None, model.probabilities("z"));
        assert_eq!(0.02, model.probability("é", "fr"));
        assert_eq!(0.0, model.probability("é", "de"));
        assert_eq!(0.0, model.probability("z", "en"));
    }

    #[test]
    fn test_iter_order() {
        let model = model();

        let ngrams: Vec<_> = model.iter().map(|(ngram, _)| ngram).collect();
        assert_eq!(vec!["a", "é"], ngrams);
    }

    #[test]
    fn test_write_read() {
        let model = model();

        let mut buf = vec![];
        let size = model.write(&mut buf).unwrap();
        assert_eq!(buf.len(), size);

        let restored = LanguageModel::read(&mut buf.as_slice()).unwrap();
        assert_eq!(model.languages(), restored.languages());
        assert_eq!(model.probabilities, restored.probabilities);
        assert_eq!(Some(1), restored.ngrams.get("é"));
        assert_eq!(Some(42), restored.seed());
    }

    #[test]
    fn test_read_inconsistent_length() {
        let data = ModelData {
            languages: vec!["en".to_string(), "fr".to_string()],
            ngrams: vec!["a".to_string()],
            probabilities: vec![0.1],
            seed: None,
        };
        let mut buf = vec![];
        bincode::encode_into_std_write(&data, &mut buf, bincode::config::standard()).unwrap();

        let err = LanguageModel::read(&mut buf.as_slice()).unwrap_err();

        assert!(matches!(err, LangProfError::InvalidModel(_)));
    }

    #[test]
    fn test_read_duplicated_language() {
        let data = ModelData {
            languages: vec!["en".to_string(), "en".to_string()],
            ngrams: vec![],
            probabilities: vec![],
            seed: None,
        };
        let mut buf = vec![];
        bincode::encode_into_std_write(&data, &mut buf, bincode::config::standard()).unwrap();

        let err = LanguageModel::read(&mut buf.as_slice()).unwrap_err();

        assert!(matches!(err, LangProfError::InvalidModel(_)));
    }
}
