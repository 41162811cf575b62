use std::mem;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::ProfileCache;
use crate::errors::{LangProfError, Result};
use crate::loader;
use crate::model::LanguageModel;
use crate::profile::{LanguageProfile, ProfileDecoder, MAX_NGRAM_LENGTH};
use crate::utils::Indexer;

#[cfg(feature = "json")]
use crate::profile::JsonProfileDecoder;

/// Probability vectors under construction.
#[derive(Default)]
struct ProbabilityTable {
    n_languages: usize,
    languages: Indexer<String>,
    ngrams: Indexer<String>,
    probabilities: Vec<f64>,
}

impl ProbabilityTable {
    fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.ngrams.is_empty()
    }

    fn into_model(self, seed: Option<u64>) -> LanguageModel {
        LanguageModel {
            languages: self.languages,
            ngrams: self.ngrams,
            probabilities: self.probabilities,
            seed,
        }
    }
}

/// Builder of [`LanguageModel`].
///
/// # Examples
///
/// ```no_run
/// use langprof::{ModelBuilder, ProfileCache};
///
/// let mut builder = ModelBuilder::new(ProfileCache::global());
/// let model = builder.build_from_source("profiles").unwrap();
/// println!("{:?}", model.languages());
/// ```
pub struct ModelBuilder {
    cache: Arc<ProfileCache>,
    decoder: Arc<dyn ProfileDecoder>,
    table: ProbabilityTable,
    model: Option<Arc<LanguageModel>>,
    seed: Option<u64>,
}

impl ModelBuilder {
    /// Creates a new builder that reads JSON profiles.
    ///
    /// # Arguments
    ///
    /// * `cache` - A profile cache shared with other builders.
    ///
    /// # Returns
    ///
    /// A new builder.
    #[cfg(feature = "json")]
    #[cfg_attr(docsrs, doc(cfg(feature = "json")))]
    pub fn new(cache: Arc<ProfileCache>) -> Self {
        Self::with_decoder(cache, Arc::new(JsonProfileDecoder))
    }

    /// Creates a new builder with a custom profile decoder.
    ///
    /// # Arguments
    ///
    /// * `cache` - A profile cache shared with other builders.
    /// * `decoder` - A decoder of serialized profiles.
    ///
    /// # Returns
    ///
    /// A new builder.
    pub fn with_decoder(cache: Arc<ProfileCache>, decoder: Arc<dyn ProfileDecoder>) -> Self {
        Self {
            cache,
            decoder,
            table: ProbabilityTable::default(),
            model: None,
            seed: None,
        }
    }

    /// Builds a model from the profiles stored in a directory.
    ///
    /// The directory is read through the profile cache, so it is read at most
    /// once per process even when many builders request it. The column of each
    /// language is the position of its profile in the directory.
    ///
    /// # Arguments
    ///
    /// * `dir` - A profile directory.
    ///
    /// # Returns
    ///
    /// The built model. It is also kept by the builder until [`Self::reset()`].
    ///
    /// # Errors
    ///
    /// [`LangProfError::NeedLoadProfile`], [`LangProfError::FileLoad`], and
    /// [`LangProfError::Format`] are returned when the directory cannot be loaded.
    /// [`LangProfError::DuplicateLang`] is returned when two profiles share a language.
    /// On error, the builder is left empty.
    pub fn build_from_source<P>(&mut self, dir: P) -> Result<Arc<LanguageModel>>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let decoder = self.decoder.as_ref();
        let profiles = self
            .cache
            .get_or_load(dir, || loader::load_directory(dir, decoder))?;

        self.reset();
        let n_languages = profiles.len();
        for (index, profile) in profiles.iter().enumerate() {
            if let Err(e) = self.merge_profile(profile, index, n_languages) {
                self.reset();
                return Err(e);
            }
        }
        self.finish()
    }

    /// Builds a model from serialized profiles, bypassing the profile cache.
    ///
    /// # Arguments
    ///
    /// * `profiles` - Serialized profiles. The column of each language is its position.
    ///
    /// # Returns
    ///
    /// The built model. It is also kept by the builder until [`Self::reset()`].
    ///
    /// # Errors
    ///
    /// [`LangProfError::NeedLoadProfile`] is returned when fewer than two profiles are given.
    /// [`LangProfError::Format`] is returned when a profile cannot be decoded.
    /// [`LangProfError::DuplicateLang`] is returned when two profiles share a language.
    /// On error, the builder is left empty.
    pub fn build_from_batch<S>(&mut self, profiles: &[S]) -> Result<Arc<LanguageModel>>
    where
        S: AsRef<[u8]>,
    {
        let n_languages = profiles.len();
        if n_languages < 2 {
            return Err(LangProfError::need_load_profile(
                "Need more than 2 profiles",
            ));
        }

        self.reset();
        for (index, raw) in profiles.iter().enumerate() {
            let result = self
                .decoder
                .decode(raw.as_ref())
                .map_err(|e| LangProfError::format(format!("#{index}"), e))
                .and_then(|profile| self.merge_profile(&profile, index, n_languages));
            if let Err(e) = result {
                self.reset();
                return Err(e);
            }
        }
        self.finish()
    }

    /// Folds a profile into the model under construction.
    ///
    /// Each n-gram of length 1 to 3 gets the probability `count / n_words[length - 1]`
    /// at column `index`. Other n-grams are ignored. A failed merge leaves the
    /// builder unchanged.
    ///
    /// # Arguments
    ///
    /// * `profile` - A language profile.
    /// * `index` - The column assigned to the language.
    /// * `n_languages` - The number of languages of the whole build. It must be the
    ///   same for every merge until [`Self::finish()`] or [`Self::reset()`].
    ///
    /// # Errors
    ///
    /// [`LangProfError::DuplicateLang`] is returned when the language was already merged.
    /// [`LangProfError::InvalidArgument`] is returned when `index` or `n_languages`
    /// is inconsistent.
    /// [`LangProfError::InvalidProfile`] is returned when an n-gram length has
    /// observations but a zero total.
    pub fn merge_profile(
        &mut self,
        profile: &LanguageProfile,
        index: usize,
        n_languages: usize,
    ) -> Result<()> {
        if self.table.is_empty() {
            self.table.n_languages = n_languages;
        } else if self.table.n_languages != n_languages {
            return Err(LangProfError::invalid_argument(
                "n_languages",
                format!(
                    "must be {} for the whole build, but got {n_languages}",
                    self.table.n_languages
                ),
            ));
        }
        if index >= n_languages {
            return Err(LangProfError::invalid_argument(
                "index",
                format!("must be less than {n_languages}, but got {index}"),
            ));
        }
        // Columns are assigned in merge order, so that `languages[i]` owns column `i`.
        if index != self.table.languages.len() {
            return Err(LangProfError::invalid_argument(
                "index",
                format!(
                    "must be {}, but got {index}",
                    self.table.languages.len()
                ),
            ));
        }
        if self.table.languages.get(profile.name()).is_some() {
            return Err(LangProfError::DuplicateLang(profile.name().to_string()));
        }

        let mut ngrams: Vec<(&str, usize, u64)> = profile
            .frequencies()
            .iter()
            .filter_map(|(ngram, &count)| {
                let length = ngram.chars().count();
                (1..=MAX_NGRAM_LENGTH)
                    .contains(&length)
                    .then_some((ngram.as_str(), length, count))
            })
            .collect();
        let totals = profile.total_by_length();
        if let Some(&(_, length, _)) = ngrams
            .iter()
            .find(|&&(_, length, _)| totals[length - 1] == 0)
        {
            return Err(LangProfError::invalid_profile(
                profile.name(),
                format!("n_words[{}] is zero", length - 1),
            ));
        }
        // Sorted so that slot numbers do not depend on hash order.
        ngrams.sort_unstable_by_key(|&(ngram, _, _)| ngram);

        self.table.languages.get_id(profile.name());
        for (ngram, length, count) in ngrams {
            let slot = self.table.ngrams.get_id(ngram);
            if slot * n_languages == self.table.probabilities.len() {
                self.table
                    .probabilities
                    .resize((slot + 1) * n_languages, 0.0);
            }
            self.table.probabilities[slot * n_languages + index] =
                count as f64 / totals[length - 1] as f64;
        }
        debug!(
            language = profile.name(),
            index,
            n_ngrams = self.table.ngrams.len(),
            "merged profile"
        );
        Ok(())
    }

    /// Freezes the merged profiles into a model and keeps it in the builder.
    ///
    /// The builder is ready to accept a new build afterwards.
    ///
    /// # Errors
    ///
    /// [`LangProfError::NeedLoadProfile`] is returned when fewer profiles than
    /// `n_languages` of [`Self::merge_profile()`] were merged. The merged profiles are
    /// kept in that case.
    pub fn finish(&mut self) -> Result<Arc<LanguageModel>> {
        if self.table.languages.len() != self.table.n_languages {
            return Err(LangProfError::need_load_profile(format!(
                "expected {} profiles, but {} merged",
                self.table.n_languages,
                self.table.languages.len()
            )));
        }
        let table = mem::take(&mut self.table);
        let model = Arc::new(table.into_model(self.seed));
        info!(
            n_languages = model.n_languages(),
            n_ngrams = model.len(),
            "built language model"
        );
        self.model = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Clears loaded profiles so that another profile set can be built.
    ///
    /// The profile cache is not touched.
    pub fn reset(&mut self) {
        self.table = ProbabilityTable::default();
        self.model = None;
    }

    /// Gets the languages of the last built model, or of the merges in progress.
    pub fn languages(&self) -> &[String] {
        match &self.model {
            Some(model) if self.table.is_empty() => model.languages(),
            _ => self.table.languages.keys(),
        }
    }

    /// Gets the last built model.
    pub fn model(&self) -> Option<Arc<LanguageModel>> {
        self.model.clone()
    }

    /// Sets a seed for the classifier. Models finished after this call carry it.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}
