#![cfg_attr(docsrs, feature(doc_cfg))]

//! # langprof
//!
//! langprof builds the model used by n-gram based language identification.
//! Per-language n-gram profiles are loaded once per process, and folded into a
//! table that maps each n-gram of length 1 to 3 to a vector of probabilities,
//! one per language.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufWriter;
//!
//! use langprof::{ModelBuilder, ProfileCache};
//!
//! let mut builder = ModelBuilder::new(ProfileCache::global());
//! let model = builder.build_from_source("profiles").unwrap();
//!
//! for lang in model.languages() {
//!     println!("{}", lang);
//! }
//! println!("{:?}", model.probabilities("th"));
//!
//! let mut f = BufWriter::new(File::create("model.bin").unwrap());
//! model.write(&mut f).unwrap();
//! ```
//!
//! Profiles are decoded from JSON with the default **crate feature** `json`.
//! Other formats can be plugged in through [`ProfileDecoder`].

mod builder;
mod cache;
mod loader;
mod model;
mod profile;
mod utils;

pub mod errors;

pub use builder::ModelBuilder;
pub use cache::{ProfileCache, ProfileList};
pub use loader::load_directory;
pub use model::LanguageModel;
pub use profile::{LanguageProfile, ProfileDecodeError, ProfileDecoder, MAX_NGRAM_LENGTH};

#[cfg(feature = "json")]
pub use profile::JsonProfileDecoder;
