//! Definition of errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::profile::ProfileDecodeError;

pub type Result<T, E = LangProfError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LangProfError {
    /// A profile record could not be opened or read.
    #[error("FileLoadError: can't open '{}': {source}", .path.display())]
    FileLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A profile record could not be deserialized.
    #[error("FormatError: profile format error in '{entry}': {source}")]
    Format {
        entry: String,
        #[source]
        source: ProfileDecodeError,
    },

    /// A decoded profile has contents that cannot be turned into probabilities.
    #[error("InvalidProfileError: profile '{lang}': {msg}")]
    InvalidProfile { lang: String, msg: String },

    /// The source yielded no profiles, or too few were supplied.
    #[error("NeedLoadProfileError: {0}")]
    NeedLoadProfile(String),

    /// Two profiles of one build declare the same language.
    #[error("DuplicateLangError: duplicate the same language profile '{0}'")]
    DuplicateLang(String),

    #[error("InvalidArgumentError: {arg}: {msg}")]
    InvalidArgument { arg: &'static str, msg: String },

    #[error("InvalidModelError: {0}")]
    InvalidModel(String),

    #[error(transparent)]
    IOError(#[from] io::Error),

    #[error(transparent)]
    DecodeError(#[from] bincode::error::DecodeError),

    #[error(transparent)]
    EncodeError(#[from] bincode::error::EncodeError),
}

impl LangProfError {
    pub(crate) fn file_load<P>(path: P, source: io::Error) -> Self
    where
        P: Into<PathBuf>,
    {
        Self::FileLoad {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format<E>(entry: E, source: ProfileDecodeError) -> Self
    where
        E: Into<String>,
    {
        Self::Format {
            entry: entry.into(),
            source,
        }
    }

    pub(crate) fn invalid_profile<L, S>(lang: L, msg: S) -> Self
    where
        L: Into<String>,
        S: Into<String>,
    {
        Self::InvalidProfile {
            lang: lang.into(),
            msg: msg.into(),
        }
    }

    pub(crate) fn need_load_profile<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::NeedLoadProfile(msg.into())
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument {
            arg,
            msg: msg.into(),
        }
    }

    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(msg.into())
    }
}
