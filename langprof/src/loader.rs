//! Enumeration of profile records stored in a directory.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::{LangProfError, Result};
use crate::profile::{LanguageProfile, ProfileDecoder};

/// Reads all profiles stored in a directory.
///
/// Hidden entries (names starting with `.`) and entries that are not regular
/// files are skipped. The remaining files are decoded in file-name order, so
/// the order of the returned profiles is stable across platforms.
///
/// # Arguments
///
/// * `dir` - A profile directory.
/// * `decoder` - A decoder applied to the content of each file.
///
/// # Errors
///
/// - [`LangProfError::NeedLoadProfile`] when `dir` cannot be listed or contains no profile.
/// - [`LangProfError::FileLoad`] when a file cannot be read.
/// - [`LangProfError::Format`] when a file cannot be decoded.
pub fn load_directory<P, D>(dir: P, decoder: &D) -> Result<Vec<LanguageProfile>>
where
    P: AsRef<Path>,
    D: ProfileDecoder + ?Sized,
{
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| {
        LangProfError::need_load_profile(format!("Not found profile: {}: {e}", dir.display()))
    })?;

    let mut paths = vec![];
    for entry in entries {
        let entry = entry.map_err(|e| LangProfError::file_load(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        paths.push(path);
    }
    paths.sort_unstable();

    let mut profiles = Vec::with_capacity(paths.len());
    for path in paths {
        let entry_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(path = %path.display(), "reading profile");
        let raw = fs::read(&path).map_err(|e| LangProfError::file_load(&path, e))?;
        let profile = decoder
            .decode(&raw)
            .map_err(|e| LangProfError::format(entry_name, e))?;
        profiles.push(profile);
    }

    if profiles.is_empty() {
        return Err(LangProfError::need_load_profile(format!(
            "Not found profile: {}",
            dir.display()
        )));
    }
    info!(dir = %dir.display(), n_profiles = profiles.len(), "loaded profiles");

    Ok(profiles)
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    use crate::profile::JsonProfileDecoder;

    fn write_profile(dir: &Path, file_name: &str, content: &str) {
        fs::write(dir.join(file_name), content).unwrap();
    }

    #[test]
    fn test_load_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(
            dir.path(),
            "fr",
            r#"{"name":"fr","freq":{"a":5},"n_words":[50,0,0]}"#,
        );
        write_profile(
            dir.path(),
            "en",
            r#"{"name":"en","freq":{"a":10},"n_words":[100,0,0]}"#,
        );

        let profiles = load_directory(dir.path(), &JsonProfileDecoder).unwrap();

        let names: Vec<_> = profiles.iter().map(|p| p.name()).collect();
        assert_eq!(vec!["en", "fr"], names);
    }

    #[test]
    fn test_load_directory_skips_hidden_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(
            dir.path(),
            "en",
            r#"{"name":"en","freq":{"a":10},"n_words":[100,0,0]}"#,
        );
        write_profile(dir.path(), ".DS_Store", "garbage");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let profiles = load_directory(dir.path(), &JsonProfileDecoder).unwrap();

        assert_eq!(1, profiles.len());
        assert_eq!("en", profiles[0].name());
    }

    #[test]
    fn test_load_directory_format_error() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(
            dir.path(),
            "en",
            r#"{"name":"en","freq":{"a":10},"n_words":[100,0,0]}"#,
        );
        write_profile(dir.path(), "xx", "{not json");

        let err = load_directory(dir.path(), &JsonProfileDecoder).unwrap_err();

        match err {
            LangProfError::Format { entry, source } => {
                assert_eq!("xx", entry);
                assert!(source.downcast_ref::<serde_json::Error>().is_some());
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_load_directory_unreadable_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write_profile(
            dir.path(),
            "en",
            r#"{"name":"en","freq":{"a":10},"n_words":[100,0,0]}"#,
        );
        let path = dir.path().join("en");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&path).is_ok() {
            // Permission bits are not enforced, e.g. when running as root.
            return;
        }

        let err = load_directory(dir.path(), &JsonProfileDecoder).unwrap_err();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        match err {
            LangProfError::FileLoad { path: failed, .. } => assert_eq!(path, failed),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_load_directory_empty() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_directory(dir.path(), &JsonProfileDecoder).unwrap_err();

        assert!(matches!(err, LangProfError::NeedLoadProfile(_)));
    }

    #[test]
    fn test_load_directory_missing() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_directory(dir.path().join("missing"), &JsonProfileDecoder).unwrap_err();

        assert!(matches!(err, LangProfError::NeedLoadProfile(_)));
    }
}
