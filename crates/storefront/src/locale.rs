//! Loading the validation message catalog at startup.

use std::path::PathBuf;

use shopfront_core::LocaleCatalog;
use shopfront_core::validation::LocaleParseError;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::LocaleSource;

/// The locale catalog could not be loaded.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("Failed to read locale file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch locale file: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error(transparent)]
    Parse(#[from] LocaleParseError),
}

/// Load a catalog from a file or URL.
///
/// # Errors
///
/// Returns an error if the source cannot be read or is not a catalog.
#[instrument(skip(http), fields(source = %source))]
pub async fn load_catalog(
    source: &LocaleSource,
    http: &reqwest::Client,
) -> Result<LocaleCatalog, LocaleError> {
    let text = match source {
        LocaleSource::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LocaleError::Read {
                    path: path.clone(),
                    source,
                })?
        }
        LocaleSource::Url(url) => {
            http.get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?
        }
    };

    let catalog = LocaleCatalog::from_json(&text)?;
    info!(code = %catalog.code, messages = catalog.messages.len(), "Locale catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("shopfront-locale-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"{"code": "zh_TW", "messages": {"required": "{_field_} 為必填"}}"#,
        )
        .await
        .unwrap();

        let catalog = load_catalog(&LocaleSource::Path(path.clone()), &reqwest::Client::new())
            .await
            .unwrap();
        assert_eq!(catalog.code, "zh_TW");

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = LocaleSource::Path(PathBuf::from("/nonexistent/zh_TW.json"));
        let err = load_catalog(&source, &reqwest::Client::new()).await.unwrap_err();
        assert!(matches!(err, LocaleError::Read { .. }));
    }
}
