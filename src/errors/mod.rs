use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the scoring core and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured song title matched zero or several catalog entries
    #[error("song title {title:?} matched {matches} catalog entries, expected exactly one")]
    CatalogResolution { title: String, matches: usize },

    /// A tournament method was called out of stage order
    #[error("{operation} called before {required}")]
    Precondition {
        operation: &'static str,
        required: &'static str,
    },

    /// The scores API kept failing after all retries
    #[error("request to {url} failed after {attempts} attempt(s): {reason}")]
    Transport {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("unsupported config file format: {}", path.display())]
    UnsupportedConfig { path: PathBuf },

    /// One or more queries of a concurrent batch failed; siblings still ran
    #[error("batch had {} failed queries: {}", failures.len(), describe_failures(failures))]
    Batch { failures: Vec<(String, Error)> },

    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yml::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn precondition(operation: &'static str, required: &'static str) -> Self {
        Self::Precondition {
            operation,
            required,
        }
    }
}

fn describe_failures(failures: &[(String, Error)]) -> String {
    failures
        .iter()
        .map(|(key, error)| format!("{key}: {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_names_every_failure() {
        let error = Error::Batch {
            failures: vec![
                ("Thaya".to_string(), Error::precondition("a", "b")),
                ("Hamaon".to_string(), Error::precondition("c", "d")),
            ],
        };

        let message = error.to_string();

        assert!(message.starts_with("batch had 2 failed queries"));
        assert!(message.contains("Thaya: a called before b"));
        assert!(message.contains("Hamaon: c called before d"));
    }
}
