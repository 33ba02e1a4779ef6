use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Chat name as it appears in the messaging client (e.g. `"GcGroup"`).
    pub name: String,
    /// Conflict-resolution rank; `1` wins ties over `2`.
    pub priority: u8,
    /// Extra header phrases that mark this provider's daily list, on top of
    /// the shared greeting lexicon.
    #[serde(default)]
    pub greeting_phrases: Vec<String>,
    pub notes: Option<String>,
    /// `false` keeps the provider's offers out of the broadcast text; they
    /// still reach both catalog views and the audit workbook.
    #[serde(default = "default_broadcast")]
    pub broadcast: bool,
}

fn default_broadcast() -> bool {
    true
}

impl ProviderConfig {
    /// Generate a URL-safe slug from the provider name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' || c == '_' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersFile {
    pub providers: Vec<ProviderConfig>,
}

impl ProvidersFile {
    /// Looks a provider up by slug or by case-insensitive name.
    #[must_use]
    pub fn find(&self, needle: &str) -> Option<&ProviderConfig> {
        let lowered = needle.trim().to_lowercase();
        self.providers
            .iter()
            .find(|p| p.slug() == lowered || p.name.to_lowercase() == lowered)
    }

    /// Names of the providers kept out of the broadcast text.
    #[must_use]
    pub fn broadcast_exclusions(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| !p.broadcast)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Priority of the named provider; unknown providers rank last.
    #[must_use]
    pub fn priority_of(&self, name: &str) -> u8 {
        self.providers
            .iter()
            .find(|p| p.name == name)
            .map_or(u8::MAX, |p| p.priority)
    }
}

/// Load and validate the provider registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_providers(path: &Path) -> Result<ProvidersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProvidersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let providers_file: ProvidersFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProvidersFileParse)?;

    validate_providers(&providers_file)?;

    Ok(providers_file)
}

fn validate_providers(providers_file: &ProvidersFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for provider in &providers_file.providers {
        if provider.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider name must be non-empty".to_string(),
            ));
        }

        if !(1..=9).contains(&provider.priority) {
            return Err(ConfigError::Validation(format!(
                "provider '{}' has invalid priority {}; must be between 1 and 9",
                provider.name, provider.priority
            )));
        }

        let lower_name = provider.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate provider name: '{}'",
                provider.name
            )));
        }

        let slug = provider.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "provider '{}' produces an empty slug",
                provider.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate provider slug: '{}' (from provider '{}')",
                slug, provider.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, priority: u8) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            priority,
            greeting_phrases: Vec::new(),
            notes: None,
            broadcast: true,
        }
    }

    #[test]
    fn slug_simple_name() {
        assert_eq!(provider("Kadabra Provee", 2).slug(), "kadabra-provee");
    }

    #[test]
    fn slug_single_word() {
        assert_eq!(provider("GcGroup", 1).slug(), "gcgroup");
    }

    #[test]
    fn slug_with_tilde() {
        // ñ is non-ASCII and stripped
        assert_eq!(provider("Peña Celulares", 4).slug(), "pea-celulares");
    }

    #[test]
    fn validate_rejects_invalid_priority() {
        let file = ProvidersFile {
            providers: vec![provider("GcGroup", 0)],
        };
        let err = validate_providers(&file).unwrap_err();
        assert!(err.to_string().contains("invalid priority 0"));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let file = ProvidersFile {
            providers: vec![provider("  ", 1)],
        };
        let err = validate_providers(&file).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_duplicate_name() {
        let file = ProvidersFile {
            providers: vec![provider("GcGroup", 1), provider("gcgroup", 2)],
        };
        let err = validate_providers(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate provider name"));
    }

    #[test]
    fn validate_rejects_duplicate_slug() {
        let file = ProvidersFile {
            providers: vec![provider("Rodrigo Provee", 3), provider("Rodrigo--Provee", 4)],
        };
        let err = validate_providers(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate provider slug"));
    }

    #[test]
    fn validate_accepts_valid_providers() {
        let file = ProvidersFile {
            providers: vec![provider("GcGroup", 1), provider("Kadabra Provee", 2)],
        };
        assert!(validate_providers(&file).is_ok());
    }

    #[test]
    fn find_matches_slug_and_name() {
        let file = ProvidersFile {
            providers: vec![provider("GcGroup", 1), provider("Kadabra Provee", 2)],
        };
        assert_eq!(file.find("kadabra-provee").map(|p| p.priority), Some(2));
        assert_eq!(file.find("GCGROUP").map(|p| p.priority), Some(1));
        assert!(file.find("nobody").is_none());
    }

    #[test]
    fn unknown_provider_ranks_last() {
        let file = ProvidersFile {
            providers: vec![provider("GcGroup", 1)],
        };
        assert_eq!(file.priority_of("GcGroup"), 1);
        assert_eq!(file.priority_of("legacy"), u8::MAX);
    }

    #[test]
    fn greeting_phrases_default_to_empty() {
        let yaml = "providers:\n  - name: GcGroup\n    priority: 1\n    notes: null\n";
        let file: ProvidersFile = serde_yaml::from_str(yaml).unwrap();
        assert!(file.providers[0].greeting_phrases.is_empty());
        assert!(file.providers[0].broadcast);
    }

    #[test]
    fn broadcast_exclusions_lists_opted_out_providers() {
        let yaml = "providers:\n  - name: GcGroup\n    priority: 1\n    notes: null\n  - name: Rodrigo Provee\n    priority: 3\n    notes: null\n    broadcast: false\n";
        let file: ProvidersFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.broadcast_exclusions(), vec!["Rodrigo Provee"]);
    }

    #[test]
    fn load_providers_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_providers(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ProvidersFileIo { .. }));
    }

    #[test]
    fn load_providers_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("providers.yaml");
        assert!(path.exists(), "providers.yaml missing at {path:?}");
        let result = load_providers(&path);
        assert!(result.is_ok(), "failed to load providers.yaml: {result:?}");
        let file = result.unwrap();
        assert_eq!(file.providers.len(), 3);
        assert_eq!(file.priority_of("GcGroup"), 1);
        assert_eq!(file.broadcast_exclusions(), vec!["Rodrigo Provee"]);
    }
}
