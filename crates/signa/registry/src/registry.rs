use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use signa_types::{PatternDefinition, Severity, Symbol};
use tracing::{debug, info};

use crate::builtin;
use crate::error::{RegistryError, RegistryResult};

/// Immutable, ordered table of emergency patterns.
///
/// Iteration order is registration order; the pipeline reports events that
/// fire on the same tick in this order.
#[derive(Clone, Debug)]
pub struct PatternRegistry {
    patterns: Vec<Arc<PatternDefinition>>,
}

/// On-disk layout: a list of `[[pattern]]` tables.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(rename = "pattern", default)]
    patterns: Vec<PatternDefinition>,
}

impl PatternRegistry {
    /// Validate and freeze a list of definitions.
    ///
    /// Rejects an empty list, duplicate names and zero-length patterns.
    pub fn new(definitions: Vec<PatternDefinition>) -> RegistryResult<Self> {
        if definitions.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(definitions.len());
        for def in &definitions {
            if def.pattern.is_empty() {
                return Err(RegistryError::EmptyPattern(def.name.clone()));
            }
            if !seen.insert(def.name.as_str()) {
                return Err(RegistryError::DuplicateName(def.name.clone()));
            }
        }

        debug!(patterns = definitions.len(), "pattern registry validated");
        Ok(Self::from_validated(definitions))
    }

    /// The built-in distress signatures.
    pub fn builtin() -> Self {
        Self::from_validated(builtin::definitions())
    }

    /// Start assembling a registry from literals.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Parse a TOML document of `[[pattern]]` tables.
    pub fn from_toml_str(contents: &str) -> RegistryResult<Self> {
        let file: RegistryFile = toml::from_str(contents)?;
        Self::new(file.patterns)
    }

    /// Load a registry file from disk.
    pub fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), patterns = registry.len(), "pattern registry loaded");
        Ok(registry)
    }

    fn from_validated(definitions: Vec<PatternDefinition>) -> Self {
        Self {
            patterns: definitions.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PatternDefinition>> {
        self.patterns.iter().find(|p| p.name == name)
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> &[Arc<PatternDefinition>] {
        &self.patterns
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternDefinition> {
        self.patterns.iter().map(|p| p.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Always false for a constructed registry; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Length of the longest registered pattern.
    pub fn max_pattern_len(&self) -> usize {
        self.patterns.iter().map(|p| p.len()).max().unwrap_or(0)
    }
}

/// Incremental registry construction from pattern literals.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    definitions: Vec<PatternDefinition>,
    error: Option<RegistryError>,
}

impl RegistryBuilder {
    /// Add a pattern given as a literal such as `"ACACAC"`.
    ///
    /// The first invalid literal is remembered and reported by [`build`](Self::build).
    pub fn pattern(
        mut self,
        name: impl Into<String>,
        literal: &str,
        severity: Severity,
        action: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        match Symbol::parse_sequence(literal) {
            Ok(symbols) => self.definitions.push(PatternDefinition::new(
                name,
                symbols,
                severity,
                action,
                description,
            )),
            Err(source) => {
                if self.error.is_none() {
                    self.error = Some(RegistryError::UnknownSymbol { name, source });
                }
            }
        }
        self
    }

    /// Add an already-built definition.
    pub fn definition(mut self, definition: PatternDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn build(self) -> RegistryResult<PatternRegistry> {
        match self.error {
            Some(e) => Err(e),
            None => PatternRegistry::new(self.definitions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_registry_is_valid() {
        let builtin = PatternRegistry::builtin();
        let revalidated = PatternRegistry::new(builtin::definitions()).unwrap();
        assert_eq!(builtin.names(), revalidated.names());
        assert_eq!(
            builtin.names(),
            vec![
                "domestic_violence",
                "medical_emergency",
                "kidnapping",
                "urgent_help",
                "imminent_danger"
            ]
        );
        assert_eq!(builtin.max_pattern_len(), 6);
    }

    #[test]
    fn rejects_empty_registry() {
        assert!(matches!(PatternRegistry::new(vec![]), Err(RegistryError::Empty)));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = PatternRegistry::builder()
            .pattern("sos", "ABC", Severity::High, "call", "")
            .pattern("sos", "DDD", Severity::Low, "call", "")
            .build();
        assert!(matches!(result, Err(RegistryError::DuplicateName(n)) if n == "sos"));
    }

    #[test]
    fn rejects_zero_length_pattern() {
        let def = PatternDefinition::new("blank", vec![], Severity::Low, "noop", "");
        let result = PatternRegistry::new(vec![def]);
        assert!(matches!(result, Err(RegistryError::EmptyPattern(n)) if n == "blank"));
    }

    #[test]
    fn builder_reports_first_bad_literal() {
        let result = PatternRegistry::builder()
            .pattern("ok", "AB", Severity::Low, "noop", "")
            .pattern("bad", "AXB", Severity::Low, "noop", "")
            .pattern("worse", "", Severity::Low, "noop", "")
            .build();
        assert!(matches!(result, Err(RegistryError::UnknownSymbol { name, .. }) if name == "bad"));
    }

    #[test]
    fn lookup_preserves_registration_order() {
        let registry = PatternRegistry::builder()
            .pattern("second", "BB", Severity::High, "b", "")
            .pattern("first", "AA", Severity::Critical, "a", "")
            .build()
            .unwrap();
        assert_eq!(registry.names(), vec!["second", "first"]);
        assert_eq!(registry.get("first").unwrap().literal(), "AA");
        assert!(registry.get("third").is_none());
    }

    #[test]
    fn parses_toml_document() {
        let doc = r#"
            [[pattern]]
            name = "domestic_violence"
            pattern = "ABC"
            severity = "critical"
            action = "contact_local_authorities"
            description = "Domestic violence"

            [[pattern]]
            name = "medical_emergency"
            pattern = "DDDDD"
            severity = "high"
            action = "contact_medical_services"
        "#;
        let registry = PatternRegistry::from_toml_str(doc).unwrap();
        assert_eq!(registry.len(), 2);
        let medical = registry.get("medical_emergency").unwrap();
        assert_eq!(medical.severity, Severity::High);
        assert!(medical.description.is_empty());
    }

    #[test]
    fn toml_with_no_patterns_is_empty_error() {
        assert!(matches!(
            PatternRegistry::from_toml_str(""),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn toml_with_unknown_symbol_is_parse_error() {
        let doc = r#"
            [[pattern]]
            name = "bad"
            pattern = "AZ"
            severity = "low"
            action = "noop"
        "#;
        assert!(matches!(
            PatternRegistry::from_toml_str(doc),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[pattern]]\nname = \"sos\"\npattern = \"ACAC\"\nseverity = \"critical\"\naction = \"alert\""
        )
        .unwrap();
        let registry = PatternRegistry::load(file.path()).unwrap();
        assert_eq!(registry.names(), vec!["sos"]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = PatternRegistry::load("/nonexistent/signa/patterns.toml");
        assert!(matches!(result, Err(RegistryError::Io(_))));
    }
}
