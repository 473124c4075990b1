//! Layered session configuration: defaults, optional file, `SIGNA__*` environment

use std::path::Path;

use signa_registry::PatternRegistry;
use signa_runtime::SessionConfig;
use tracing::{debug, info};

use crate::error::CliResult;

/// Environment prefix; nested keys use a double underscore,
/// e.g. `SIGNA__DEBOUNCE__CONFIRM_FRAMES=6`.
const ENV_PREFIX: &str = "SIGNA";
const ENV_SEPARATOR: &str = "__";

/// Load the session configuration.
pub fn load_session_config(path: Option<&Path>) -> CliResult<SessionConfig> {
    let mut builder =
        config::Config::builder().add_source(config::Config::try_from(&SessionConfig::default())?);

    if let Some(path) = path {
        debug!(path = %path.display(), "reading configuration file");
        builder = builder.add_source(config::File::from(path).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    Ok(builder.build()?.try_deserialize()?)
}

/// Built-in registry, or the one in `path`.
pub fn load_registry(path: Option<&Path>) -> CliResult<PatternRegistry> {
    match path {
        Some(path) => Ok(PatternRegistry::load(path)?),
        None => {
            let registry = PatternRegistry::builtin();
            info!(patterns = registry.len(), "using built-in pattern registry");
            Ok(registry)
        }
    }
}
