//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "CONSENSUS_";

const APP_DIR: &str = "llm-consensus";
const PROJECT_FILES: [&str; 2] = ["consensus.toml", ".consensus.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CONSENSUS_*` environment variables (e.g. `CONSENSUS_SERVER__PORT=9000`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./consensus.toml` or `./.consensus.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/llm-consensus/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }

        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
            ENV_PREFIX,
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
        env_prefix: &str,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project, explicit].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment.merge(Env::prefixed(env_prefix).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/llm-consensus/config.toml if set,
    /// otherwise falls back to ~/.config/llm-consensus/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for `config` command)
    pub fn describe_sources(config_path: Option<&PathBuf>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] Variables: {ENV_PREFIX}<SECTION>__<KEY>"));

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            lines.push(format!("  [{mark}] Explicit: {}", path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./consensus.toml or ./.consensus.toml".into()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{mark}] Global:  {}", path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TEST_PREFIX: &str = "CONSENSUS_LOADER_TEST_UNSET_";

    fn load(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> FileConfig {
        ConfigLoader::figment(global, project, explicit, TEST_PREFIX)
            .extract()
            .unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.consensus.providers.len(), 3);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("llm-consensus"));
    }

    #[test]
    fn test_project_overrides_global_and_keeps_unset_fields() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("consensus.toml");
        fs::write(
            &global,
            "[server]\nport = 4000\n\n[providers.openai]\nmodel = \"gpt-4.1\"\n",
        )
        .unwrap();
        fs::write(&project, "[server]\nport = 5000\n").unwrap();

        let config = load(Some(&global), Some(&project), None);

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.providers.openai.model, "gpt-4.1");
        assert_eq!(config.providers.openai.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_explicit_file_has_highest_file_priority() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("consensus.toml");
        let explicit = dir.path().join("custom.toml");
        fs::write(&project, "[consensus]\nstrategy = \"sequential\"\n").unwrap();
        fs::write(&explicit, "[consensus]\nstrategy = \"parallel\"\nmin_successes = 2\n").unwrap();

        let config = load(None, Some(&project), Some(&explicit));

        assert_eq!(config.consensus.strategy, "parallel");
        assert_eq!(config.consensus.min_successes, 2);
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(Some(&dir.path().join("nope.toml")), None, None);
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/consensus.toml");
        assert!(ConfigLoader::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_describe_sources_mentions_env_prefix() {
        let lines = ConfigLoader::describe_sources(None);
        assert!(lines.iter().any(|l| l.contains("CONSENSUS_")));
    }
}
