//! `citeline.toml` loading

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use citeline_core::AnalysisConfig;
use serde::Deserialize;

/// Analysis settings live in the `[resolver]`, `[graph]` and `[extraction]`
/// tables; `[output]` only affects the CLI.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report path used when `--output` is not given
    #[serde(deserialize_with = "deserialize_env_path")]
    pub report: Option<PathBuf>,
    /// Pretty-print the JSON report
    pub pretty: bool,
    /// Rows shown in the terminal tables
    pub table_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report: None,
            pretty: true,
            table_rows: 10,
        }
    }
}

fn deserialize_env_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| expand_env_vars(&s)).map(PathBuf::from))
}

/// Substitute every `${VAR}` in `s`. `None` if any variable is unset,
/// so an unusable report path falls back to no report.
fn expand_env_vars(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find("${") {
        let close = rest[open..].find('}')? + open;
        out.push_str(&rest[..open]);
        out.push_str(&std::env::var(&rest[open + 2..close]).ok()?);
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    Some(out)
}

impl Config {
    /// Candidate config files, most specific first: `./citeline.toml`,
    /// then `config.toml` in the platform config dir.
    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("citeline.toml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "citeline") {
            paths.push(dirs.config_dir().join("config.toml"));
        }
        paths
    }

    /// First existing candidate, or defaults when there is none.
    pub fn load() -> Result<Self> {
        match Self::candidates().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => {
                log::debug!("no citeline.toml found, using built-in settings");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate one TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let config: Config =
            toml::from_str(&text).with_context(|| format!("Malformed TOML in {}", path.display()))?;
        config
            .analysis
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        log::info!("Using settings from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.output.pretty);
        assert_eq!(config.output.table_rows, 10);
        assert_eq!(config.analysis.resolver.fuzzy_threshold, 0.8);
    }

    #[test]
    fn literal_path_unchanged() {
        assert_eq!(expand_env_vars("out/report.json").as_deref(), Some("out/report.json"));
    }

    #[test]
    fn embedded_variable_expanded() {
        let path = std::env::var("PATH").unwrap();
        assert_eq!(
            expand_env_vars("${PATH}/report.json"),
            Some(format!("{path}/report.json"))
        );
    }

    #[test]
    fn unset_or_unclosed_variable() {
        assert_eq!(expand_env_vars("${CITELINE_UNSET_VAR_12345}/r.json"), None);
        assert_eq!(expand_env_vars("${PATH"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[resolver]
fuzzy_threshold = 0.85

[graph]
pagerank_max_iterations = 200

[output]
report = "out/report.json"
pretty = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.analysis.resolver.fuzzy_threshold, 0.85);
        assert_eq!(config.analysis.graph.pagerank_max_iterations, 200);
        assert_eq!(config.analysis.graph.top_cited, 10);
        assert_eq!(config.output.report, Some(PathBuf::from("out/report.json")));
        assert!(!config.output.pretty);
    }

    #[test]
    fn from_file_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("citeline.toml");
        std::fs::write(&path, "[resolver]\nfuzzy_threshold = 2.0\n").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("fuzzy_threshold"));
    }

    #[test]
    fn from_file_reads_typos() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[resolver.known_typos]\n\"MIT University\" = \"Massachusetts Institute of Technology\"\n",
        )
        .unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.analysis.resolver.known_typos.len(), 1);
    }
}
