use crate::shared::{API_URL_ENV, CONFIG_FILE_ENV, DEFAULT_API_URL, RUN_ID_ENV_VAR};
use crate::transport::prelude::TimeoutPolicy;
use anyhow::{Context, Result, anyhow};
use clap::{ArgGroup, Parser};
use directories::BaseDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

#[derive(Parser, Debug, Default)]
#[clap(group = ArgGroup::new("config"))]
pub struct ConfigOptions {
    /// Base address of the text-classification service. Takes precedence over
    /// `apiUrl` in the config file.
    #[arg(long, env = API_URL_ENV, global(true))]
    api_url: Option<String>,

    /// YAML config file. When not set, `<config dir>/textlens/config.yaml` is used
    /// if it exists.
    #[arg(long, env = CONFIG_FILE_ENV, global(true))]
    config_file: Option<PathBuf>,

    /// Override the working directory
    #[arg(long, short = 'C', global(true))]
    working_dir: Option<String>,

    /// When outputting logs, the run-id is the unique value that will define where these go.
    /// In the case that the run-id is re-used, the old values will be overwritten.
    #[arg(long, global(true), env = RUN_ID_ENV_VAR)]
    run_id: Option<String>,
}

/// Contents of the optional YAML config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Millisecond overrides for [`TimeoutPolicy`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimeoutSettings {
    #[serde(default)]
    pub request_ms: Option<u64>,
    #[serde(default)]
    pub quick_batch_ms: Option<u64>,
    #[serde(default)]
    pub full_batch_ms: Option<u64>,
}

impl TimeoutSettings {
    fn apply_to(&self, mut policy: TimeoutPolicy) -> TimeoutPolicy {
        if let Some(ms) = self.request_ms {
            policy.request = Duration::from_millis(ms);
        }
        if let Some(ms) = self.quick_batch_ms {
            policy.quick_batch = Duration::from_millis(ms);
        }
        if let Some(ms) = self.full_batch_ms {
            policy.full_batch = Duration::from_millis(ms);
        }
        policy
    }
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

impl ConfigOptions {
    pub fn generate_run_id() -> String {
        let id = nanoid::nanoid!(4, &nanoid::alphabet::SAFE);
        let now = chrono::Local::now();
        let current_time = now.format("%Y%m%d");
        format!("{}-{}", current_time, id)
    }

    pub fn get_run_id(&self) -> String {
        self.run_id.clone().unwrap_or_else(Self::generate_run_id)
    }

    pub async fn load_config(&self) -> Result<FoundConfig> {
        let current_dir = std::env::current_dir();
        let working_dir = match (current_dir, &self.working_dir) {
            (Ok(cwd), None) => cwd,
            (_, Some(dir)) => PathBuf::from(&dir),
            _ => {
                error!(target: "user", "Unable to get a working dir");
                return Err(anyhow!("Unable to get a working dir"));
            }
        };

        let config_file = match self.find_config_file() {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                let contents = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Unable to read {}", path.display()))?;
                ConfigFile::parse(&contents)
                    .with_context(|| format!("Unable to parse {}", path.display()))?
            }
            None => ConfigFile::default(),
        };

        let found_config = FoundConfig::resolve(
            self.api_url.as_deref(),
            config_file,
            working_dir,
            self.get_run_id(),
        )?;

        debug!("Loaded config {:?}", found_config);

        Ok(found_config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(explicit) = &self.config_file {
            // an explicit file that is missing should fail loudly when read
            return Some(explicit.clone());
        }

        let default_path = BaseDirs::new()?
            .config_dir()
            .join("textlens")
            .join("config.yaml");
        debug!("Checking if {} exists", default_path.display());
        default_path.exists().then_some(default_path)
    }
}

#[derive(Debug, Clone)]
pub struct FoundConfig {
    pub api_url: Url,
    pub timeouts: TimeoutPolicy,
    pub output_dir: PathBuf,
    pub working_dir: PathBuf,
    pub run_id: String,
}

impl FoundConfig {
    pub fn resolve(
        api_url_override: Option<&str>,
        config_file: ConfigFile,
        working_dir: PathBuf,
        run_id: String,
    ) -> Result<Self> {
        let raw_url = api_url_override
            .or(config_file.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL);
        let api_url = parse_api_url(raw_url)?;

        let output_dir = match config_file.output_dir {
            Some(dir) => resolve_relative(&working_dir, &dir),
            None => working_dir.clone(),
        };

        Ok(Self {
            api_url,
            timeouts: config_file.timeouts.apply_to(TimeoutPolicy::default()),
            output_dir,
            working_dir,
            run_id,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid service address {raw}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!(
            "Service address must use http or https, found {other}"
        )),
    }
}

/// Joins relative paths onto `base`.
pub(crate) fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
