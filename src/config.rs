use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::cli::Cli;

/// Optional per-folder configuration loaded from `size-watch.toml` at the
/// root of the watched folder.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    /// Glob patterns for paths to exclude from scanning and watching.
    pub exclude: Option<Vec<String>>,
}

impl FileConfig {
    /// Load configuration from `size-watch.toml` in the given folder.
    ///
    /// Returns a default (empty) configuration if the file does not exist or
    /// cannot be parsed.
    pub fn load(folder: &Path) -> Self {
        let config_path = folder.join("size-watch.toml");

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("warning: failed to parse size-watch.toml: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("warning: failed to read size-watch.toml: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}

/// Compiled file-name filter.
///
/// `*.*` and `*` match every file name, mirroring the conventional default
/// where `*.*` also matches extensionless files. Anything else is a literal
/// glob over the file name.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    raw: String,
    pattern: Option<glob::Pattern>,
}

impl FilterPattern {
    pub fn new(raw: &str) -> anyhow::Result<Self> {
        let pattern = match raw {
            "*.*" | "*" => None,
            other => Some(
                glob::Pattern::new(other)
                    .with_context(|| format!("invalid filter pattern '{other}'"))?,
            ),
        };
        Ok(Self {
            raw: raw.to_string(),
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, file_name: &str) -> bool {
        match &self.pattern {
            Some(p) => p.matches(file_name),
            None => true,
        }
    }
}

/// Frozen configuration for one watch session. Immutable once the watch
/// starts.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Canonicalized root folder.
    pub folder: PathBuf,
    pub filter: FilterPattern,
    pub watch_changed: bool,
    pub watch_created: bool,
    pub watch_deleted: bool,
    pub watch_renamed: bool,
    /// Notification-source errors have no CLI switch; always forwarded.
    pub watch_errors: bool,
    pub recursive: bool,
    /// Exclusion globs from `size-watch.toml`.
    pub exclude: Vec<String>,
    pub json: bool,
}

impl WatchConfig {
    /// Validate the CLI arguments and freeze them into a `WatchConfig`.
    ///
    /// Fails when the folder is missing or not a directory, or when the
    /// filter pattern does not compile. Both are startup errors.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        if !cli.folder.exists() {
            bail!("folder '{}' does not exist", cli.folder.display());
        }
        let folder = cli
            .folder
            .canonicalize()
            .with_context(|| format!("cannot resolve folder '{}'", cli.folder.display()))?;
        if !folder.is_dir() {
            bail!("'{}' is not a directory", folder.display());
        }

        let filter = FilterPattern::new(&cli.filter)?;
        let file_config = FileConfig::load(&folder);

        Ok(Self {
            folder,
            filter,
            watch_changed: !cli.no_changed,
            watch_created: cli.created,
            watch_deleted: cli.deleted,
            watch_renamed: cli.renamed,
            watch_errors: true,
            recursive: cli.recursive,
            exclude: file_config.exclude.unwrap_or_default(),
            json: cli.json,
        })
    }

    /// Returns true if `path` passes the file-name filter and is not
    /// excluded. Used by both the initial scan and live classification so
    /// the two apply identical rules.
    pub fn matches_path(&self, path: &Path) -> bool {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => return false,
        };
        if !self.filter.matches(file_name) {
            return false;
        }
        !self.is_excluded(path)
    }

    /// Returns true if `path` matches any exclusion pattern from config.
    fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude {
            if let Ok(matched) = glob::Pattern::new(pattern)
                && matched.matches(&path_str)
            {
                return true;
            }
            // Also check if any component matches the pattern directly.
            for component in path.components() {
                if let Some(s) = component.as_os_str().to_str()
                    && let Ok(matched) = glob::Pattern::new(pattern)
                    && matched.matches(s)
                {
                    return true;
                }
            }
        }

        false
    }
}
