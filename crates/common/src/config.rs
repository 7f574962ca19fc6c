//! Framework configuration
//!
//! Framework parameters, user settings and the timestamped results folder
//! are explicit context objects. A test batch builds one [`RunContext`] and
//! passes it (or pieces of it) to the datatables and reports it creates.

use ini::{Ini, ParseOption};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::{AutopiaError, Result};
use crate::properties;
use crate::types::FrameworkType;
use crate::util;

/// Default date format (strftime) used for timestamps
pub const DEFAULT_DATE_FORMAT: &str = "%d-%b-%Y %I:%M:%S %p";

/// Settings key holding the date format
pub const DATE_FORMAT_KEY: &str = "DateFormatString";

const CUSTOM_CONFIG_FILE: &str = "config.custom.properties";
const DEFAULT_CONFIG_FILE: &str = "config.default.properties";

/// Flag shared across a test batch to request that remaining tests stop
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Framework level parameters for one test batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkParameters {
    pub framework_type: Option<FrameworkType>,
    pub base_path: Option<PathBuf>,
    pub base_package_name: Option<String>,
    pub run_configuration: Option<String>,
    pub execution_environment: Option<String>,
    /// Object synchronization timeout in seconds
    pub object_sync_timeout: u64,
    /// Page load timeout in seconds
    pub page_load_timeout: u64,
    pub date_format: String,
    #[serde(skip)]
    pub stop_signal: StopSignal,
}

impl Default for FrameworkParameters {
    fn default() -> Self {
        Self {
            framework_type: None,
            base_path: None,
            base_package_name: None,
            run_configuration: None,
            execution_environment: None,
            object_sync_timeout: 20,
            page_load_timeout: 120,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            stop_signal: StopSignal::new(),
        }
    }
}

impl FrameworkParameters {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
            ..Default::default()
        }
    }

    pub fn with_run_configuration(mut self, run_configuration: impl Into<String>) -> Self {
        self.run_configuration = Some(run_configuration.into());
        self
    }

    pub fn with_framework_type(mut self, framework_type: FrameworkType) -> Self {
        self.framework_type = Some(framework_type);
        self
    }

    pub fn base_path(&self) -> Result<&Path> {
        self.base_path.as_deref().ok_or_else(|| {
            error!("FrameworkParameters.basePath is not set!");
            AutopiaError::framework("FrameworkParameters.basePath is not set!")
        })
    }

    pub fn run_configuration(&self) -> Result<&str> {
        self.run_configuration.as_deref().ok_or_else(|| {
            error!("FrameworkParameters.runConfiguration is not set!");
            AutopiaError::framework("FrameworkParameters.runConfiguration is not set!")
        })
    }

    /// Whether the remaining tests of the batch should be skipped
    pub fn stop_execution(&self) -> bool {
        self.stop_signal.is_raised()
    }
}

/// User settings read from the framework properties file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    values: HashMap<String, String>,
    source: Option<PathBuf>,
}

impl Settings {
    /// Load `config.custom.properties`, falling back to `config.default.properties`
    pub fn load(params: &FrameworkParameters) -> Result<Self> {
        let folder = params
            .base_path()?
            .join("src")
            .join("test")
            .join("resources");

        let mut config_file = folder.join(CUSTOM_CONFIG_FILE);
        if !config_file.exists() {
            config_file = folder.join(DEFAULT_CONFIG_FILE);
        }

        Self::from_file(&config_file)
    }

    /// Parse a `.properties` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            error!(path = %path.display(), "Failed to load config file: {}", e);
            AutopiaError::framework("IOException while loading the config settings file")
        })?;

        // escapes are decoded up front and re-encoded for the ini parser
        let normalized = properties::to_ini(&source)?;
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: true,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(&normalized, options).map_err(|e| {
            error!(path = %path.display(), "Failed to parse config file: {}", e);
            AutopiaError::Properties(e.to_string())
        })?;

        let values: HashMap<String, String> = ini
            .general_section()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        info!(path = %path.display(), count = values.len(), "Loaded settings");
        Ok(Self {
            values,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            values,
            source: None,
        }
    }

    /// File the settings were loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Date format from `DateFormatString`, as a strftime pattern
    pub fn date_format(&self) -> String {
        match self.get(DATE_FORMAT_KEY) {
            Some(format) if !format.trim().is_empty() => util::to_strftime(format.trim()),
            _ => DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }
}

/// Execution context of one test batch
///
/// The results folder is created on first request and reused afterwards.
#[derive(Debug)]
pub struct RunContext {
    params: FrameworkParameters,
    settings: Settings,
    results_folder: OnceCell<PathBuf>,
}

impl RunContext {
    pub fn new(params: FrameworkParameters, settings: Settings) -> Self {
        Self {
            params,
            settings,
            results_folder: OnceCell::new(),
        }
    }

    /// Build a context, loading settings from the base path
    pub fn load(params: FrameworkParameters) -> Result<Self> {
        let settings = Settings::load(&params)?;
        Ok(Self::new(params, settings))
    }

    pub fn params(&self) -> &FrameworkParameters {
        &self.params
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.params.stop_signal.clone()
    }

    /// Date format from the settings file, else the one on the parameters
    pub fn date_format(&self) -> String {
        match self.settings.get(DATE_FORMAT_KEY) {
            Some(_) => self.settings.date_format(),
            None => util::to_strftime(&self.params.date_format),
        }
    }

    /// Timestamped results folder, `<base>/test-results/<run config>/Run_<time>`
    pub fn results_folder(&self) -> Result<&Path> {
        self.results_folder
            .get_or_try_init(|| -> Result<PathBuf> {
                let base_path = self.params.base_path()?;
                let run_configuration = self.params.run_configuration()?;
                let timestamp = util::timestamp_for_path(&self.date_format())?;

                let folder = base_path
                    .join("test-results")
                    .join(run_configuration)
                    .join(format!("Run_{}", timestamp));
                std::fs::create_dir_all(&folder)?;

                info!(path = %folder.display(), "Created results folder");
                Ok(folder)
            })
            .map(PathBuf::as_path)
    }

    /// Path of the execution log written by the test harness
    pub fn execution_log_path(&self) -> Result<PathBuf> {
        let path = self.params.base_path()?.join("test.execution.log");
        debug!(path = %path.display(), "Resolved execution log");
        Ok(path)
    }
}
