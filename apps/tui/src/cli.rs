use clap::Parser;
use study_radar_tui::config::{API_URL_VAR, LOG_PATH_VAR, TIMEOUT_VAR};
use study_radar_tui::nav::{Route, RouteError};

#[derive(Debug, Parser)]
#[command(name = "study-radar", version, about = "Study progress radar")]
pub struct CliArgs {
    /// Print the progress views and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the progress API base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Open the progress screen filtered to this module
    #[arg(long, value_name = "NAME", conflicts_with = "open")]
    pub module: Option<String>,

    /// Start at a location such as `progress?module=Math`
    #[arg(long, value_name = "LOCATION")]
    pub open: Option<String>,

    /// Use a built-in sample backend instead of the API
    #[arg(long)]
    pub demo: bool,

    /// Give up on API requests after this many seconds
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Override the log file used by the terminal UI
    #[arg(long, value_name = "PATH")]
    pub log: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var(API_URL_VAR, url);
        }
        if let Some(path) = &self.log {
            std::env::set_var(LOG_PATH_VAR, path);
        }
        if let Some(secs) = self.timeout_secs {
            std::env::set_var(TIMEOUT_VAR, secs.to_string());
        }
    }

    /// Screen to start on.
    pub fn start_route(&self) -> Result<Route, RouteError> {
        if let Some(module) = &self.module {
            return Ok(Route::progress(module.clone()));
        }
        self.open
            .as_deref()
            .map_or(Ok(Route::Overview), Route::parse)
    }
}
