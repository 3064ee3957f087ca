use anyhow::{ensure, Result};
use dotenvy::dotenv;
use serde::Deserialize;

const ENV_PREFIX: &str = "INVOICE_";

/// Upper bound for `due_days`, about ten years
pub const MAX_DUE_DAYS: i64 = 3650;

/// Configuration for the application
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Directory exported PDFs are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Days between the issue date and the due date
    #[serde(default = "default_due_days")]
    pub due_days: i64,
    /// Tax percentage a new draft starts with
    #[serde(default)]
    pub default_tax: f64,
    /// File that log output is appended to
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_output_dir() -> String {
    "invoices".to_string()
}

fn default_due_days() -> i64 {
    30
}

fn default_log_file() -> String {
    "invoice_form.log".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            due_days: default_due_days(),
            default_tax: 0.0,
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Load configuration from `INVOICE_`-prefixed environment variables
    pub fn load() -> Result<Self> {
        Self::from_pairs(std::env::vars())
    }

    /// Build configuration from explicit key/value pairs, as if they were
    /// environment variables
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(pairs)?;
        config.validate()
    }

    /// Reject values the calculator and the date arithmetic cannot use
    pub fn validate(self) -> Result<Self> {
        ensure!(
            self.default_tax.is_finite(),
            "default tax must be a finite number, got {}",
            self.default_tax
        );
        ensure!(
            (0..=MAX_DUE_DAYS).contains(&self.due_days),
            "due days must be between 0 and {}, got {}",
            MAX_DUE_DAYS,
            self.due_days
        );
        Ok(self)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Load .env file if it exists
    dotenv().ok();

    Config::load()
}
