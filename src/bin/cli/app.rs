use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use study_tracker_lib::catalog::Module;
use study_tracker_lib::config::{self, AppConfig};
use study_tracker_lib::remote::Credentials;
use study_tracker_lib::StudyApp;

/// Global flags that decide which backend and account to use
pub struct ConnectOptions {
    pub config: Option<PathBuf>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signed-in application shared by CLI commands
pub struct App {
    pub study: StudyApp,
}

impl App {
    /// Load the config, build the store and sign in
    pub async fn connect(options: &ConnectOptions) -> Result<Self> {
        let config_path = match &options.config {
            Some(path) => path.clone(),
            None => config::default_path().context("Failed to locate the config directory")?,
        };
        let config = AppConfig::load(&config_path)?;

        let Some(email) = options.email.clone().or(config.email.clone()) else {
            bail!(
                "No account given. Pass --email or set `email` in {}",
                config_path.display()
            );
        };
        let credentials = Credentials {
            email,
            password: options.password.clone().unwrap_or_default(),
        };

        let store = config.backend.build_store()?;
        let mut study = StudyApp::new(store);
        study
            .sign_in(&credentials)
            .await
            .with_context(|| format!("Failed to sign in as {}", credentials.email))?;

        Ok(Self { study })
    }

    /// Find a module by id (case-insensitive, exact match first, then prefix)
    pub fn find_module(&self, query: &str) -> Result<&Module> {
        let modules = self.study.state().modules();
        let query_lower = query.trim().to_lowercase();

        if let Some(module) = modules.iter().find(|m| m.id.to_lowercase() == query_lower) {
            return Ok(module);
        }

        let matches: Vec<&Module> = modules
            .iter()
            .filter(|m| m.id.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!("Module not found: {}", query),
            1 => Ok(matches[0]),
            _ => bail!(
                "Ambiguous module '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|m| format!("  - {}", m.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Resolve a query to an owned module id
    pub fn module_id(&self, query: &str) -> Result<String> {
        self.find_module(query).map(|m| m.id.clone())
    }
}
