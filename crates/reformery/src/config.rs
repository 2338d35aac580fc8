//! Flag-aware wrappers over `reformery-config`.
//!
//! Precedence for every setting: CLI flag / env var > profile > defaults.
//! This is the single place where CLI options cross into a core
//! `ClientConfig`.

use std::time::Duration;

use secrecy::SecretString;

use reformery_config::{Config, config_path, load_config_or_default, profile_to_client_config};
use reformery_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build the `ClientConfig` for this invocation.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut client = match cfg.profiles.get(&profile_name) {
        Some(profile) => {
            let mut profile = profile.clone();
            if let Some(ref url) = global.api_url {
                profile.api_url.clone_from(url);
            }
            profile_to_client_config(&profile, &profile_name, &cfg.defaults)?
        }
        None => {
            // An explicitly requested profile must exist.
            if global.profile.is_some() {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(&cfg),
                });
            }
            let api_url = global.api_url.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            ClientConfig {
                api_url,
                tls: if cfg.defaults.insecure {
                    TlsVerification::DangerAcceptInvalid
                } else {
                    TlsVerification::SystemDefaults
                },
                timeout: Duration::from_secs(cfg.defaults.timeout),
                notification_ttl: Duration::from_secs(cfg.defaults.notification_ttl_secs),
                token: None,
            }
        }
    };

    if let Some(ref token) = global.token {
        client.token = Some(SecretString::from(token.clone()));
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(profile = %profile_name, api_url = %client.api_url, "resolved client config");
    Ok(client)
}
