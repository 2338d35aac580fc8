//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use reformery_config::{Config, Profile, config_path, load_config_or_default, save_config, store_token};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const REDACTED: &str = "********";

fn invalid(field: &str, reason: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Copy of `cfg` safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    cfg
}

fn prompt_token() -> Result<String, CliError> {
    let token = rpassword::prompt_password("Session token: ").map_err(prompt_err)?;
    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(invalid("token", "value cannot be empty"));
    }
    Ok(token)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config_path();
            eprintln!("Reformery CLI configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("Studio API URL")
                .default("http://localhost:5000".into())
                .interact_text()
                .map_err(prompt_err)?;

            let insecure = Confirm::new()
                .with_prompt("Accept self-signed certificates?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            let mut cfg = load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_url,
                    insecure: insecure.then_some(true),
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());

            let written = save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", written.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Sign in with: reformery login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&load_config_or_default());
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n({e})")),
                |c| c.default_profile_name().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), false);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "api_url" | "api-url" => profile.api_url = value,
                "token_env" | "token-env" => profile.token_env = Some(value),
                "insecure" => {
                    profile.insecure = Some(
                        value
                            .parse()
                            .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
                    );
                }
                "timeout" => {
                    profile.timeout = Some(
                        value
                            .parse()
                            .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
                    );
                }
                "notification_ttl_secs" | "notification-ttl-secs" => {
                    profile.notification_ttl_secs =
                        Some(value.parse().map_err(|_| {
                            invalid("notification_ttl_secs", "must be a number (seconds)")
                        })?);
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: api_url, token_env, \
                             insecure, timeout, notification_ttl_secs, ca_cert"
                        ),
                    });
                }
            }

            save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = load_config_or_default();
            let default = cfg.default_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: reformery config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let token = prompt_token()?;
            store_token(&profile_name, &token)?;
            eprintln!("✓ Session token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
