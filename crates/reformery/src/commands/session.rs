//! Login / logout.

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use reformery_config::{clear_token, load_config_or_default, save_config, store_token};
use reformery_core::{CoreError, User};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;

use super::util;

pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let client = config::resolve_client_config(global)?.build_client()?;

    let email = match args.email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password =
        SecretString::from(rpassword::prompt_password("Password: ").map_err(util::prompt_err)?);

    let session = client
        .login(email.trim(), &password)
        .await
        .map_err(CoreError::from)?;

    let token = session.token.expose_secret();
    match store_token(&profile_name, token) {
        Ok(()) => {
            if !global.quiet {
                eprintln!("✓ Session token stored in system keyring");
            }
        }
        Err(e) => {
            // Fall back to the profile's plaintext slot, if there is a profile.
            tracing::warn!(error = %e, "keyring unavailable, saving token to config file");
            let profile = cfg
                .profiles
                .get_mut(&profile_name)
                .ok_or_else(|| CliError::from(e))?;
            profile.token = Some(token.to_owned());
            let path = save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Session token saved to {}", path.display());
            }
        }
    }

    if !global.quiet {
        let who = session
            .user
            .as_ref()
            .map_or(email.as_str(), User::display_name);
        eprintln!("Signed in as {who} (profile '{profile_name}')");
    }
    Ok(())
}

pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    // A missing keyring backend is not fatal here; the failure is logged.
    let _ = clear_token(&profile_name);
    if let Some(profile) = cfg.profiles.get_mut(&profile_name) {
        if profile.token.take().is_some() {
            save_config(&cfg)?;
        }
    }

    if !global.quiet {
        eprintln!("✓ Signed out of profile '{profile_name}'");
    }
    Ok(())
}
