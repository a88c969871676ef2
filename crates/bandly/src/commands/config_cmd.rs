//! Configuration commands: profiles, token storage, introspection.

use bandly_config::{Config, Profile, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;

use super::util;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            backend,
            profile,
            token_env,
        } => {
            // Validate before writing anything.
            let _: url::Url = backend.parse().map_err(|_| CliError::Validation {
                field: "backend".into(),
                reason: format!("invalid URL: {backend}"),
            })?;

            let mut cfg = load_config_or_default();
            cfg.profiles.insert(
                profile.clone(),
                Profile {
                    backend,
                    token_env,
                    ..Profile::default()
                },
            );
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile.clone());
            }
            save_config(&cfg)?;

            util::note(
                global,
                &format!(
                    "Profile '{profile}' saved to {}.\n\
                     Store a token with: bandly config set-token --profile {profile}",
                    config_path().display()
                ),
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = load_config_or_default();
            util::note(global, &render_redacted(&cfg));
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = load_config_or_default();
            let name = profile.unwrap_or_else(|| active_profile_name(global, &cfg));

            let token = dialoguer::Password::new()
                .with_prompt(format!("Token for profile '{name}'"))
                .interact()
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

            bandly_config::store_token(&name, &token)?;
            util::note(global, &format!("Token stored in the keyring for '{name}'."));
            Ok(())
        }
    }
}

/// Effective config as TOML with every token field blanked.
fn render_redacted(cfg: &Config) -> String {
    let mut redacted = cfg.clone();
    for profile in redacted.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("<redacted>".to_owned());
        }
    }
    toml::to_string_pretty(&redacted).unwrap_or_default()
}
