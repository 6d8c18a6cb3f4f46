// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use colored::Colorize;

use super::Context;
use crate::cli::ConfigAction;
use crate::config::{PreferenceKey, Preferences};
use crate::display;
use crate::error::CliError;

const SET_USAGE: &str = "Usage: shelfmark config set <key> <value>";
const GET_USAGE: &str = "Usage: shelfmark config get <key>";

fn parse_key(key: &str) -> Result<PreferenceKey, CliError> {
    key.parse().map_err(|e: anyhow::Error| CliError::usage(e.to_string()))
}

fn shown(value: Option<String>) -> String {
    value.unwrap_or_else(|| "not set".dimmed().to_string())
}

pub fn run(
    ctx: &Context,
    action: ConfigAction,
    key: Option<&str>,
    value: Option<&str>,
) -> Result<(), CliError> {
    match action {
        ConfigAction::Set => {
            let (Some(key), Some(value)) = (key, value) else {
                return Err(CliError::usage_with("Missing key or value", SET_USAGE));
            };
            let key = parse_key(key)?;

            let mut prefs = ctx.prefs.clone();
            prefs
                .set(key, value)
                .map_err(|e| CliError::usage(format!("{:#}", e)))?;
            ctx.store.save(&prefs)?;

            display::success(&format!("Set {} = {}", key, shown(prefs.get(key))));
        }
        ConfigAction::Get => {
            let Some(key) = key else {
                return Err(CliError::usage_with("Missing key", GET_USAGE));
            };
            let key = parse_key(key)?;

            println!();
            println!("  {}: {}", key.as_str().cyan(), shown(ctx.prefs.get(key)));
            println!();
        }
        ConfigAction::List => show(ctx, &ctx.prefs),
        ConfigAction::Reset => {
            ctx.store.reset()?;
            display::success("Configuration reset to defaults");
        }
    }
    Ok(())
}

fn show(ctx: &Context, prefs: &Preferences) {
    display::heading("Shelfmark CLI Configuration");
    println!();
    for key in PreferenceKey::ALL {
        println!("  {:<8} {}", format!("{}:", key).cyan(), shown(prefs.get(key)));
    }
    if ctx.url != prefs.url {
        display::hint(&format!("  (this invocation uses {})", ctx.url));
    }
    println!();
    display::hint(&format!("Config file: {}", ctx.store.path().display()));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreferencesStore;
    use crate::error::exit_codes;
    use tempfile::TempDir;

    fn context() -> (TempDir, Context) {
        let dir = TempDir::new().unwrap();
        let store = PreferencesStore::at(dir.path().join("config.json"));
        (dir, Context::load(store, None))
    }

    #[test]
    fn test_set_writes_file() {
        let (_dir, ctx) = context();
        run(&ctx, ConfigAction::Set, Some("limit"), Some("25")).unwrap();
        assert_eq!(ctx.store.load().effective_limit(), 25);
    }

    #[test]
    fn test_missing_arguments_are_usage_errors() {
        let (_dir, ctx) = context();
        let err = run(&ctx, ConfigAction::Set, Some("url"), None).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USAGE);
        assert!(err.hint().unwrap().contains("config set"));

        let err = run(&ctx, ConfigAction::Get, None, None).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USAGE);
        assert!(!ctx.store.path().exists());
    }

    #[test]
    fn test_invalid_values_do_not_touch_the_file() {
        let (_dir, ctx) = context();
        let err = run(&ctx, ConfigAction::Set, Some("colour"), Some("red")).unwrap_err();
        assert!(err.to_string().contains("Valid keys"));

        let err = run(&ctx, ConfigAction::Set, Some("limit"), Some("-3")).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USAGE);
        assert!(!ctx.store.path().exists());
    }
}
