//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{schema::FetchBackend, Config, ConfigManager, LOCAL_CONFIG_FILE};
use crate::error::{LookupError, LookupResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;
use tokio::fs;

const VALID_KEYS: [&str; 6] = [
    "cache.path",
    "aws.profile",
    "aws.role_arn_template",
    "aws.session_name",
    "aws.with_decryption",
    "fetch.backend",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> LookupResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value, local }) => {
            if local {
                set_local_value(&key, &value).await?
            } else {
                set_value(manager, &key, &value).await?
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> LookupResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> LookupResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());

    Ok(())
}

/// Set a key in the global config. Only that file is rewritten, so values
/// coming from a project-local config are not copied into it.
async fn set_value(manager: &ConfigManager, key: &str, value: &str) -> LookupResult<()> {
    let ctx = UiContext::detect();
    let mut config = manager.load().await?;

    check_key(&ctx, key)?;
    apply_value(&mut config, key, value)?;

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));
    Ok(())
}

fn check_key(ctx: &UiContext, key: &str) -> LookupResult<()> {
    if VALID_KEYS.contains(&key) {
        return Ok(());
    }

    ui::step_error_detail(ctx, "Unknown config key", key);
    ui::remark(ctx, "Valid keys:");
    for valid in VALID_KEYS {
        ui::remark(ctx, &format!("  {}", valid));
    }
    Err(LookupError::User(format!("Unknown config key: {}", key)))
}

fn apply_value(config: &mut Config, key: &str, value: &str) -> LookupResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["cache", "path"] => config.cache.path = PathBuf::from(value),
        ["aws", "profile"] => config.aws.profile = Some(value.to_string()),
        ["aws", "role_arn_template"] => config.aws.role_arn_template = value.to_string(),
        ["aws", "session_name"] => config.aws.session_name = value.to_string(),
        ["aws", "with_decryption"] => config.aws.with_decryption = parse_bool(value)?,
        ["fetch", "backend"] => config.fetch.backend = parse_backend(value)?,
        _ => return Err(LookupError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

async fn set_local_value(key: &str, value: &str) -> LookupResult<()> {
    let ctx = UiContext::detect();

    // Validate against the schema before touching the file
    check_key(&ctx, key)?;
    apply_value(&mut Config::default(), key, value)?;
    let toml_value = if key == "aws.with_decryption" {
        toml::Value::Boolean(parse_bool(value)?)
    } else {
        toml::Value::String(value.to_string())
    };

    let cwd =
        std::env::current_dir().map_err(|e| LookupError::io("getting current directory", e))?;
    let local_path = cwd.join(LOCAL_CONFIG_FILE);

    let mut doc: toml::Value = if local_path.exists() {
        let content = fs::read_to_string(&local_path)
            .await
            .map_err(|e| LookupError::io(format!("reading {}", local_path.display()), e))?;
        content
            .parse()
            .map_err(|e: toml::de::Error| LookupError::ConfigInvalid {
                path: local_path.clone(),
                reason: e.to_string(),
            })?
    } else {
        toml::Value::Table(toml::map::Map::new())
    };

    set_toml_value(&mut doc, key, toml_value)?;

    let content = toml::to_string_pretty(&doc)?;
    fs::write(&local_path, content)
        .await
        .map_err(|e| LookupError::io(format!("writing {}", local_path.display()), e))?;

    ui::step_ok(
        &ctx,
        &format!("Set {} = {} in {}", key, value, local_path.display()),
    );
    Ok(())
}

/// Set a dot-separated key in a TOML tree, creating intermediate tables
fn set_toml_value(doc: &mut toml::Value, key: &str, value: toml::Value) -> LookupResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, parents)) = parts.split_last() else {
        return Err(LookupError::User(format!("Invalid config key: {}", key)));
    };

    let mut current = doc;
    for &part in parents {
        current = current
            .as_table_mut()
            .ok_or_else(|| LookupError::User(format!("Expected table at key: {}", part)))?
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .ok_or_else(|| LookupError::User(format!("Expected table for key: {}", key)))?;

    table.insert((*leaf).to_string(), value);
    Ok(())
}

fn parse_bool(value: &str) -> LookupResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(LookupError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_backend(value: &str) -> LookupResult<FetchBackend> {
    match value {
        "sdk" => Ok(FetchBackend::Sdk),
        "process" => Ok(FetchBackend::Process),
        _ => Err(LookupError::User(format!(
            "Invalid fetch backend: {}. Use sdk/process",
            value
        ))),
    }
}
