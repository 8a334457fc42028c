//! Init and Config commands.

use anyhow::{Context, bail};

use crate::config::Settings;

/// Run init command - create configuration file.
pub fn run_init(force: bool) -> anyhow::Result<()> {
    let config_path = Settings::default_config_path();

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    let path = Settings::init_config_file(force)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Unable to write configuration file")?;
    println!("Created configuration file at: {}", path.display());
    println!("Edit this file to customize your settings.");
    Ok(())
}

/// Run config command - display current configuration.
pub fn run_config(config: &Settings) -> anyhow::Result<()> {
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    let toml_str = toml::to_string_pretty(config).context("Unable to render configuration")?;
    println!("{toml_str}");
    Ok(())
}
