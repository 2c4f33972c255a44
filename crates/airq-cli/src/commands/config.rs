//! Config command - inspect and create the config file.

use anyhow::{Context, Result};

use crate::cli::ConfigAction;
use crate::config::Config;
use crate::format::FormatOptions;
use crate::style;
use crate::util::write_output;

pub fn cmd_config(action: ConfigAction, config: &Config, opts: &FormatOptions) -> Result<()> {
    let content = match action {
        ConfigAction::Show => {
            if opts.json {
                opts.as_json(config)?
            } else {
                toml::to_string_pretty(config).context("Failed to serialize config")?
            }
        }
        ConfigAction::Path => format!("{}\n", Config::path().display()),
        ConfigAction::Init => {
            let path = Config::path();
            if path.exists() {
                style::format_warning(
                    &format!("Config already exists at {}", path.display()),
                    opts.no_color,
                ) + "\n"
            } else {
                Config::default().save()?;
                style::format_success(
                    &format!("Created config at {}", path.display()),
                    opts.no_color,
                ) + "\n"
            }
        }
    };

    write_output(None, &content)
}
