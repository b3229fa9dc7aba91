//! `review-desk config`: view or scaffold configuration.

use std::path::Path;

use anyhow::Result;
use review_desk::config::{CONFIG_FILE_NAME, DeskConfig};

use super::super::ConfigCommands;

pub fn cmd_config(
    project_dir: &Path,
    config: &DeskConfig,
    command: Option<ConfigCommands>,
) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            let path = project_dir.join(CONFIG_FILE_NAME);
            if path.exists() {
                println!("# Config file: {}", path.display());
            } else {
                println!("# No {} found, showing defaults", CONFIG_FILE_NAME);
            }
            println!("# Effective values (with env overrides)");
            println!();
            print!("{}", config.to_toml()?);
        }
        Some(ConfigCommands::Init { force }) => {
            let path = DeskConfig::write_default(project_dir, force)?;
            println!("Created {}", path.display());
        }
    }
    Ok(())
}
