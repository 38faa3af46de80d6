//! Configuration commands.

use crate::cli::InitConfigArgs;
use crate::config::{default_config_path, preset_config, save_config};
use crate::error::Result;
use crate::output::Formatter;
use spamgate_gatekeeper::SpamGateConfig;

/// Execute the check-config command.
///
/// The configuration was validated while loading, so reaching this point
/// means it is usable. JSON output carries only the (masked) settings.
pub fn execute_check_config(config: &SpamGateConfig, formatter: &Formatter) -> Result<String> {
    let mut output = vec![formatter.format_config(config)?];
    if formatter.is_json() {
        return Ok(output.remove(0));
    }

    if config.keywords().is_empty() {
        output.push(formatter.warning("No spam keywords configured, every analysis will fail"));
    }
    if !config.is_ai_configured() {
        output.push(formatter.warning("API key not set, AI classification disabled"));
    }
    output.push(formatter.success("Configuration is valid"));

    Ok(output.join("\n"))
}

/// Execute the init-config command.
pub fn execute_init_config(args: &InitConfigArgs, formatter: &Formatter) -> Result<String> {
    let path = match &args.output {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    save_config(&preset_config(args.preset), &path, args.force)?;
    Ok(formatter.success(&format!("Configuration written to {}", path.display())))
}
