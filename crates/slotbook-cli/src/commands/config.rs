//! Configuration commands.

use std::path::Path;

use slotbook_engine::EngineConfig;

use crate::error::CliResult;

/// Dump the current configuration to stdout.
pub fn dump(config: &EngineConfig, path: Option<&Path>) -> CliResult<()> {
    let toml_str = config.to_toml_string()?;
    match path {
        Some(path) => println!("# config.toml ({})", path.display()),
        None => println!("# config.toml (defaults)"),
    }
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &EngineConfig) -> CliResult<()> {
    config.validate()?;
    println!(
        "Configuration is valid: {} working hours ({:02}:00-{:02}:00), cache ttl {}s.",
        config.working_hours.slots_per_day(),
        config.working_hours.start_hour,
        config.working_hours.end_hour,
        config.cache.ttl_secs
    );
    Ok(())
}
