//! Check command - validate a config file without connecting

use std::path::PathBuf;

use anyhow::Result;
use spool_config::Config;

/// Load and validate the configuration, then print what would run
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let (path, config) = super::load_config(config_path.as_deref())?;

    println!("config ok: {}", path.display());
    print!("{}", describe(&config));
    Ok(())
}

fn describe(config: &Config) -> String {
    let source = &config.source;
    let output = &config.output;
    let reconnect = &config.reconnect;

    let keywords = source
        .keywords_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string());

    let mut out = String::new();
    out.push_str(&format!("  source:      {}\n", source.url));
    out.push_str(&format!(
        "  auth:        {}\n",
        if source.bearer_token.is_some() { "bearer" } else { "none" }
    ));
    out.push_str(&format!("  keywords:    {}\n", keywords));
    out.push_str(&format!("  output:      {}\n", output.path.display()));
    out.push_str(&format!(
        "  rotation:    every {} records ({:?})\n",
        output.records_per_file, output.compression
    ));
    out.push_str(&format!(
        "  heartbeat:   {}s\n",
        config.heartbeat.seconds_per_heartbeat
    ));
    out.push_str(&format!(
        "  reconnect:   {} attempts per {:?}, delay {:?}..{:?} x{}\n",
        reconnect.connect_limit,
        reconnect.connect_limit_interval,
        reconnect.delay_base,
        reconnect.delay_max,
        reconnect.delay_mult
    ));
    out
}
