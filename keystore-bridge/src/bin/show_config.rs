use anyhow::Context;
use keystore_bridge::shared::constants::ENV_PASSWORD;
use keystore_bridge::BridgeConfig;
use std::env;

fn main() -> anyhow::Result<()> {
    keystore_bridge::init();
    let config = BridgeConfig::from_env().context("Failed to load keystore configuration")?;

    println!("{} {} configuration:\n", keystore_bridge::NAME, keystore_bridge::VERSION);
    println!("  Namespace:       {}", config.namespace);
    println!("  Storage dir:     {}", config.storage_dir.display());
    println!("  Value cipher:    {}", config.value_cipher);
    println!(
        "  Password source: {}",
        if env::var_os(ENV_PASSWORD).is_some() { ENV_PASSWORD } else { "(interactive prompt)" }
    );
    Ok(())
}
