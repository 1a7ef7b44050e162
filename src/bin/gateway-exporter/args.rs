use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(version, about = "Exports gateway transfer rates to a metrics backend")]
pub struct Args {
    /// Path to the YAML configuration file.
    #[arg(
        short,
        long,
        env = "GATEWAY_RATES_CONFIG",
        default_value = "/etc/gateway-rates/gateway-rates.yaml"
    )]
    pub config: PathBuf,

    /// Print the default configuration and exit.
    #[arg(long)]
    pub dump: bool,
}
