pub mod sources;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "price-finder")]
#[command(about = "Aggregates marketplace price listings and suggests a fair price")]
pub struct CliConfig {
    /// Product name to search for
    pub product_name: String,

    #[arg(long, help = "Your own calculated base price, blended into the suggestion")]
    pub calculated_price: Option<f64>,

    #[arg(
        long,
        default_value = "balanced",
        help = "Pricing strategy: competitive, value-based or balanced"
    )]
    pub strategy: String,

    #[arg(long, help = "Path to a TOML file with marketplace source settings")]
    pub sources_config: Option<String>,

    #[arg(long, help = "Write the JSON report to this file instead of stdout")]
    pub output: Option<String>,

    #[arg(
        long,
        help = "Do not substitute simulated listings for sources that return nothing"
    )]
    pub no_synthetic: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
