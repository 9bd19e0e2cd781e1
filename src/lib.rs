pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{BasalamSource, DigikalaSource, SyntheticCatalog, TorobSource};
pub use config::{sources::SourcesConfig, CliConfig};
pub use core::engine::{EngineConfig, PriceFinder};
pub use domain::model::{
    Observation, PriceReport, SearchOutcome, SearchRequest, SourceStats, Strategy,
};
pub use domain::ports::ObservationSource;
pub use utils::error::{FinderError, Result};
