pub mod engine;
pub mod normalize;
pub mod outliers;
pub mod report;
pub mod stats;
pub mod strategy;

pub use crate::domain::model::{Observation, PriceReport, SearchOutcome, SearchRequest};
pub use crate::domain::ports::ObservationSource;
pub use crate::utils::error::Result;
