//! The defect catalog: bilingual seed ingestion, read access, sampling, and
//! usage telemetry.

pub mod error;
pub mod model;
pub mod seed;
pub mod sink;
pub mod store;

pub use error::CatalogError;
pub use model::{Defect, DefectCategory, DefectSelection, DefectUsageEvent};
pub use sink::{ChannelUsageSink, NullUsageSink, SharedUsageSink, UsageSink};
pub use store::CatalogStore;
