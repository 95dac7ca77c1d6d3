//! Typed records for the API documents and the read-only views over them.

pub mod rain;
pub mod snow;

pub use rain::{DRY_INTENSITY, ForecastEntry, Geometry, Rain, RainData, RainProperties};
pub use snow::{
    AvalancheRiskPerLocation, FreshSnowIndex, FreshSnowPerExposition, Location,
    MassifAvalancheRisk, Snow, SnowData, SnowDepth, SnowDepthRecord, SnowProperties,
    TotalSnowPerExposition,
};
