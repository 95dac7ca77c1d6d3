use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Where an avalanche risk applies, e.g. `{"location_type": "alti", "value": "< 2200"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub location_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvalancheRiskPerLocation {
    pub avalanche_risk: i32,
    pub risk_evolution: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MassifAvalancheRisk {
    pub description: String,
    pub avalanche_risk_max: i32,
    pub time: String,
    pub dangerous_exposition: Vec<String>,
    pub avalanche_risk_per_location: Vec<AvalancheRiskPerLocation>,
}

/// Snow depth measured at one altitude on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnowDepth {
    pub altitude: i32,
    pub date: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshSnowPerExposition {
    pub time: String,
    pub exposition: String,
    pub fresh_snow_depth: Vec<SnowDepth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalSnowPerExposition {
    pub time: String,
    pub exposition: String,
    /// Altitude above which the slope is snow-covered.
    pub snow_limit: i32,
    pub total_snow_depth: Vec<SnowDepth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnowProperties {
    pub massif_name: String,
    pub massif_altitude_min: i32,
    pub massif_altitude_max: i32,
    pub massif_avalanche_risk: MassifAvalancheRisk,
    pub fresh_snow_per_exposition: Vec<FreshSnowPerExposition>,
    pub avalanche_report: String,
    pub total_snow_per_exposition: Vec<TotalSnowPerExposition>,
}

/// Body of a massif snow report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnowData {
    #[serde(rename = "type")]
    pub kind: String,
    pub update_time: String,
    pub properties: SnowProperties,
}

/// Flattened total snow depth, one row per exposition and altitude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnowDepthRecord {
    pub exposition: String,
    pub altitude: i32,
    pub total_snow_depth: i32,
}

/// Fresh snow keyed by date, then by `(altitude, exposition)`.
pub type FreshSnowIndex = BTreeMap<String, HashMap<(i32, String), i32>>;

/// Read-only view over a massif snow and avalanche report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snow {
    raw_data: SnowData,
}

impl Snow {
    pub fn new(raw_data: SnowData) -> Self {
        Self { raw_data }
    }

    pub fn from_json(body: &str) -> Result<Self, ModelError> {
        let raw_data: SnowData = serde_json::from_str(body)?;
        Ok(Self::new(raw_data))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ModelError> {
        let raw_data: SnowData = serde_json::from_value(value)?;
        Ok(Self::new(raw_data))
    }

    pub fn raw_data(&self) -> &SnowData {
        &self.raw_data
    }

    pub fn feature_type(&self) -> &str {
        &self.raw_data.kind
    }

    /// Update time exactly as sent by the API; it is not parsed.
    pub fn update_time(&self) -> &str {
        &self.raw_data.update_time
    }

    pub fn massif_name(&self) -> &str {
        &self.props().massif_name
    }

    pub fn massif_altitude_min(&self) -> i32 {
        self.props().massif_altitude_min
    }

    pub fn massif_altitude_max(&self) -> i32 {
        self.props().massif_altitude_max
    }

    pub fn avalanche_report(&self) -> &str {
        &self.props().avalanche_report
    }

    pub fn massif_avalanche_risk(&self) -> &MassifAvalancheRisk {
        &self.props().massif_avalanche_risk
    }

    pub fn max_avalanche_risk(&self) -> i32 {
        self.massif_avalanche_risk().avalanche_risk_max
    }

    pub fn dangerous_expositions(&self) -> &[String] {
        &self.massif_avalanche_risk().dangerous_exposition
    }

    pub fn fresh_snow_per_exposition(&self) -> &[FreshSnowPerExposition] {
        &self.props().fresh_snow_per_exposition
    }

    pub fn total_snow_per_exposition(&self) -> &[TotalSnowPerExposition] {
        &self.props().total_snow_per_exposition
    }

    /// Total snow depth at exactly `altitude`. When several expositions have
    /// a measurement there, the first exposition in the report wins.
    pub fn snow_depth_at_altitude(&self, altitude: i32) -> Option<i32> {
        self.total_depths()
            .find(|(_, depth)| depth.altitude == altitude)
            .map(|(_, depth)| depth.value)
    }

    /// Every altitude with a total snow measurement, ascending and deduplicated.
    pub fn available_altitudes(&self) -> Vec<i32> {
        self.total_depths()
            .map(|(_, depth)| depth.altitude)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Risk level for a location value such as `"> 2200"`; first match wins.
    pub fn avalanche_risk_by_location(&self, location_value: &str) -> Option<i32> {
        self.massif_avalanche_risk()
            .avalanche_risk_per_location
            .iter()
            .find(|risk| risk.location.value == location_value)
            .map(|risk| risk.avalanche_risk)
    }

    /// Risk level per location value. A repeated location keeps its last value.
    pub fn avalanche_risks_by_location(&self) -> HashMap<String, i32> {
        self.massif_avalanche_risk()
            .avalanche_risk_per_location
            .iter()
            .map(|risk| (risk.location.value.clone(), risk.avalanche_risk))
            .collect()
    }

    pub fn snow_depths(&self) -> Vec<SnowDepthRecord> {
        self.total_depths()
            .map(|(exposition, depth)| SnowDepthRecord {
                exposition: exposition.to_string(),
                altitude: depth.altitude,
                total_snow_depth: depth.value,
            })
            .collect()
    }

    /// Snow limit per exposition. A repeated exposition keeps its last value.
    pub fn snow_limits(&self) -> HashMap<String, i32> {
        self.total_snow_per_exposition()
            .iter()
            .map(|exp| (exp.exposition.clone(), exp.snow_limit))
            .collect()
    }

    /// Pivot of the fresh snow measurements: date -> (altitude, exposition) -> depth.
    /// A repeated date, altitude and exposition keeps its last value.
    pub fn fresh_snow_index(&self) -> FreshSnowIndex {
        let mut index = FreshSnowIndex::new();

        for exp in self.fresh_snow_per_exposition() {
            for depth in &exp.fresh_snow_depth {
                index
                    .entry(depth.date.clone())
                    .or_default()
                    .insert((depth.altitude, exp.exposition.clone()), depth.value);
            }
        }

        index
    }

    fn props(&self) -> &SnowProperties {
        &self.raw_data.properties
    }

    fn total_depths(&self) -> impl Iterator<Item = (&str, &SnowDepth)> {
        self.total_snow_per_exposition().iter().flat_map(|exp| {
            exp.total_snow_depth
                .iter()
                .map(move |depth| (exp.exposition.as_str(), depth))
        })
    }
}
