use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{
    error::ModelError,
    time::{self, LocalTime},
};

/// Rain intensity code meaning "no rain" for a forecast slot.
pub const DRY_INTENSITY: i32 = 1;

/// GeoJSON point; `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// One five-to-ten minute slot of the next-hour forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: i64,
    pub rain_intensity: i32,
    pub rain_intensity_description: String,
}

impl ForecastEntry {
    pub fn is_rain(&self) -> bool {
        self.rain_intensity > DRY_INTENSITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainProperties {
    pub altitude: i32,
    pub name: String,
    pub country: String,
    pub french_department: String,
    pub rain_product_available: i32,
    pub timezone: String,
    pub confidence: i32,
    pub forecast: Vec<ForecastEntry>,
}

/// Body of a `rain` API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainData {
    pub update_time: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: RainProperties,
}

/// Read-only view over a next-hour rain forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct Rain {
    raw_data: RainData,
}

impl Rain {
    pub fn new(raw_data: RainData) -> Self {
        Self { raw_data }
    }

    /// Decode a `rain` response body. Missing keys fail here, not on access.
    pub fn from_json(body: &str) -> Result<Self, ModelError> {
        let raw_data: RainData = serde_json::from_str(body)?;
        Ok(Self::new(raw_data))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ModelError> {
        let raw_data: RainData = serde_json::from_value(value)?;
        Ok(Self::new(raw_data))
    }

    pub fn raw_data(&self) -> &RainData {
        &self.raw_data
    }

    /// Update time in the location's timezone.
    pub fn update_time(&self) -> Result<LocalTime, ModelError> {
        self.localize_time(self.raw_data.update_time)
    }

    pub fn update_time_raw(&self) -> i64 {
        self.raw_data.update_time
    }

    pub fn feature_type(&self) -> &str {
        &self.raw_data.kind
    }

    pub fn geometry(&self) -> &Geometry {
        &self.raw_data.geometry
    }

    pub fn altitude(&self) -> i32 {
        self.raw_data.properties.altitude
    }

    pub fn location_name(&self) -> &str {
        &self.raw_data.properties.name
    }

    pub fn country(&self) -> &str {
        &self.raw_data.properties.country
    }

    pub fn french_department(&self) -> &str {
        &self.raw_data.properties.french_department
    }

    pub fn rain_product_available(&self) -> i32 {
        self.raw_data.properties.rain_product_available
    }

    /// IANA zone name of the forecast location.
    pub fn timezone(&self) -> &str {
        &self.raw_data.properties.timezone
    }

    pub fn confidence(&self) -> i32 {
        self.raw_data.properties.confidence
    }

    pub fn forecasts(&self) -> &[ForecastEntry] {
        &self.raw_data.properties.forecast
    }

    /// Convert any timestamp of this document into the location's local time.
    pub fn localize_time(&self, timestamp: i64) -> Result<LocalTime, ModelError> {
        time::localize_in(timestamp, self.tz()?)
    }

    /// Local time of the first forecast slot with rain, or `None` when every
    /// slot is dry.
    ///
    /// Slots are scanned in the order the API returned them, which is
    /// chronological. The order is not re-checked.
    pub fn next_rain_date_locale(&self) -> Result<Option<LocalTime>, ModelError> {
        let Some(entry) = self.forecasts().iter().find(|f| f.is_rain()) else {
            return Ok(None);
        };

        self.localize_time(entry.time).map(Some)
    }

    fn tz(&self) -> Result<Tz, ModelError> {
        time::parse_timezone(self.timezone())
    }
}
