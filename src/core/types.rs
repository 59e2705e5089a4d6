//! Address and location value types shared by the session, backend and map.
//!
//! Wire format follows the geocoding service: camelCase JSON, optional
//! structured fields omitted when absent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Postal address broken into display fields.
///
/// Every field is optional: a missing field means the location could not be
/// resolved to that level and must not be rendered at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl StructuredAddress {
    /// Labelled fields that carry a non-blank value, in display order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Building/House No.", &self.building),
            ("Street", &self.street),
            ("Area/Locality", &self.area),
            ("City", &self.city),
            ("State", &self.state),
            ("Pincode", &self.pincode),
            ("Country", &self.country),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (label, v))
        })
    }
}

/// Where the backend obtained a result from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Api,
}

impl Source {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Api => "api",
        }
    }
}

/// A resolved geographic point with a human-readable address.
///
/// Produced only by the backend; the session replaces it wholesale and never
/// edits one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingResult {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
    #[serde(default)]
    pub structured: StructuredAddress,
    pub source: Source,
}

impl GeocodingResult {
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Check coordinate ranges and display name.
    pub fn validate(&self) -> Result<(), String> {
        if !self.position().is_valid() {
            return Err(format!("coordinates out of range: {}", self.position()));
        }
        if self.display_name.trim().is_empty() {
            return Err("empty display name".to_string());
        }
        Ok(())
    }
}

/// An unconfirmed address candidate surfaced while typing.
///
/// Selecting one still requires a geocode round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteResult {
    pub display_name: String,
    #[serde(default)]
    pub address: StructuredAddress,
}
