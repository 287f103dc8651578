//! Upstream response envelope
//!
//! Typed shape of one geoJson response page. Only the envelope and the
//! core advisory fields are typed; geometry stays a `serde_json::Value`
//! because the upstream mixes Point, GeometryCollection, and occasionally
//! vendor extensions on the same field.

use serde::Deserialize;

/// Top-level page envelope: pagination bookkeeping plus the feature items.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    #[serde(default)]
    pub page_num: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub items: Vec<FeatureItem>,
}

/// One geo-tagged advisory feature.
#[derive(Debug, Deserialize)]
pub struct FeatureItem {
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    #[serde(rename = "coreNOTAMData", default)]
    pub core_notam_data: Option<CoreNotamData>,
}

#[derive(Debug, Deserialize)]
pub struct CoreNotamData {
    #[serde(default)]
    pub notam: Option<RawNotam>,
}

/// The advisory fields as the upstream sends them: everything optional,
/// numbers sometimes encoded as strings. Normalization happens in the
/// parser, not here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotam {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub issued: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub effective_start: Option<String>,
    #[serde(default)]
    pub effective_end: Option<String>,
    #[serde(default)]
    pub feature_type: Option<String>,
    /// Record-level radius; the geometry-level radius takes precedence
    #[serde(default)]
    pub radius: Option<serde_json::Value>,
    #[serde(default)]
    pub text: Option<String>,
}
