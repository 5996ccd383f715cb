//! IONOS API type definitions

use serde::{Deserialize, Serialize};

/// Zone entry of `GET /dns/v1/zones`
#[derive(Debug, Deserialize)]
pub struct IonosZone {
    pub id: String,
    pub name: String,
}

/// `GET /dns/v1/zones/{zoneId}` response
#[derive(Debug, Deserialize)]
pub struct IonosZoneDetail {
    #[serde(default)]
    pub records: Vec<IonosRecord>,
}

/// Record as returned by the zone and record endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IonosRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, with = "crate::utils::datetime")]
    pub change_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub disabled: bool,
}

/// Element of the `POST /dns/v1/zones/{zoneId}/records` body
#[derive(Debug, Serialize)]
pub struct IonosRecordCreate<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub content: &'a str,
    pub ttl: u32,
    pub prio: u16,
    pub disabled: bool,
}

/// Element of an error response body (`[{"code": ..., "message": ...}]`)
#[derive(Debug, Deserialize)]
pub struct IonosApiError {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}
