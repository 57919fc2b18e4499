// Water services instantaneous-values response and reading extraction
use crate::domain::parameter::ParameterKind;
use crate::domain::reading::{LatestValue, StationReading};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Reserved upstream value meaning "no data".
pub const NO_DATA_SENTINEL: &str = "-999999";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed upstream response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("malformed upstream response: time series {index} has no {field}")]
    MissingField { index: usize, field: &'static str },
}

#[derive(Debug, Deserialize)]
struct IvResponse {
    value: IvValue,
}

#[derive(Debug, Deserialize)]
struct IvValue {
    #[serde(rename = "timeSeries")]
    time_series: Vec<TimeSeries>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    #[serde(rename = "sourceInfo")]
    source_info: SourceInfo,
    variable: Variable,
    values: Vec<ValueBlock>,
}

#[derive(Debug, Deserialize)]
struct SourceInfo {
    #[serde(rename = "siteName")]
    site_name: String,
    #[serde(rename = "siteCode")]
    site_code: Vec<CodeValue>,
}

#[derive(Debug, Deserialize)]
struct Variable {
    #[serde(rename = "variableCode")]
    variable_code: Vec<CodeValue>,
}

#[derive(Debug, Deserialize)]
struct CodeValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ValueBlock {
    value: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(default)]
    value: Option<String>,
    #[serde(rename = "dateTime")]
    date_time: String,
}

impl RawObservation {
    fn parsed_value(&self) -> Option<f64> {
        let raw = self.value.as_deref()?.trim();
        if raw.is_empty() || raw == NO_DATA_SENTINEL {
            return None;
        }
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Most recent observation holding a usable value.
///
/// Observations arrive oldest first, so the scan runs from the back.
fn latest_valid(observations: &[RawObservation]) -> Option<LatestValue> {
    observations
        .iter()
        .rev()
        .find_map(|obs| obs.parsed_value().map(|v| LatestValue::new(v, obs.date_time.clone())))
}

/// Fold a raw batch response into one reading per reported station.
///
/// Stations absent from the response are absent from the map. Any series
/// missing its site code, variable code, or value block fails the whole batch.
pub fn extract_readings(body: &[u8]) -> Result<HashMap<String, StationReading>, ExtractError> {
    let response: IvResponse = serde_json::from_slice(body)?;

    let mut readings: HashMap<String, StationReading> = HashMap::new();
    for (index, series) in response.value.time_series.into_iter().enumerate() {
        let site_code = series
            .source_info
            .site_code
            .into_iter()
            .next()
            .ok_or(ExtractError::MissingField { index, field: "siteCode" })?
            .value;
        let parameter_code = series
            .variable
            .variable_code
            .first()
            .ok_or(ExtractError::MissingField { index, field: "variableCode" })?
            .value
            .clone();
        let block = series
            .values
            .first()
            .ok_or(ExtractError::MissingField { index, field: "values" })?;

        let latest = latest_valid(&block.value);
        let reading = readings
            .entry(site_code)
            .or_insert_with(|| StationReading::new(series.source_info.site_name));

        match ParameterKind::from_code(&parameter_code) {
            Some(ParameterKind::GageHeight) => reading.gage_height = latest,
            Some(ParameterKind::WaterTemperature) => reading.water_temp = latest,
            None => tracing::debug!(parameter_code = %parameter_code, "Ignoring unrequested parameter"),
        }
    }

    Ok(readings)
}
