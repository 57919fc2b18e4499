// Conditions composer - Joins station readings against the site topology
use crate::domain::conditions::{average_temperature, SiteConditions};
use crate::domain::reading::StationReading;
use crate::domain::topology::SiteTopology;
use std::collections::HashMap;

/// Build one `SiteConditions` per topology entry, in table order.
///
/// A station missing from `readings` and a station present without values
/// are treated the same: their fields come out as `None`.
pub fn compose_conditions(
    topology: &SiteTopology,
    readings: &HashMap<String, StationReading>,
) -> Vec<SiteConditions> {
    topology
        .entries()
        .iter()
        .map(|entry| {
            let primary = readings.get(&entry.primary_id);
            let gage = primary.and_then(|r| r.gage_height.as_ref());

            let temps: Vec<f64> = entry
                .auxiliary_ids
                .iter()
                .filter_map(|id| readings.get(id).and_then(StationReading::water_temp_c))
                .collect();
            let (avg_temp_c, avg_temp_f) = match average_temperature(&temps) {
                Some((c, f)) => (Some(c), Some(f)),
                None => (None, None),
            };

            SiteConditions {
                site_no: entry.primary_id.clone(),
                name: primary
                    .map(|r| r.display_name.clone())
                    .unwrap_or_else(|| SiteConditions::fallback_name(&entry.primary_id)),
                gage_height_ft: gage.map(|g| g.value),
                gage_time: gage.map(|g| g.time.clone()),
                avg_temp_c,
                avg_temp_f,
                lat: entry.latitude,
                lng: entry.longitude,
            }
        })
        .collect()
}
