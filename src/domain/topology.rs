// Site topology - which stations feed each published site
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("primary site {0} is declared more than once")]
    DuplicatePrimary(String),
}

/// A published site and the auxiliary stations whose water temperature
/// is averaged into its entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyEntry {
    pub primary_id: String,
    pub auxiliary_ids: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl TopologyEntry {
    pub fn new(primary_id: &str, auxiliary_ids: &[&str], latitude: f64, longitude: f64) -> Self {
        Self {
            primary_id: primary_id.to_string(),
            auxiliary_ids: auxiliary_ids.iter().map(|id| id.to_string()).collect(),
            latitude,
            longitude,
        }
    }
}

/// Immutable site table in declaration order.
#[derive(Debug, Clone)]
pub struct SiteTopology {
    entries: Vec<TopologyEntry>,
    station_ids: Vec<String>,
}

impl SiteTopology {
    pub fn new(entries: Vec<TopologyEntry>) -> Result<Self, TopologyError> {
        let mut primaries = HashSet::new();
        for entry in &entries {
            if !primaries.insert(entry.primary_id.as_str()) {
                return Err(TopologyError::DuplicatePrimary(entry.primary_id.clone()));
            }
        }

        let station_ids: BTreeSet<&str> = entries
            .iter()
            .flat_map(|e| std::iter::once(&e.primary_id).chain(e.auxiliary_ids.iter()))
            .map(String::as_str)
            .collect();
        let station_ids = station_ids.into_iter().map(str::to_string).collect();

        Ok(Self {
            entries,
            station_ids,
        })
    }

    /// The compiled-in central Indiana site table.
    pub fn builtin() -> Result<Self, TopologyError> {
        Self::new(vec![
            TopologyEntry::new("03333050", &["05524500", "03327000"], 40.514051, -86.804322),
            TopologyEntry::new("03351201", &["03353611", "03353000"], 39.825313, -86.188908),
            TopologyEntry::new("03353200", &["03353200"], 39.886527, -86.307937),
            TopologyEntry::new("03353451", &["03353200"], 39.801197, -86.281049),
            TopologyEntry::new("03339500", &["03353200", "03340900"], 40.083484, -86.871184),
            TopologyEntry::new("03339305", &["03353200", "03340900"], 40.141979, -86.628439),
            TopologyEntry::new("03351710", &["03353200", "03353000", "03354000"], 39.872646, -86.018977),
            TopologyEntry::new("03363000", &["03276000", "03354000", "03372500"], 39.349119, -85.980852),
            TopologyEntry::new("03353910", &["03353200", "03354000", "03340900"], 39.702303, -86.408420),
            TopologyEntry::new("03353000", &["03353000"], 39.803721, -86.197487),
            TopologyEntry::new("03359000", &["03359000"], 39.434033, -86.814019),
        ])
    }

    pub fn entries(&self) -> &[TopologyEntry] {
        &self.entries
    }

    /// Every primary and auxiliary id, sorted and de-duplicated.
    pub fn all_station_ids(&self) -> &[String] {
        &self.station_ids
    }
}
