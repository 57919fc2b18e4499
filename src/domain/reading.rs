// Per-station reading model

/// The most recent valid sample of one parameter at one station.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestValue {
    pub value: f64,
    /// Upstream `dateTime`, passed through verbatim.
    pub time: String,
}

impl LatestValue {
    pub fn new(value: f64, time: String) -> Self {
        Self { value, time }
    }
}

/// Everything extracted for a single station in one refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct StationReading {
    pub display_name: String,
    pub gage_height: Option<LatestValue>,
    pub water_temp: Option<LatestValue>,
}

impl StationReading {
    pub fn new(display_name: String) -> Self {
        Self {
            display_name,
            gage_height: None,
            water_temp: None,
        }
    }

    pub fn water_temp_c(&self) -> Option<f64> {
        self.water_temp.as_ref().map(|v| v.value)
    }
}
