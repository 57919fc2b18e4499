// Published site conditions
use serde::Serialize;

/// One primary site's entry in the served feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteConditions {
    pub site_no: String,
    pub name: String,
    pub gage_height_ft: Option<f64>,
    pub gage_time: Option<String>,
    pub avg_temp_c: Option<f64>,
    pub avg_temp_f: Option<f64>,
    pub lat: f64,
    pub lng: f64,
}

impl SiteConditions {
    pub fn fallback_name(site_no: &str) -> String {
        format!("Site {}", site_no)
    }
}

/// Round to a fixed number of decimal places based on the exact decimal
/// expansion of `value`, so 50.45 (stored as 50.4500000000000028...) rounds up.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Mean Celsius rounded to 2 places, then Fahrenheit from that rounded value
/// rounded to 1 place. `None` when there is nothing to average.
pub fn average_temperature(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let avg_c = round_to(mean, 2);
    let avg_f = round_to(celsius_to_fahrenheit(avg_c), 1);
    Some((avg_c, avg_f))
}
