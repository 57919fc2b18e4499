// Measured parameter codes

/// A parameter reported by the water services feed, bound to its upstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    GageHeight,
    WaterTemperature,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 2] = [ParameterKind::WaterTemperature, ParameterKind::GageHeight];

    pub fn code(self) -> &'static str {
        match self {
            ParameterKind::GageHeight => "00065",
            ParameterKind::WaterTemperature => "00010",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}
