use serde::Serialize;

/// Color-coded AQI band used on city cards.
///
/// | AQI         | Severity            | Color     |
/// |-------------|---------------------|-----------|
/// | <= 25       | Excellent           | `#1E8449` |
/// | <= 50       | Good                | `#27AE60` |
/// | <= 75       | Fair                | `#F1C40F` |
/// | <= 100      | Moderate            | `#F39C12` |
/// | <= 125      | Poor                | `#E67E22` |
/// | <= 150      | UnhealthySensitive  | `#D35400` |
/// | <= 175      | Unhealthy           | `#C0392B` |
/// | <= 200      | VeryUnhealthy       | `#A93226` |
/// | <= 300      | Severe              | `#7D3C98` |
/// | > 300       | Hazardous           | `#5B2C6F` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Excellent,
    Good,
    Fair,
    Moderate,
    Poor,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Severe,
    Hazardous,
}

impl Severity {
    pub fn from_aqi(aqi: i64) -> Self {
        match aqi {
            a if a <= 25 => Severity::Excellent,
            a if a <= 50 => Severity::Good,
            a if a <= 75 => Severity::Fair,
            a if a <= 100 => Severity::Moderate,
            a if a <= 125 => Severity::Poor,
            a if a <= 150 => Severity::UnhealthySensitive,
            a if a <= 175 => Severity::Unhealthy,
            a if a <= 200 => Severity::VeryUnhealthy,
            a if a <= 300 => Severity::Severe,
            _ => Severity::Hazardous,
        }
    }

    /// Hex color for the card headline.
    pub fn color(self) -> &'static str {
        match self {
            Severity::Excellent => "#1E8449",
            Severity::Good => "#27AE60",
            Severity::Fair => "#F1C40F",
            Severity::Moderate => "#F39C12",
            Severity::Poor => "#E67E22",
            Severity::UnhealthySensitive => "#D35400",
            Severity::Unhealthy => "#C0392B",
            Severity::VeryUnhealthy => "#A93226",
            Severity::Severe => "#7D3C98",
            Severity::Hazardous => "#5B2C6F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Excellent => "excellent",
            Severity::Good => "good",
            Severity::Fair => "fair",
            Severity::Moderate => "moderate",
            Severity::Poor => "poor",
            Severity::UnhealthySensitive => "unhealthy for sensitive groups",
            Severity::Unhealthy => "unhealthy",
            Severity::VeryUnhealthy => "very unhealthy",
            Severity::Severe => "severe",
            Severity::Hazardous => "hazardous",
        }
    }
}
