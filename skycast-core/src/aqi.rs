//! Air-quality index classification.

/// Map an AQI value to its category label.
///
/// Total over all integers: anything outside 1..=5 is "no data".
pub fn classify(aqi: i64) -> &'static str {
    match aqi {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "no data",
    }
}

/// Like [`classify`], treating a missing index as "no data".
pub fn classify_opt(aqi: Option<i64>) -> &'static str {
    aqi.map_or("no data", classify)
}
