use energy_client::domain::SeriesKey;

const UNIT_SUFFIXES: [&str; 2] = ["[kWh]", "[kVArh]"];

/// Strip a trailing `[kWh]` or `[kVArh]` from a measurement label.
///
/// Labels without a recognised suffix are returned unchanged.
pub fn strip_unit(label: &str) -> &str {
    UNIT_SUFFIXES
        .iter()
        .find_map(|suffix| label.strip_suffix(suffix))
        .unwrap_or(label)
}

/// Canonical key for a raw `(measurement_with_unit, station)` header pair.
pub fn normalize_key(measurement_label: &str, station: &str) -> SeriesKey {
    SeriesKey::new(strip_unit(measurement_label.trim()), station.trim())
}
