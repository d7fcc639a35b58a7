//! Operator input handling: pasted-coordinate parsing, range validation,
//! and the Google Maps hand-off.

use crate::geocode::provider::urlencode;
use crate::geocode::{Coordinates, FALLBACK};
use std::process::Command;

/// Labels people paste along with coordinates; dropped before parsing.
/// Longer labels first, so "latitude:" is not eaten as "lat:" + "itude:".
const PREFIX_LABELS: &[&str] = &["latitude:", "longitude:", "lat:", "lng:", "lon:"];

/// Extract a latitude/longitude token pair from pasted text. Accepts
/// "40.7, -74.0", "40.7 -74.0", and labeled forms like
/// "lat: 40.7, lng: -74.0". Returns the raw tokens; validation is separate.
pub fn parse_coordinate_input(input: &str) -> Option<(String, String)> {
    let tokens: Vec<String> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .filter_map(strip_label)
        .collect();

    if tokens.len() >= 2 {
        Some((tokens[0].clone(), tokens[1].clone()))
    } else {
        None
    }
}

/// Drop a label token entirely, or peel a label glued to a number
/// ("lat:40.7" → "40.7").
fn strip_label(token: &str) -> Option<String> {
    for label in PREFIX_LABELS {
        if let Some(prefix) = token.get(..label.len()) {
            if prefix.eq_ignore_ascii_case(label) {
                let rest = &token[label.len()..];
                return if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_string())
                };
            }
        }
    }
    Some(token.to_string())
}

/// Validate a token pair into coordinates. The exact fallback pair is
/// rejected: it marks an address as unresolved.
pub fn validate_coordinates(lat: &str, lng: &str) -> Result<Coordinates, String> {
    let (Ok(lat), Ok(lng)) = (lat.parse::<f64>(), lng.parse::<f64>()) else {
        return Err("Invalid numbers".to_string());
    };

    if !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err("Longitude must be between -180 and 180".to_string());
    }

    let coords = Coordinates::new(lat, lng);
    if coords == FALLBACK {
        return Err("These are the fallback coordinates - please find the real ones".to_string());
    }

    Ok(coords)
}

/// Google Maps search URL for an address.
pub fn maps_url(address: &str) -> String {
    format!("https://www.google.com/maps/search/{}", urlencode(address))
}

/// Open a URL in the system browser. A failed launch prints the URL so the
/// operator can open it by hand.
pub fn open_browser(url: &str) {
    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", "", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    if result.is_err() {
        eprintln!("Could not open browser. Please manually visit: {}", url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_comma_separated() {
        let (lat, lng) = parse_coordinate_input("40.7128, -74.0060").unwrap();
        assert_eq!(lat, "40.7128");
        assert_eq!(lng, "-74.0060");
    }

    #[test]
    fn test_parse_space_separated() {
        let (lat, lng) = parse_coordinate_input("40.7128 -74.0060").unwrap();
        assert_eq!(lat, "40.7128");
        assert_eq!(lng, "-74.0060");
    }

    #[test]
    fn test_parse_labeled() {
        let (lat, lng) = parse_coordinate_input("lat: 40.7, lng: -74.0").unwrap();
        assert_eq!(lat, "40.7");
        assert_eq!(lng, "-74.0");

        let (lat, lng) = parse_coordinate_input("LAT:40.7 LON:-74.0").unwrap();
        assert_eq!(lat, "40.7");
        assert_eq!(lng, "-74.0");
    }

    #[test]
    fn test_parse_rejects_incomplete() {
        assert!(parse_coordinate_input("").is_none());
        assert!(parse_coordinate_input("40.7").is_none());
        assert!(parse_coordinate_input("lat: lng:").is_none());
    }

    #[test]
    fn test_validate_accepts_real_coordinates() {
        let coords = validate_coordinates("47.6062", "-122.3321").unwrap();
        assert_relative_eq!(coords.lat, 47.6062);
        assert_relative_eq!(coords.lng, -122.3321);
    }

    #[test]
    fn test_validate_rejects_junk() {
        assert_eq!(
            validate_coordinates("abc", "-74.0").unwrap_err(),
            "Invalid numbers"
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(validate_coordinates("91.0", "0.0")
            .unwrap_err()
            .starts_with("Latitude"));
        assert!(validate_coordinates("0.0", "-181.0")
            .unwrap_err()
            .starts_with("Longitude"));
    }

    #[test]
    fn test_validate_rejects_fallback_pair() {
        let err = validate_coordinates("39.8283", "-98.5795").unwrap_err();
        assert!(err.contains("fallback"));
        // A nearby-but-different point is fine.
        assert!(validate_coordinates("39.8283", "-98.5794").is_ok());
    }

    #[test]
    fn test_maps_url() {
        assert_eq!(
            maps_url("123 Main St, Seattle, WA 98101"),
            "https://www.google.com/maps/search/123%20Main%20St%2C%20Seattle%2C%20WA%2098101"
        );
    }
}
