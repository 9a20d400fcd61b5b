use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DEFAULT_ZONE_LETTER, DEFAULT_ZONE_NUMBER};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// WGS84 ellipsoid and UTM scale factor
const K0: f64 = 0.9996;
const E: f64 = 0.00669438;
const E2: f64 = E * E;
const E3: f64 = E2 * E;
const E_P2: f64 = E / (1.0 - E);
const R: f64 = 6_378_137.0;

const M1: f64 = 1.0 - E / 4.0 - 3.0 * E2 / 64.0 - 5.0 * E3 / 256.0;

const ZONE_LETTERS: &str = "CDEFGHJKLMNPQRSTUVWX";

/// A UTM grid zone such as `23K`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmZone {
    pub number: u8,
    pub letter: char,
}

impl UtmZone {
    pub fn new(number: u8, letter: char) -> Result<Self> {
        if !(1..=60).contains(&number) {
            return Err(ProcessingError::GeodeticConversion(format!(
                "Zone number {} is outside [1, 60]",
                number
            )));
        }

        let letter = letter.to_ascii_uppercase();
        if !ZONE_LETTERS.contains(letter) {
            return Err(ProcessingError::GeodeticConversion(format!(
                "Invalid zone letter '{}'",
                letter
            )));
        }

        Ok(Self { number, letter })
    }

    pub fn is_northern(&self) -> bool {
        self.letter >= 'N'
    }

    /// Longitude of the zone's central meridian in degrees
    pub fn central_longitude(&self) -> f64 {
        (self.number as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }
}

impl Default for UtmZone {
    fn default() -> Self {
        Self {
            number: DEFAULT_ZONE_NUMBER,
            letter: DEFAULT_ZONE_LETTER,
        }
    }
}

impl std::fmt::Display for UtmZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

/// Convert a UTM easting/northing pair to WGS84 latitude/longitude in degrees
///
/// # Examples
/// ```
/// use sensor_dashboard::utils::coordinates::{utm_to_latlon, UtmZone};
///
/// let (lat, lon) = utm_to_latlon(500_000.0, 7_400_000.0, UtmZone::default()).unwrap();
/// assert!((lat - -23.510194714799).abs() < 1e-6);
/// assert!((lon - -45.0).abs() < 1e-9);
/// ```
pub fn utm_to_latlon(easting: f64, northing: f64, zone: UtmZone) -> Result<(f64, f64)> {
    if !(100_000.0..1_000_000.0).contains(&easting) {
        return Err(ProcessingError::GeodeticConversion(format!(
            "Easting {} out of range [100000, 1000000)",
            easting
        )));
    }

    if !(0.0..=10_000_000.0).contains(&northing) {
        return Err(ProcessingError::GeodeticConversion(format!(
            "Northing {} out of range [0, 10000000]",
            northing
        )));
    }

    let sqrt_e = (1.0 - E).sqrt();
    let e1 = (1.0 - sqrt_e) / (1.0 + sqrt_e);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;
    let e1_5 = e1_4 * e1;

    let p2 = 3.0 / 2.0 * e1 - 27.0 / 32.0 * e1_3 + 269.0 / 512.0 * e1_5;
    let p3 = 21.0 / 16.0 * e1_2 - 55.0 / 32.0 * e1_4;
    let p4 = 151.0 / 96.0 * e1_3 - 417.0 / 128.0 * e1_5;
    let p5 = 1097.0 / 512.0 * e1_4;

    let x = easting - 500_000.0;
    let y = if zone.is_northern() {
        northing
    } else {
        northing - 10_000_000.0
    };

    let m = y / K0;
    let mu = m / (R * M1);

    // Footpoint latitude
    let p_rad = mu
        + p2 * (2.0 * mu).sin()
        + p3 * (4.0 * mu).sin()
        + p4 * (6.0 * mu).sin()
        + p5 * (8.0 * mu).sin();

    let p_sin = p_rad.sin();
    let p_sin2 = p_sin * p_sin;
    let p_cos = p_rad.cos();
    let p_tan = p_sin / p_cos;
    let p_tan2 = p_tan * p_tan;
    let p_tan4 = p_tan2 * p_tan2;

    let ep_sin = 1.0 - E * p_sin2;
    let n = R / ep_sin.sqrt();
    let r = (1.0 - E) / ep_sin;

    let c = E_P2 * p_cos * p_cos;
    let c2 = c * c;

    let d = x / (n * K0);
    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let latitude = p_rad
        - (p_tan / r)
            * (d2 / 2.0 - d4 / 24.0 * (5.0 + 3.0 * p_tan2 + 10.0 * c - 4.0 * c2 - 9.0 * E_P2)
                + d6 / 720.0
                    * (61.0 + 90.0 * p_tan2 + 298.0 * c + 45.0 * p_tan4 - 252.0 * E_P2 - 3.0 * c2));

    let longitude = (d - d3 / 6.0 * (1.0 + 2.0 * p_tan2 + c)
        + d5 / 120.0 * (5.0 - 2.0 * c + 28.0 * p_tan2 - 3.0 * c2 + 8.0 * E_P2 + 24.0 * p_tan4))
        / p_cos;

    let longitude = wrap_angle(longitude + zone.central_longitude().to_radians());
    let (latitude, longitude) = (latitude.to_degrees(), longitude.to_degrees());

    // The series diverges near the poles
    if !latitude.is_finite() || !longitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ProcessingError::GeodeticConversion(format!(
            "Easting {} / northing {} in zone {} has no valid latitude",
            easting, northing, zone
        )));
    }

    Ok((latitude, longitude))
}

/// Wrap an angle in radians to [-pi, pi)
fn wrap_angle(value: f64) -> f64 {
    (value + PI).rem_euclid(2.0 * PI) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(number: u8, letter: char) -> UtmZone {
        UtmZone::new(number, letter).unwrap()
    }

    #[test]
    fn test_reference_points_in_default_zone() {
        let (lat, lon) = utm_to_latlon(612_345.0, 7_801_234.0, UtmZone::default()).unwrap();
        assert!((lat - -19.881861333298726).abs() < 1e-6);
        assert!((lon - -43.92685662428866).abs() < 1e-6);

        let (lat, lon) = utm_to_latlon(387_654.0, 7_650_000.0, UtmZone::default()).unwrap();
        assert!((lat - -21.248184176840184).abs() < 1e-6);
        assert!((lon - -46.082742104202666).abs() < 1e-6);
    }

    #[test]
    fn test_known_cities() {
        // Aachen
        let (lat, lon) = utm_to_latlon(294_409.0, 5_628_898.0, zone(32, 'U')).unwrap();
        assert!((lat - 50.77535).abs() < 1e-4);
        assert!((lon - 6.08389).abs() < 1e-4);

        // New York
        let (lat, lon) = utm_to_latlon(583_960.0, 4_507_523.0, zone(18, 'T')).unwrap();
        assert!((lat - 40.71435).abs() < 1e-4);
        assert!((lon - -74.00597).abs() < 1e-4);

        // Wellington
        let (lat, lon) = utm_to_latlon(313_784.0, 5_427_057.0, zone(60, 'G')).unwrap();
        assert!((lat - -41.28646).abs() < 1e-4);
        assert!((lon - 174.77624).abs() < 1e-4);
    }

    #[test]
    fn test_central_meridian() {
        assert_eq!(UtmZone::default().central_longitude(), -45.0);
        assert_eq!(zone(31, 'U').central_longitude(), 3.0);
    }

    #[test]
    fn test_hemisphere_from_letter() {
        assert!(!UtmZone::default().is_northern());
        assert!(zone(18, 'N').is_northern());
        assert!(zone(18, 'n').is_northern());
        assert!(!zone(18, 'M').is_northern());
    }

    #[test]
    fn test_invalid_zone() {
        assert!(UtmZone::new(0, 'K').is_err());
        assert!(UtmZone::new(61, 'K').is_err());
        assert!(UtmZone::new(23, 'I').is_err());
        assert!(UtmZone::new(23, 'Z').is_err());
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let zone = UtmZone::default();
        assert!(utm_to_latlon(99_999.0, 7_400_000.0, zone).is_err());
        assert!(utm_to_latlon(1_000_000.0, 7_400_000.0, zone).is_err());
        assert!(utm_to_latlon(500_000.0, -1.0, zone).is_err());
        assert!(utm_to_latlon(500_000.0, 10_000_001.0, zone).is_err());
        assert!(utm_to_latlon(f64::NAN, 7_400_000.0, zone).is_err());
    }

    #[test]
    fn test_pole_singularity_is_rejected() {
        let zone = UtmZone::default();
        assert!(matches!(
            utm_to_latlon(612_345.0, 0.0, zone),
            Err(ProcessingError::GeodeticConversion(_))
        ));
        assert!(matches!(
            utm_to_latlon(500_000.0, 0.0, zone),
            Err(ProcessingError::GeodeticConversion(_))
        ));
    }

    #[test]
    fn test_zone_display() {
        assert_eq!(UtmZone::default().to_string(), "23K");
    }
}
