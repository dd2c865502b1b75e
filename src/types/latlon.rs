use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use meteoflux::LatLon;
///
/// let dhaka_north = LatLon(23.97, 90.32);
/// assert_eq!(dhaka_north.0, 23.97); // Latitude
/// assert_eq!(dhaka_north.1, 90.32); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
