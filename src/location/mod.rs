//! Static city / country coordinate table.
//!
//! `lookup` never fails: unknown pairs resolve to Cairo, and callers cannot
//! tell a fallback from a genuine match. Use [`find`] when the distinction
//! matters (e.g. for CLI warnings).

use serde::Serialize;

use crate::types::Coordinates;

/// One row of the city table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CityEntry {
    pub city: &'static str,
    /// ISO 3166-1 alpha-2 code
    pub country: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityEntry {
    const fn new(city: &'static str, country: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            city,
            country,
            latitude,
            longitude,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::from_table(self.latitude, self.longitude)
    }
}

/// Coordinates returned when no city matches (Cairo).
pub const FALLBACK_COORDINATES: Coordinates = Coordinates::from_table(30.0444, 31.2357);

/// Known cities.
pub const CITIES: &[CityEntry] = &[
    // Egypt
    CityEntry::new("Cairo", "EG", 30.0444, 31.2357),
    CityEntry::new("Alexandria", "EG", 31.2001, 29.9187),
    CityEntry::new("Giza", "EG", 30.0131, 31.2089),
    // Saudi Arabia
    CityEntry::new("Mecca", "SA", 21.3891, 39.8579),
    CityEntry::new("Medina", "SA", 24.5247, 39.5692),
    CityEntry::new("Riyadh", "SA", 24.7136, 46.6753),
    CityEntry::new("Jeddah", "SA", 21.4858, 39.1925),
    // Turkey
    CityEntry::new("Istanbul", "TR", 41.0082, 28.9784),
    CityEntry::new("Ankara", "TR", 39.9334, 32.8597),
    // Indonesia
    CityEntry::new("Jakarta", "ID", -6.2088, 106.8456),
    CityEntry::new("Bandung", "ID", -6.9175, 107.6191),
    // Pakistan
    CityEntry::new("Karachi", "PK", 24.8607, 67.0011),
    CityEntry::new("Lahore", "PK", 31.5204, 74.3587),
    CityEntry::new("Islamabad", "PK", 33.6844, 73.0479),
    // Malaysia
    CityEntry::new("Kuala Lumpur", "MY", 3.1390, 101.6869),
    // UAE
    CityEntry::new("Dubai", "AE", 25.2048, 55.2708),
    CityEntry::new("Abu Dhabi", "AE", 24.4539, 54.3773),
    // UK
    CityEntry::new("London", "GB", 51.5074, -0.1278),
    // USA
    CityEntry::new("New York", "US", 40.7128, -74.0060),
    CityEntry::new("Los Angeles", "US", 34.0522, -118.2437),
    CityEntry::new("Chicago", "US", 41.8781, -87.6298),
    // Canada
    CityEntry::new("Toronto", "CA", 43.6532, -79.3832),
    // Australia
    CityEntry::new("Sydney", "AU", -33.8688, 151.2093),
    CityEntry::new("Melbourne", "AU", -37.8136, 144.9631),
    // France
    CityEntry::new("Paris", "FR", 48.8566, 2.3522),
    // Germany
    CityEntry::new("Berlin", "DE", 52.5200, 13.4050),
    // India
    CityEntry::new("Mumbai", "IN", 19.0760, 72.8777),
    CityEntry::new("Delhi", "IN", 28.6139, 77.2090),
    // Bangladesh
    CityEntry::new("Dhaka", "BD", 23.8103, 90.4125),
    // Morocco
    CityEntry::new("Casablanca", "MA", 33.5731, -7.5898),
    CityEntry::new("Rabat", "MA", 34.0209, -6.8416),
    // Tunisia
    CityEntry::new("Tunis", "TN", 36.8065, 10.1815),
    // Algeria
    CityEntry::new("Algiers", "DZ", 36.7538, 3.0588),
    // Jordan
    CityEntry::new("Amman", "JO", 31.9539, 35.9106),
    // Lebanon
    CityEntry::new("Beirut", "LB", 33.8938, 35.5018),
    // Syria
    CityEntry::new("Damascus", "SY", 33.5138, 36.2765),
    // Iraq
    CityEntry::new("Baghdad", "IQ", 33.3152, 44.3661),
    // Iran
    CityEntry::new("Tehran", "IR", 35.6892, 51.3890),
    // Qatar
    CityEntry::new("Doha", "QA", 25.2854, 51.5310),
    // Kuwait
    CityEntry::new("Kuwait City", "KW", 29.3759, 47.9774),
    // Bahrain
    CityEntry::new("Manama", "BH", 26.0667, 50.5577),
    // Oman
    CityEntry::new("Muscat", "OM", 23.5880, 58.3829),
    // Yemen
    CityEntry::new("Sanaa", "YE", 15.3694, 44.1910),
];

/// Country codes and names covered by [`CITIES`].
pub const COUNTRIES: &[(&str, &str)] = &[
    ("EG", "Egypt"),
    ("SA", "Saudi Arabia"),
    ("TR", "Turkey"),
    ("ID", "Indonesia"),
    ("PK", "Pakistan"),
    ("MY", "Malaysia"),
    ("AE", "United Arab Emirates"),
    ("GB", "United Kingdom"),
    ("US", "United States"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("FR", "France"),
    ("DE", "Germany"),
    ("IN", "India"),
    ("BD", "Bangladesh"),
    ("MA", "Morocco"),
    ("TN", "Tunisia"),
    ("DZ", "Algeria"),
    ("JO", "Jordan"),
    ("LB", "Lebanon"),
    ("SY", "Syria"),
    ("IQ", "Iraq"),
    ("IR", "Iran"),
    ("QA", "Qatar"),
    ("KW", "Kuwait"),
    ("BH", "Bahrain"),
    ("OM", "Oman"),
    ("YE", "Yemen"),
];

/// Finds the table entry for a city and country code.
///
/// Both inputs are trimmed; the city matches case-insensitively and the
/// country code is compared upper-cased.
pub fn find(city: &str, country: &str) -> Option<&'static CityEntry> {
    let city = city.trim().to_lowercase();
    let country = country.trim().to_uppercase();
    CITIES
        .iter()
        .find(|entry| entry.city.to_lowercase() == city && entry.country == country)
}

/// Returns the coordinates of a city, or [`FALLBACK_COORDINATES`] when unknown.
pub fn lookup(city: &str, country: &str) -> Coordinates {
    find(city, country)
        .map(CityEntry::coordinates)
        .unwrap_or(FALLBACK_COORDINATES)
}

/// Returns the display name of a country code.
pub fn country_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_uppercase();
    COUNTRIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
