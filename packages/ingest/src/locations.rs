//! Global grid point seed list.
//!
//! The offline import populates the grid store at these ~90 major
//! population centers. Coverage is deliberately sparse; the spatial
//! query engine resolves arbitrary coordinates to the nearest seeded
//! point within its search radius.

/// A named seed location for the grid import.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLocation {
    /// Human-readable place name, used in progress output.
    pub name: &'static str,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// The global import grid.
pub static GLOBAL_GRID_POINTS: &[GridLocation] = &[
    GridLocation { name: "London", latitude: 51.5, longitude: -0.1 },
    GridLocation { name: "Paris", latitude: 48.9, longitude: 2.3 },
    GridLocation { name: "Berlin", latitude: 52.5, longitude: 13.4 },
    GridLocation { name: "Madrid", latitude: 40.4, longitude: -3.7 },
    GridLocation { name: "Rome", latitude: 41.9, longitude: 12.5 },
    GridLocation { name: "Glasgow", latitude: 55.8, longitude: -4.3 },
    GridLocation { name: "Stockholm", latitude: 59.3, longitude: 18.1 },
    GridLocation { name: "Amsterdam", latitude: 52.4, longitude: 4.9 },
    GridLocation { name: "Brussels", latitude: 50.8, longitude: 4.4 },
    GridLocation { name: "Zurich", latitude: 47.4, longitude: 8.5 },
    GridLocation { name: "Vienna", latitude: 48.2, longitude: 16.4 },
    GridLocation { name: "Prague", latitude: 50.1, longitude: 14.4 },
    GridLocation { name: "Warsaw", latitude: 52.2, longitude: 21.0 },
    GridLocation { name: "Oslo", latitude: 59.9, longitude: 10.8 },
    GridLocation { name: "Copenhagen", latitude: 55.7, longitude: 12.6 },
    GridLocation { name: "Helsinki", latitude: 60.2, longitude: 25.0 },
    GridLocation { name: "Athens", latitude: 37.8, longitude: 23.7 },
    GridLocation { name: "Istanbul", latitude: 41.0, longitude: 29.0 },
    GridLocation { name: "Moscow", latitude: 55.8, longitude: 37.6 },
    GridLocation { name: "New York", latitude: 40.7, longitude: -74.0 },
    GridLocation { name: "Los Angeles", latitude: 34.1, longitude: -118.2 },
    GridLocation { name: "Chicago", latitude: 41.9, longitude: -87.6 },
    GridLocation { name: "Houston", latitude: 29.8, longitude: -95.4 },
    GridLocation { name: "Phoenix", latitude: 33.4, longitude: -112.1 },
    GridLocation { name: "Philadelphia", latitude: 39.9, longitude: -75.2 },
    GridLocation { name: "San Antonio", latitude: 29.4, longitude: -98.5 },
    GridLocation { name: "San Diego", latitude: 32.7, longitude: -117.2 },
    GridLocation { name: "Dallas", latitude: 32.8, longitude: -96.8 },
    GridLocation { name: "San Francisco", latitude: 37.8, longitude: -122.4 },
    GridLocation { name: "Seattle", latitude: 47.6, longitude: -122.3 },
    GridLocation { name: "Denver", latitude: 39.7, longitude: -104.9 },
    GridLocation { name: "Boston", latitude: 42.4, longitude: -71.1 },
    GridLocation { name: "Miami", latitude: 25.8, longitude: -80.2 },
    GridLocation { name: "Atlanta", latitude: 33.7, longitude: -84.4 },
    GridLocation { name: "Washington DC", latitude: 38.9, longitude: -77.0 },
    GridLocation { name: "Toronto", latitude: 43.7, longitude: -79.4 },
    GridLocation { name: "Montreal", latitude: 45.5, longitude: -73.6 },
    GridLocation { name: "Vancouver", latitude: 49.3, longitude: -123.1 },
    GridLocation { name: "Mexico City", latitude: 19.4, longitude: -99.1 },
    GridLocation { name: "Mexico", latitude: 23.6, longitude: -102.6 },
    GridLocation { name: "Sao Paulo", latitude: -23.5, longitude: -46.6 },
    GridLocation { name: "Rio de Janeiro", latitude: -22.9, longitude: -43.2 },
    GridLocation { name: "Buenos Aires", latitude: -34.6, longitude: -58.4 },
    GridLocation { name: "Santiago", latitude: -33.4, longitude: -70.6 },
    GridLocation { name: "Lima", latitude: -12.0, longitude: -77.0 },
    GridLocation { name: "Bogota", latitude: 4.6, longitude: -74.1 },
    GridLocation { name: "Tokyo", latitude: 35.7, longitude: 139.7 },
    GridLocation { name: "Shanghai", latitude: 31.2, longitude: 121.5 },
    GridLocation { name: "Beijing", latitude: 39.9, longitude: 116.4 },
    GridLocation { name: "Hong Kong", latitude: 22.3, longitude: 114.2 },
    GridLocation { name: "Seoul", latitude: 37.6, longitude: 127.0 },
    GridLocation { name: "Singapore", latitude: 1.3, longitude: 103.8 },
    GridLocation { name: "Bangkok", latitude: 13.8, longitude: 100.5 },
    GridLocation { name: "Manila", latitude: 14.6, longitude: 121.0 },
    GridLocation { name: "Jakarta", latitude: -6.2, longitude: 106.8 },
    GridLocation { name: "Kuala Lumpur", latitude: 3.1, longitude: 101.7 },
    GridLocation { name: "Hanoi", latitude: 21.0, longitude: 105.9 },
    GridLocation { name: "Ho Chi Minh City", latitude: 10.8, longitude: 106.7 },
    GridLocation { name: "Guangzhou", latitude: 23.1, longitude: 113.3 },
    GridLocation { name: "Kolkata", latitude: 22.5, longitude: 88.4 },
    GridLocation { name: "Mumbai", latitude: 19.1, longitude: 72.9 },
    GridLocation { name: "Delhi", latitude: 28.6, longitude: 77.2 },
    GridLocation { name: "Chennai", latitude: 13.1, longitude: 80.3 },
    GridLocation { name: "Bangalore", latitude: 12.9, longitude: 77.6 },
    GridLocation { name: "Karachi", latitude: 24.9, longitude: 67.0 },
    GridLocation { name: "Dhaka", latitude: 23.8, longitude: 90.4 },
    GridLocation { name: "Tehran", latitude: 35.7, longitude: 51.4 },
    GridLocation { name: "Riyadh", latitude: 24.7, longitude: 46.7 },
    GridLocation { name: "Dubai", latitude: 25.3, longitude: 55.3 },
    GridLocation { name: "Alexandria", latitude: 31.2, longitude: 29.9 },
    GridLocation { name: "Cairo", latitude: 30.0, longitude: 31.2 },
    GridLocation { name: "Beirut", latitude: 33.9, longitude: 35.5 },
    GridLocation { name: "Tel Aviv", latitude: 32.1, longitude: 34.8 },
    GridLocation { name: "Cape Town", latitude: -33.9, longitude: 18.4 },
    GridLocation { name: "Johannesburg", latitude: -26.2, longitude: 28.0 },
    GridLocation { name: "Nairobi", latitude: -1.3, longitude: 36.8 },
    GridLocation { name: "Lagos", latitude: 6.5, longitude: 3.4 },
    GridLocation { name: "Abuja", latitude: 9.1, longitude: 7.5 },
    GridLocation { name: "Accra", latitude: 5.6, longitude: -0.2 },
    GridLocation { name: "Dakar", latitude: 14.7, longitude: -17.4 },
    GridLocation { name: "Sydney", latitude: -33.9, longitude: 151.2 },
    GridLocation { name: "Melbourne", latitude: -37.8, longitude: 145.0 },
    GridLocation { name: "Brisbane", latitude: -27.5, longitude: 153.0 },
    GridLocation { name: "Perth", latitude: -31.9, longitude: 115.9 },
    GridLocation { name: "Auckland", latitude: -36.9, longitude: 174.8 },
    GridLocation { name: "Wellington", latitude: -41.3, longitude: 174.8 },
    GridLocation { name: "Reykjavik", latitude: 64.1, longitude: -21.9 },
    GridLocation { name: "Iceland", latitude: 64.0, longitude: -22.0 },
    GridLocation { name: "Svalbard", latitude: 78.2, longitude: 15.6 },
    GridLocation { name: "Ushuaia", latitude: -54.8, longitude: -68.3 },
    GridLocation { name: "Utqiagvik", latitude: 71.3, longitude: -156.8 },
];
