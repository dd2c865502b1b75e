mod latlon;
mod reading;

pub use latlon::LatLon;
pub use reading::Reading;
