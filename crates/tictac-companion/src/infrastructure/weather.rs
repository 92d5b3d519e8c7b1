//! The external weather refresh collaborator.
//!
//! The actual data source (which API, which units, how failures are retried)
//! lives outside this process; the companion's only obligation is to kick it
//! once per incoming app message.  This implementation records the request in
//! the log and nothing more, which is the whole contract visible from the
//! bridge's side of the seam.

use tracing::info;

use crate::application::WeatherFetch;

/// Log-only stand-in for the external weather data source.
pub struct WeatherService;

impl WeatherFetch for WeatherService {
    fn refresh(&self) {
        info!("weather refresh requested");
    }
}
