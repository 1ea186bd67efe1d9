//! Build and watch lifecycle controllers.
//!
//! These sit between the CLI and the [`Bundler`](crate::bundler::Bundler):
//! they clean the output directory when asked, time each build, and report
//! the result. Build errors stop here; the bundler has already printed its
//! own diagnostics.
//!
//! - [`run_build`] performs one build
//! - [`run_watch`] starts a session that rebuilds on change

pub mod build;
pub mod clean;
pub mod clock;
pub mod watch;

pub use build::run_build;
pub use clean::clean_outdir;
pub use clock::{Clock, ManualClock, SystemClock};
pub use watch::{run_watch, LifecycleHooks};

use std::time::Duration;

/// Render a duration as seconds with millisecond precision.
///
/// # Example
///
/// ```
/// use cosby::lifecycle::format_seconds;
/// use std::time::Duration;
///
/// assert_eq!(format_seconds(Duration::from_millis(2500)), "2.500");
/// ```
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_seconds_pads_to_three_decimals() {
        assert_eq!(format_seconds(Duration::ZERO), "0.000");
        assert_eq!(format_seconds(Duration::from_secs(12)), "12.000");
        assert_eq!(format_seconds(Duration::from_micros(41_600)), "0.042");
    }
}
