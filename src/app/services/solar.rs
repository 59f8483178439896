//! Solar geometry: zenith angle and diffuse irradiance derivation
//!
//! Wraps an SPA (solar position algorithm) implementation for the one
//! astronomical quantity the pipeline needs, the solar zenith angle, and
//! derives diffuse horizontal irradiance from it.

use crate::app::models::LatLong;
use crate::constants::{DHI_CLAMP_THRESHOLD, sentinel};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use solar_positioning::{RefractionCorrection, spa, time::DeltaT};
use tracing::warn;

/// Solar zenith angle in radians for an observer and UTC instant
///
/// Zenith is measured from directly overhead: 0 with the sun at zenith,
/// greater than pi/2 once the sun is below the horizon.
///
/// # Errors
/// * Returns `Error::SolarPosition` if the ephemeris rejects the inputs
pub fn zenith_angle(at_utc: NaiveDateTime, observer: LatLong, elevation: i32) -> Result<f64> {
    let datetime = DateTime::<Utc>::from_naive_utc_and_offset(at_utc, Utc);
    let delta_t = DeltaT::estimate_from_date_like(datetime)
        .map_err(|e| Error::solar_position(format!("delta-T estimate failed: {}", e)))?;

    let position = spa::solar_position(
        datetime,
        observer.latitude,
        observer.longitude,
        f64::from(elevation),
        delta_t,
        Some(RefractionCorrection::standard()),
    )
    .map_err(|e| Error::solar_position(format!("solar position failed: {}", e)))?;

    Ok(position.zenith_angle().to_radians())
}

/// Derive diffuse horizontal irradiance: `dhi = ghi - dni * cos(zenith)`
///
/// Either input being the -999 sentinel makes the result the sentinel.
/// A strongly negative result (below -10 W/m2) indicates inconsistent
/// inputs and clamps to zero with a diagnostic; small negative noise
/// near zero passes through untouched.
pub fn derive_dhi(ghi: i32, dni: i32, zenith: f64) -> f64 {
    if ghi == sentinel::IRRADIANCE || dni == sentinel::IRRADIANCE {
        return f64::from(sentinel::IRRADIANCE);
    }

    let dhi = f64::from(ghi) - f64::from(dni) * zenith.cos();
    if dhi < DHI_CLAMP_THRESHOLD {
        warn!(
            "negative diffuse irradiance {:.1} (ghi {}, dni {}, zenith {:.3}) clamped to zero",
            dhi, ghi, dni, zenith
        );
        return 0.0;
    }
    dhi
}
