// Ephemeris layer: SPK kernel reading and apparent geocentric positions.

pub mod apparent;
pub mod chebyshev;
pub mod spk;
pub mod time;

use crate::domain::model::{ApparentPosition, Body, Coordinates, PlanetPositionSet};
use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use spk::SpkKernel;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 每次呼叫都重新載入 kernel，不做快取
pub struct EphemerisReader {
    kernel_path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl EphemerisReader {
    pub fn new(kernel_path: impl Into<PathBuf>) -> Self {
        Self::with_clock(kernel_path, Arc::new(SystemClock))
    }

    pub fn with_clock(kernel_path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            kernel_path: kernel_path.into(),
            clock,
        }
    }

    pub fn kernel_path(&self) -> &Path {
        &self.kernel_path
    }

    /// Apparent RA/Dec of every body in [`Body::ALL`] at `instant`.
    ///
    /// `observer` is accepted for interface symmetry but positions are
    /// geocentric.
    pub fn positions_at(
        &self,
        instant: DateTime<Utc>,
        observer: Coordinates,
    ) -> Result<PlanetPositionSet> {
        tracing::debug!(
            "Observer ({:.4}, {:.4}) ignored, computing geocentric positions",
            observer.latitude,
            observer.longitude
        );

        let kernel = SpkKernel::load(&self.kernel_path)?;
        let epoch = time::utc_to_tdb_seconds(instant);
        tracing::debug!("{} → TDB {:.3} s past J2000", instant, epoch);

        let mut entries = Vec::with_capacity(Body::ALL.len());
        for body in Body::ALL {
            let radec = apparent::apparent_radec(&kernel, body.naif_target(), epoch)?;
            entries.push((
                body,
                ApparentPosition {
                    ra_hours: radec.ra_hours,
                    dec_degrees: radec.dec_degrees,
                },
            ));
        }

        Ok(PlanetPositionSet::new(entries))
    }

    pub fn current_positions(&self, observer: Coordinates) -> Result<PlanetPositionSet> {
        self.positions_at(self.clock.now(), observer)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl std::fmt::Debug for EphemerisReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemerisReader")
            .field("kernel_path", &self.kernel_path)
            .finish()
    }
}
