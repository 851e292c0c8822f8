//! UTC → TT → TDB, expressed as seconds past J2000.0.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// TT - TAI.
const TT_MINUS_TAI: f64 = 32.184;

// TDB - TT periodic term, same constants NAIF leapseconds kernels carry.
const TDB_K: f64 = 1.657e-3;
const TDB_EB: f64 = 1.671e-2;
const TDB_M0: f64 = 6.239996;
const TDB_M1: f64 = 1.99096871e-7;

/// TAI - UTC used before the first leap second entry.
const PRE_1972_DELTA_AT: f64 = 10.0;

/// (year, month, TAI - UTC from the 1st of that month).
const LEAP_SECONDS: [(i32, u32, f64); 28] = [
    (1972, 1, 10.0),
    (1972, 7, 11.0),
    (1973, 1, 12.0),
    (1974, 1, 13.0),
    (1975, 1, 14.0),
    (1976, 1, 15.0),
    (1977, 1, 16.0),
    (1978, 1, 17.0),
    (1979, 1, 18.0),
    (1980, 1, 19.0),
    (1981, 7, 20.0),
    (1982, 7, 21.0),
    (1983, 7, 22.0),
    (1985, 7, 23.0),
    (1988, 1, 24.0),
    (1990, 1, 25.0),
    (1991, 1, 26.0),
    (1992, 7, 27.0),
    (1993, 7, 28.0),
    (1994, 7, 29.0),
    (1996, 1, 30.0),
    (1997, 7, 31.0),
    (1999, 1, 32.0),
    (2006, 1, 33.0),
    (2009, 1, 34.0),
    (2012, 7, 35.0),
    (2015, 7, 36.0),
    (2017, 1, 37.0),
];

fn j2000_utc() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// TAI - UTC in seconds at the given instant.
pub fn delta_at(instant: DateTime<Utc>) -> f64 {
    let date = instant.date_naive();
    LEAP_SECONDS
        .iter()
        .rev()
        .find(|(year, month, _)| {
            NaiveDate::from_ymd_opt(*year, *month, 1).is_some_and(|start| date >= start)
        })
        .map(|(_, _, delta)| *delta)
        .unwrap_or(PRE_1972_DELTA_AT)
}

/// UTC seconds past 2000-01-01T12:00:00, counting every day as 86 400 s.
pub fn utc_seconds_past_j2000(instant: DateTime<Utc>) -> f64 {
    let elapsed = instant - j2000_utc();
    elapsed.num_seconds() as f64 + f64::from(elapsed.subsec_nanos()) * 1e-9
}

/// TDB - TT in seconds at `tt_s` seconds past J2000.
pub fn tdb_minus_tt(tt_s: f64) -> f64 {
    let m = TDB_M0 + TDB_M1 * tt_s;
    let e = m + TDB_EB * m.sin();
    TDB_K * e.sin()
}

/// Ephemeris time (TDB seconds past J2000.0) for a UTC instant.
pub fn utc_to_tdb_seconds(instant: DateTime<Utc>) -> f64 {
    let tt = utc_seconds_past_j2000(instant) + delta_at(instant) + TT_MINUS_TAI;
    tt + tdb_minus_tt(tt)
}
