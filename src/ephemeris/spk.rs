//! Reader for JPL SPK kernels (NAIF DAF container, Chebyshev type 2 segments).
//!
//! DAF layout: 1024-byte records. Record 1 is the file record; summary
//! records form a doubly linked list starting at `FWARD`. SPK summaries
//! carry two doubles (start/end epoch) and six integers (target, center,
//! frame, data type, first and last word address).

use crate::ephemeris::chebyshev;
use crate::utils::error::{FortuneError, Result};
use std::path::Path;

const RECORD_BYTES: usize = 1024;
const WORD_BYTES: usize = 8;

/// Solar system barycenter.
pub const SSB: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpkSegment {
    pub target: i32,
    pub center: i32,
    pub frame: i32,
    pub data_type: i32,
    pub start_epoch: f64,
    pub end_epoch: f64,
    first_word: usize,
    last_word: usize,
}

impl SpkSegment {
    fn covers(&self, epoch_tdb_s: f64) -> bool {
        epoch_tdb_s >= self.start_epoch && epoch_tdb_s <= self.end_epoch
    }
}

/// Position (km) and velocity (km/s) of a target relative to its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

impl StateVector {
    pub const ZERO: StateVector = StateVector {
        position_km: [0.0; 3],
        velocity_km_s: [0.0; 3],
    };

    fn accumulate(&mut self, other: &StateVector) {
        for i in 0..3 {
            self.position_km[i] += other.position_km[i];
            self.velocity_km_s[i] += other.velocity_km_s[i];
        }
    }
}

pub struct SpkKernel {
    data: Vec<u8>,
    order: ByteOrder,
    segments: Vec<SpkSegment>,
}

impl std::fmt::Debug for SpkKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpkKernel")
            .field("bytes", &self.data.len())
            .field("order", &self.order)
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl SpkKernel {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            FortuneError::kernel(format!("cannot read {}: {}", path.display(), e))
        })?;
        let kernel = Self::from_bytes(data)?;
        tracing::debug!(
            "Loaded SPK kernel {} ({} segments)",
            path.display(),
            kernel.segments.len()
        );
        Ok(kernel)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < RECORD_BYTES {
            return Err(FortuneError::kernel("file is shorter than one DAF record"));
        }

        let id = String::from_utf8_lossy(&data[0..8]);
        if !(id.starts_with("DAF/SPK") || id.starts_with("NAIF/DAF")) {
            return Err(FortuneError::kernel(format!(
                "not an SPK file (id word '{}')",
                id.trim_end()
            )));
        }

        let order = detect_byte_order(&data);
        let nd = read_i32(&data, 8, order);
        let ni = read_i32(&data, 12, order);
        if nd != 2 || ni != 6 {
            return Err(FortuneError::kernel(format!(
                "unexpected summary format ND={} NI={}",
                nd, ni
            )));
        }

        let mut kernel = Self {
            data,
            order,
            segments: Vec::new(),
        };
        kernel.segments = kernel.read_summaries()?;
        Ok(kernel)
    }

    pub fn segments(&self) -> &[SpkSegment] {
        &self.segments
    }

    fn read_summaries(&self) -> Result<Vec<SpkSegment>> {
        // ND + (NI + 1) / 2 = 5 words per summary
        const SUMMARY_WORDS: usize = 5;

        let record_count = self.data.len() / RECORD_BYTES;
        let mut segments = Vec::new();
        let mut record = read_i32(&self.data, 76, self.order);
        let mut visited = 0;

        while record > 0 {
            visited += 1;
            if visited > record_count {
                return Err(FortuneError::kernel("summary record chain loops"));
            }

            let base = (record as usize - 1) * RECORD_BYTES;
            if base + RECORD_BYTES > self.data.len() {
                return Err(FortuneError::kernel(format!(
                    "summary record {} is past end of file",
                    record
                )));
            }

            let next = self.read_f64_at(base);
            let count = self.read_f64_at(base + 16) as usize;

            for i in 0..count {
                let offset = base + 3 * WORD_BYTES + i * SUMMARY_WORDS * WORD_BYTES;
                if offset + SUMMARY_WORDS * WORD_BYTES > base + RECORD_BYTES {
                    return Err(FortuneError::kernel("summary count overflows its record"));
                }
                let ints = offset + 2 * WORD_BYTES;
                let segment = SpkSegment {
                    start_epoch: self.read_f64_at(offset),
                    end_epoch: self.read_f64_at(offset + WORD_BYTES),
                    target: read_i32(&self.data, ints, self.order),
                    center: read_i32(&self.data, ints + 4, self.order),
                    frame: read_i32(&self.data, ints + 8, self.order),
                    data_type: read_i32(&self.data, ints + 12, self.order),
                    first_word: read_i32(&self.data, ints + 16, self.order).max(1) as usize,
                    last_word: read_i32(&self.data, ints + 20, self.order).max(1) as usize,
                };
                if segment.last_word * WORD_BYTES > self.data.len() {
                    return Err(FortuneError::kernel(format!(
                        "segment for target {} runs past end of file",
                        segment.target
                    )));
                }
                segments.push(segment);
            }

            record = next as i32;
        }

        Ok(segments)
    }

    fn read_f64_at(&self, offset: usize) -> f64 {
        read_f64(&self.data, offset, self.order)
    }

    /// DAF word addresses are 1-based.
    fn word(&self, address: usize) -> f64 {
        self.read_f64_at((address - 1) * WORD_BYTES)
    }

    /// Center body of the segment covering `target` at `epoch_tdb_s`.
    pub fn center_for(&self, target: i32, epoch_tdb_s: f64) -> Option<i32> {
        self.find_segment(target, None, epoch_tdb_s)
            .or_else(|| self.segments.iter().find(|s| s.target == target))
            .map(|s| s.center)
    }

    fn find_segment(&self, target: i32, center: Option<i32>, epoch_tdb_s: f64) -> Option<&SpkSegment> {
        // 後載入的 segment 優先 (SPK 慣例)
        self.segments.iter().rev().find(|s| {
            s.target == target && center.map_or(true, |c| s.center == c) && s.covers(epoch_tdb_s)
        })
    }

    /// State of `target` relative to `center` at TDB seconds past J2000.
    pub fn evaluate(&self, target: i32, center: i32, epoch_tdb_s: f64) -> Result<StateVector> {
        let segment = match self.find_segment(target, Some(center), epoch_tdb_s) {
            Some(segment) => segment,
            None if self
                .segments
                .iter()
                .any(|s| s.target == target && s.center == center) =>
            {
                return Err(FortuneError::EpochOutOfRange {
                    target,
                    epoch_tdb_s,
                })
            }
            None => return Err(FortuneError::SegmentNotFound { target, center }),
        };

        match segment.data_type {
            2 => self.evaluate_type2(segment, epoch_tdb_s),
            other => Err(FortuneError::kernel(format!(
                "SPK data type {} (target {}) is not supported",
                other, target
            ))),
        }
    }

    fn evaluate_type2(&self, segment: &SpkSegment, epoch_tdb_s: f64) -> Result<StateVector> {
        let end = segment.last_word;
        if end < segment.first_word + 4 {
            return Err(FortuneError::kernel("type 2 segment too short for its directory"));
        }
        let init = self.word(end - 3);
        let interval = self.word(end - 2);
        let record_words = self.word(end - 1) as usize;
        let record_count = self.word(end) as usize;

        if interval <= 0.0 || record_words < 5 || record_count == 0 {
            return Err(FortuneError::kernel(format!(
                "bad type 2 directory for target {}",
                segment.target
            )));
        }

        let index = (((epoch_tdb_s - init) / interval).floor().max(0.0) as usize).min(record_count - 1);
        let record = segment.first_word + index * record_words;
        if record + record_words - 1 > end - 4 {
            return Err(FortuneError::kernel(format!(
                "type 2 record {} overruns segment for target {}",
                index, segment.target
            )));
        }

        let midpoint = self.word(record);
        let radius = self.word(record + 1);
        let degree_terms = (record_words - 2) / 3;
        let s = (epoch_tdb_s - midpoint) / radius;

        let mut state = StateVector::ZERO;
        let mut coeffs = Vec::with_capacity(degree_terms);
        for axis in 0..3 {
            let first = record + 2 + axis * degree_terms;
            coeffs.clear();
            coeffs.extend((first..first + degree_terms).map(|w| self.word(w)));
            state.position_km[axis] = chebyshev::evaluate(&coeffs, s);
            state.velocity_km_s[axis] = chebyshev::derivative(&coeffs, s) / radius;
        }

        Ok(state)
    }

    /// State of a body relative to the solar system barycenter, chaining
    /// segments through their centers (e.g. 199 → 1 → 0).
    pub fn state_relative_to_ssb(&self, body: i32, epoch_tdb_s: f64) -> Result<StateVector> {
        let mut code = body;
        let mut state = StateVector::ZERO;
        let mut hops = 0;

        while code != SSB {
            hops += 1;
            if hops > 16 {
                return Err(FortuneError::kernel(format!("center chain for {} does not end", body)));
            }

            let center = match self.center_for(code, epoch_tdb_s) {
                Some(center) => center,
                None => {
                    let barycenter = planet_to_barycenter(code);
                    if barycenter != code {
                        code = barycenter;
                        continue;
                    }
                    return Err(FortuneError::SegmentNotFound {
                        target: code,
                        center: SSB,
                    });
                }
            };

            state.accumulate(&self.evaluate(code, center, epoch_tdb_s)?);
            code = center;
        }

        Ok(state)
    }
}

/// x99 planet codes fall back to their barycenter (599 → 5).
fn planet_to_barycenter(code: i32) -> i32 {
    if (199..=999).contains(&code) && code % 100 == 99 {
        code / 100
    } else {
        code
    }
}

fn detect_byte_order(data: &[u8]) -> ByteOrder {
    match &data[88..96] {
        b"BIG-IEEE" => ByteOrder::Big,
        b"LTL-IEEE" => ByteOrder::Little,
        // 舊檔沒有 LOCFMT，用 ND 的值推斷
        _ => {
            if i32::from_le_bytes([data[8], data[9], data[10], data[11]]) == 2 {
                ByteOrder::Little
            } else {
                ByteOrder::Big
            }
        }
    }
}

fn read_i32(data: &[u8], offset: usize, order: ByteOrder) -> i32 {
    let bytes = [data[offset], data[offset + 1], data[offset + 2], data[offset + 3]];
    match order {
        ByteOrder::Little => i32::from_le_bytes(bytes),
        ByteOrder::Big => i32::from_be_bytes(bytes),
    }
}

fn read_f64(data: &[u8], offset: usize, order: ByteOrder) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    match order {
        ByteOrder::Little => f64::from_le_bytes(bytes),
        ByteOrder::Big => f64::from_be_bytes(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_record(id: &[u8], nd: i32, ni: i32) -> Vec<u8> {
        let mut data = vec![0u8; RECORD_BYTES];
        data[0..id.len()].copy_from_slice(id);
        data[8..12].copy_from_slice(&nd.to_le_bytes());
        data[12..16].copy_from_slice(&ni.to_le_bytes());
        data[88..96].copy_from_slice(b"LTL-IEEE");
        data
    }

    #[test]
    fn test_rejects_short_file() {
        let err = SpkKernel::from_bytes(vec![0u8; 100]).unwrap_err();
        assert!(matches!(err, FortuneError::KernelError { .. }));
    }

    #[test]
    fn test_rejects_non_spk_id() {
        let err = SpkKernel::from_bytes(file_record(b"DAF/CK  ", 2, 6)).unwrap_err();
        assert!(err.to_string().contains("not an SPK file"));
    }

    #[test]
    fn test_rejects_unexpected_summary_shape() {
        let err = SpkKernel::from_bytes(file_record(b"DAF/SPK ", 2, 5)).unwrap_err();
        assert!(err.to_string().contains("ND=2 NI=5"));
    }

    #[test]
    fn test_empty_summary_chain() {
        // FWARD = 0: valid container with no segments
        let kernel = SpkKernel::from_bytes(file_record(b"DAF/SPK ", 2, 6)).unwrap();
        assert!(kernel.segments().is_empty());
        assert!(matches!(
            kernel.evaluate(10, 0, 0.0),
            Err(FortuneError::SegmentNotFound { target: 10, center: 0 })
        ));
    }

    #[test]
    fn test_byte_order_from_nd_when_locfmt_missing() {
        let mut data = file_record(b"NAIF/DAF", 2, 6);
        data[88..96].copy_from_slice(&[0u8; 8]);
        assert_eq!(detect_byte_order(&data), ByteOrder::Little);

        data[8..12].copy_from_slice(&2i32.to_be_bytes());
        assert_eq!(detect_byte_order(&data), ByteOrder::Big);
    }

    #[test]
    fn test_planet_to_barycenter() {
        assert_eq!(planet_to_barycenter(599), 5);
        assert_eq!(planet_to_barycenter(399), 3);
        assert_eq!(planet_to_barycenter(301), 301);
        assert_eq!(planet_to_barycenter(10), 10);
    }
}
