#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const AU_KM: f64 = 149_597_870.7;

/// Half-width of every synthetic segment's single Chebyshev record (~126 years).
pub const RADIUS_S: f64 = 4.0e9;

const RECORD_BYTES: usize = 1024;
const WORDS_PER_RECORD: usize = 128;
/// Records 1-3 are the file record, one summary record and one name record.
const FIRST_DATA_WORD: usize = 3 * WORDS_PER_RECORD + 1;

/// A type 2 segment with one record holding two Chebyshev coefficients per axis.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub target: i32,
    pub center: i32,
    /// `[constant, linear]` for x, y and z, in km.
    pub coeffs: [[f64; 2]; 3],
}

impl SegmentSpec {
    pub fn fixed(target: i32, center: i32, position: [f64; 3]) -> Self {
        Self {
            target,
            center,
            coeffs: [[position[0], 0.0], [position[1], 0.0], [position[2], 0.0]],
        }
    }
}

/// Unit vector at (RA hours, Dec degrees) scaled to `distance_km`.
pub fn direction(ra_hours: f64, dec_degrees: f64, distance_km: f64) -> [f64; 3] {
    let ra = (ra_hours * 15.0).to_radians();
    let dec = dec_degrees.to_radians();
    [
        distance_km * dec.cos() * ra.cos(),
        distance_km * dec.cos() * ra.sin(),
        distance_km * dec.sin(),
    ]
}

fn put_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_f64(buf: &mut [u8], offset: usize, value: f64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

fn put_word(buf: &mut [u8], address: usize, value: f64) {
    put_f64(buf, (address - 1) * 8, value);
}

/// Little-endian DAF/SPK image containing `segments`.
pub fn kernel_bytes(segments: &[SegmentSpec]) -> Vec<u8> {
    const WORDS_PER_SEGMENT: usize = 12;
    assert!(segments.len() <= 25, "one summary record holds 25 summaries");

    let data_words = segments.len() * WORDS_PER_SEGMENT;
    let total_words = FIRST_DATA_WORD - 1 + data_words;
    let records = total_words.div_ceil(WORDS_PER_RECORD);
    let mut buf = vec![0u8; records * RECORD_BYTES];

    // file record
    buf[0..8].copy_from_slice(b"DAF/SPK ");
    put_i32(&mut buf, 8, 2);
    put_i32(&mut buf, 12, 6);
    buf[16..28].copy_from_slice(b"SYNTHETIC   ");
    put_i32(&mut buf, 76, 2);
    put_i32(&mut buf, 80, 2);
    put_i32(&mut buf, 84, (total_words + 1) as i32);
    buf[88..96].copy_from_slice(b"LTL-IEEE");

    // summary record
    let summary_base = RECORD_BYTES;
    put_f64(&mut buf, summary_base, 0.0);
    put_f64(&mut buf, summary_base + 8, 0.0);
    put_f64(&mut buf, summary_base + 16, segments.len() as f64);

    for (i, segment) in segments.iter().enumerate() {
        let first = FIRST_DATA_WORD + i * WORDS_PER_SEGMENT;
        let last = first + WORDS_PER_SEGMENT - 1;

        let offset = summary_base + 24 + i * 40;
        put_f64(&mut buf, offset, -RADIUS_S);
        put_f64(&mut buf, offset + 8, RADIUS_S);
        put_i32(&mut buf, offset + 16, segment.target);
        put_i32(&mut buf, offset + 20, segment.center);
        put_i32(&mut buf, offset + 24, 1);
        put_i32(&mut buf, offset + 28, 2);
        put_i32(&mut buf, offset + 32, first as i32);
        put_i32(&mut buf, offset + 36, last as i32);

        // record: MID, RADIUS, x0 x1 y0 y1 z0 z1
        put_word(&mut buf, first, 0.0);
        put_word(&mut buf, first + 1, RADIUS_S);
        for axis in 0..3 {
            put_word(&mut buf, first + 2 + axis * 2, segment.coeffs[axis][0]);
            put_word(&mut buf, first + 3 + axis * 2, segment.coeffs[axis][1]);
        }

        // directory: INIT, INTLEN, RSIZE, N
        put_word(&mut buf, last - 3, -RADIUS_S);
        put_word(&mut buf, last - 2, 2.0 * RADIUS_S);
        put_word(&mut buf, last - 1, 8.0);
        put_word(&mut buf, last, 1.0);
    }

    buf
}

/// Earth at the barycenter and every body fixed in a known direction, so
/// apparent places equal the chosen RA/Dec.
pub fn standard_segments() -> Vec<SegmentSpec> {
    let origin = [0.0; 3];
    vec![
        SegmentSpec::fixed(3, 0, origin),
        SegmentSpec::fixed(399, 3, origin),
        SegmentSpec::fixed(301, 3, direction(3.0, 10.0, 384_400.0)),
        SegmentSpec::fixed(10, 0, direction(6.0, 23.44, AU_KM)),
        SegmentSpec::fixed(1, 0, direction(9.0, 15.0, 0.8 * AU_KM)),
        SegmentSpec::fixed(199, 1, origin),
        SegmentSpec::fixed(2, 0, direction(13.0, -5.0, 0.7 * AU_KM)),
        SegmentSpec::fixed(299, 2, origin),
        SegmentSpec::fixed(4, 0, direction(18.0, -20.0, 1.5 * AU_KM)),
        SegmentSpec::fixed(499, 4, origin),
        SegmentSpec::fixed(5, 0, direction(20.0, -18.0, 5.0 * AU_KM)),
        SegmentSpec::fixed(6, 0, direction(21.5, -16.0, 9.5 * AU_KM)),
    ]
}

/// Expected display strings for [`standard_segments`], keyed by body.
pub const STANDARD_POSITIONS: [(&str, &str); 7] = [
    ("sun", "RA: 6.00h, Dec: 23.44°"),
    ("moon", "RA: 3.00h, Dec: 10.00°"),
    ("mercury", "RA: 9.00h, Dec: 15.00°"),
    ("venus", "RA: 13.00h, Dec: -5.00°"),
    ("mars", "RA: 18.00h, Dec: -20.00°"),
    ("jupiter", "RA: 20.00h, Dec: -18.00°"),
    ("saturn", "RA: 21.50h, Dec: -16.00°"),
];

pub fn write_kernel(dir: &Path, segments: &[SegmentSpec]) -> std::io::Result<PathBuf> {
    let path = dir.join("synthetic.bsp");
    std::fs::write(&path, kernel_bytes(segments))?;
    Ok(path)
}

pub fn write_standard_kernel(dir: &Path) -> std::io::Result<PathBuf> {
    write_kernel(dir, &standard_segments())
}
