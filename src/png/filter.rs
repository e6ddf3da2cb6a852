// https://www.w3.org/TR/png-3/#9Filters
use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::png::constants::*;
use crate::png::error::{checked_size, reserve, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterType {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

impl FilterType {
    /// Evaluation order, which is also the tie-break order.
    pub const ALL: [FilterType; 5] = [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// One filter's output for a scanline, without the leading tag byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCandidate {
    pub kind: FilterType,
    pub bytes: Vec<u8>,
    /// Sum of |b as i8| over `bytes`.
    pub score: u64,
}

impl FilterCandidate {
    fn with_capacity(kind: FilterType, capacity: usize) -> Result<FilterCandidate> {
        let mut bytes = Vec::new();
        reserve(&mut bytes, capacity)?;
        Ok(FilterCandidate { kind, bytes, score: 0 })
    }

    fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
        self.score += (byte as i8).unsigned_abs() as u64;
    }
}

pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    // widen, p can go negative or past 255
    let (ia, ib, ic) = (a as i16, b as i16, c as i16);

    let p = ia + ib - ic;
    let pa = (p - ia).abs();
    let pb = (p - ib).abs();
    let pc = (p - ic).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Runs all five predictors over one RGBA scanline in a single pass.
///
/// `prev` is the previous scanline's unfiltered bytes, `None` for the first
/// row. Missing neighbours (left of the first pixel, above the first row)
/// read as zero. Candidates come back in [`FilterType::ALL`] order.
pub fn filter_candidates(row: &[u8], prev: Option<&[u8]>) -> Result<[FilterCandidate; 5]> {
    let n = row.len();
    let mut none = FilterCandidate::with_capacity(FilterType::None, n)?;
    let mut sub = FilterCandidate::with_capacity(FilterType::Sub, n)?;
    let mut up = FilterCandidate::with_capacity(FilterType::Up, n)?;
    let mut average = FilterCandidate::with_capacity(FilterType::Average, n)?;
    let mut paeth = FilterCandidate::with_capacity(FilterType::Paeth, n)?;

    for (i, &x) in row.iter().enumerate() {
        let left = if i >= BYTES_PER_PIXEL { row[i - BYTES_PER_PIXEL] } else { 0 };
        let up_byte = prev.map_or(0, |p| p[i]);
        let up_left = match prev {
            Some(p) if i >= BYTES_PER_PIXEL => p[i - BYTES_PER_PIXEL],
            _ => 0,
        };

        none.push(x);
        sub.push(x.wrapping_sub(left));
        up.push(x.wrapping_sub(up_byte));
        // 9.3: the sum must not overflow before halving
        let avg = ((left as u16 + up_byte as u16) / 2) as u8;
        average.push(x.wrapping_sub(avg));
        paeth.push(x.wrapping_sub(paeth_predictor(left, up_byte, up_left)));
    }

    Ok([none, sub, up, average, paeth])
}

/// Lowest score wins; on a tie the earlier filter in [`FilterType::ALL`] is kept.
pub fn select(candidates: [FilterCandidate; 5]) -> FilterCandidate {
    let [none, sub, up, average, paeth] = candidates;
    [sub, up, average, paeth]
        .into_iter()
        .fold(none, |best, c| if c.score < best.score { c } else { best })
}

pub fn filter_scanline(row: &[u8], prev: Option<&[u8]>) -> Result<FilterCandidate> {
    Ok(select(filter_candidates(row, prev)?))
}

fn row_pair(pixels: &[u8], row_bytes: usize, y: usize) -> (&[u8], Option<&[u8]>) {
    let start = y * row_bytes;
    let row = &pixels[start..start + row_bytes];
    let prev = (y > 0).then(|| &pixels[start - row_bytes..start]);
    (row, prev)
}

/// Filters a whole image of tightly packed RGBA rows.
///
/// Returns the uncompressed IDAT stream: one tag byte followed by the chosen
/// filter's bytes, per row, top to bottom. Each row predicts from the true
/// pixels of the row above, so rows are independent and may be filtered in
/// parallel; the result is byte-identical either way.
pub fn filter_image(pixels: &[u8], row_bytes: usize, height: usize, parallel: bool) -> Result<Vec<u8>> {
    let total = checked_size(row_bytes + 1, height)?;

    let rows = if parallel && height > PARALLEL_MIN_ROWS {
        filter_rows_parallel(pixels, row_bytes, height)?
    } else {
        filter_rows(pixels, row_bytes, height)?
    };

    let mut filtered = Vec::new();
    reserve(&mut filtered, total)?;
    let mut counts = [0usize; 5];

    for (y, row) in rows.into_iter().enumerate() {
        trace!("row {}: {:?} (score {})", y, row.kind, row.score);
        counts[row.kind as usize] += 1;
        filtered.push(row.kind.tag());
        filtered.extend_from_slice(&row.bytes);
    }

    debug!(
        "filtered {} rows: none={} sub={} up={} average={} paeth={}",
        height, counts[0], counts[1], counts[2], counts[3], counts[4]
    );

    Ok(filtered)
}

fn filter_rows(pixels: &[u8], row_bytes: usize, height: usize) -> Result<Vec<FilterCandidate>> {
    let mut rows = Vec::new();
    reserve(&mut rows, height)?;
    for y in 0..height {
        let (row, prev) = row_pair(pixels, row_bytes, y);
        rows.push(filter_scanline(row, prev)?);
    }
    Ok(rows)
}

#[cfg(feature = "parallel")]
fn filter_rows_parallel(pixels: &[u8], row_bytes: usize, height: usize) -> Result<Vec<FilterCandidate>> {
    (0..height)
        .into_par_iter()
        .map(|y| {
            let (row, prev) = row_pair(pixels, row_bytes, y);
            filter_scanline(row, prev)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn filter_rows_parallel(pixels: &[u8], row_bytes: usize, height: usize) -> Result<Vec<FilterCandidate>> {
    filter_rows(pixels, row_bytes, height)
}
