//! Text codec for segment input and intersection output.
//!
//! Segment files are `;`-separated with the literal header `x1;y1;x2;y2`.
//! Coordinates are big-endian IEEE-754 bit strings: 64 binary digits for
//! doubles, 32 for singles (widened to double after decoding). Plain decimal
//! text is accepted as a third format.
//!
//! Output is `p_x;p_y` followed by one line per boundary point; a segment
//! overlap contributes two lines.

use std::io::{self, Write};

use crate::error::{Error, Result};
use crate::geom::Segment;
use crate::intersect::IntersectionRecord;
use crate::numeric::Scalar;

pub const SEGMENT_HEADER: &str = "x1;y1;x2;y2";
pub const POINT_HEADER: &str = "p_x;p_y";
pub const SEPARATOR: char = ';';

/// How a coordinate field is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoordFormat {
    #[default]
    Bits64,
    Bits32,
    Plain,
}

impl CoordFormat {
    /// Decode one coordinate field.
    pub fn decode(self, field: &str) -> Result<f64> {
        match self {
            CoordFormat::Bits64 => Ok(f64::from_bits(parse_bits(field, 64)?)),
            CoordFormat::Bits32 => Ok(f64::from(f32::from_bits(parse_bits(field, 32)? as u32))),
            CoordFormat::Plain => field
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidNumber(field.to_string())),
        }
    }

    /// Encode one coordinate; `Bits32` narrows to the nearest single first.
    pub fn encode(self, value: f64) -> String {
        match self {
            CoordFormat::Bits64 => encode_bits(value),
            CoordFormat::Bits32 => encode_bits_single(value as f32),
            CoordFormat::Plain => value.to_string(),
        }
    }
}

fn parse_bits(field: &str, width: usize) -> Result<u64> {
    let invalid = || Error::InvalidEncoding {
        expected: width,
        found: field.to_string(),
    };
    if field.len() != width || !field.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(invalid());
    }
    u64::from_str_radix(field, 2).map_err(|_| invalid())
}

/// 64-digit big-endian bit string of a double.
#[inline]
pub fn encode_bits(value: f64) -> String {
    format!("{:064b}", value.to_bits())
}

/// 32-digit big-endian bit string of a single.
#[inline]
pub fn encode_bits_single(value: f32) -> String {
    format!("{:032b}", value.to_bits())
}

/// Reject anything but the exact segment header (surrounding whitespace aside).
pub fn check_header(header: &str) -> Result<()> {
    if header.trim() == SEGMENT_HEADER {
        Ok(())
    } else {
        Err(Error::SchemaMismatch {
            expected: SEGMENT_HEADER,
            found: header.trim().to_string(),
        })
    }
}

/// Decode the four fields of data row `row` (0-based, header excluded).
pub fn parse_segment_row<S: AsRef<str>>(
    row: usize,
    fields: &[S],
    format: CoordFormat,
) -> Result<Segment<f64>> {
    let [x1, y1, x2, y2] = fields else {
        return Err(Error::MalformedRow {
            row,
            found: fields.len(),
        });
    };
    Ok(Segment::from_coords(
        format.decode(x1.as_ref())?,
        format.decode(y1.as_ref())?,
        format.decode(x2.as_ref())?,
        format.decode(y2.as_ref())?,
    ))
}

/// Parse a whole segment file held in memory. Blank lines are skipped.
pub fn parse_segments(text: &str, format: CoordFormat) -> Result<Vec<Segment<f64>>> {
    let mut lines = text.lines();
    check_header(lines.next().unwrap_or(""))?;
    lines
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(row, line)| {
            let fields: Vec<&str> = line.split(SEPARATOR).collect();
            parse_segment_row(row, &fields, format)
        })
        .collect()
}

/// Write segments with their original endpoint orientation.
pub fn write_segments<W: Write>(
    w: &mut W,
    segments: &[Segment<f64>],
    format: CoordFormat,
) -> io::Result<()> {
    writeln!(w, "{SEGMENT_HEADER}")?;
    for s in segments {
        let [x1, y1, x2, y2] = s.coords().map(|c| format.encode(c));
        writeln!(w, "{x1};{y1};{x2};{y2}")?;
    }
    Ok(())
}

/// Write every boundary point of `records` as its nearest double: the 64-bit
/// bit string with `binary`, otherwise the shortest decimal that parses back.
pub fn write_points<W: Write, T: Scalar>(
    w: &mut W,
    records: &[IntersectionRecord<T>],
    binary: bool,
) -> io::Result<()> {
    writeln!(w, "{POINT_HEADER}")?;
    for p in records.iter().flat_map(|r| r.intersection.points()) {
        let (x, y) = (p.x.to_f64(), p.y.to_f64());
        if binary {
            writeln!(w, "{};{}", encode_bits(x), encode_bits(y))?;
        } else {
            writeln!(w, "{x};{y}")?;
        }
    }
    Ok(())
}
