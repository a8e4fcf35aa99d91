//! Segment CSV loading via the polars CSV reader.
//!
//! Every column is read as a string (schema inference off) so bit strings and
//! plain numbers reach the codec untouched. The header row is checked against
//! the literal `x1;y1;x2;y2` before any row is decoded.

use anyhow::{Context, Result};
use polars::prelude::*;
use segint::codec::{self, CoordFormat, SEGMENT_HEADER};
use segint::Segment;
use std::path::Path;

const COLUMNS: [&str; 4] = ["x1", "y1", "x2", "y2"];

pub fn read_segments(path: &Path, format: CoordFormat) -> Result<Vec<Segment<f64>>> {
    let df = LazyCsvReader::new(path)
        .with_separator(b';')
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;

    let header = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(";");
    codec::check_header(&header)?;

    let columns = COLUMNS
        .iter()
        .map(|name| Ok(df.column(name)?.str()?.clone()))
        .collect::<PolarsResult<Vec<StringChunked>>>()?;

    let segments = (0..df.height())
        .map(|row| {
            let fields: Vec<&str> = columns.iter().filter_map(|c| c.get(row)).collect();
            codec::parse_segment_row(row, &fields, format)
        })
        .collect::<segint::Result<Vec<_>>>()
        .with_context(|| format!("decoding {}", path.display()))?;

    tracing::info!(
        file = %path.display(),
        segments = segments.len(),
        header = SEGMENT_HEADER,
        "segments_loaded"
    );
    Ok(segments)
}
