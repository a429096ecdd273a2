// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading NSA FITS binary tables.

use std::path::Path;

use fitsio::{hdu::HduInfo, tables::ColumnDataType, FitsFile};
use log::{debug, trace, warn};

use super::{Column, GalaxyTable, TableReadError};

/// Wrap a FITS call with our error.
macro_rules! fe {
    ($file:expr, $result:expr) => {{
        $result.map_err(|e| {
            TableReadError::Fits(format!(
                "{}: {e} ({}:{})",
                $file.display(),
                file!(),
                line!()
            ))
        })?
    }};
}

/// Read every column of the binary table in the second HDU. Array columns are
/// only supported for numbers. Columns of other types (e.g. logicals, bits and
/// unsigned 64-bit integers) are skipped with a warning.
pub(super) fn read_fits_galaxy_table(file: &Path) -> Result<GalaxyTable, TableReadError> {
    let mut fptr = fe!(file, FitsFile::open(file));
    let hdu = fe!(file, fptr.hdu(1));

    let (columns, num_rows) = match &hdu.info {
        HduInfo::TableInfo {
            column_descriptions,
            num_rows,
        } => (column_descriptions.clone(), *num_rows),
        _ => {
            return Err(TableReadError::Fits(format!(
                "{}: HDU 2 isn't a table",
                file.display()
            )))
        }
    };
    debug!("{} has {} columns and {num_rows} rows", file.display(), columns.len());

    let mut table = GalaxyTable::new();
    for (i_col, cd) in columns.iter().enumerate() {
        let name = cd.name.as_str();
        let repeat = cd.data_type.repeat;
        let column = match cd.data_type.typ {
            // Padding blanks aren't part of NSA names.
            ColumnDataType::String => Column::Text(
                fe!(file, hdu.read_col::<String>(&mut fptr, name))
                    .into_iter()
                    .map(|s| s.trim_end().to_string())
                    .collect(),
            ),
            ColumnDataType::Double | ColumnDataType::Float if repeat > 1 => {
                Column::FloatArray(read_array_col(&mut fptr, file, i_col, num_rows, repeat)?)
            }
            ColumnDataType::Double | ColumnDataType::Float => {
                Column::Float(fe!(file, hdu.read_col(&mut fptr, name)))
            }
            ColumnDataType::Byte
            | ColumnDataType::Short
            | ColumnDataType::UnsignedShort
            | ColumnDataType::Int
            | ColumnDataType::Long
            | ColumnDataType::UnsignedLong
            | ColumnDataType::LongLong
                if repeat > 1 =>
            {
                Column::FloatArray(read_array_col(&mut fptr, file, i_col, num_rows, repeat)?)
            }
            // cfitsio converts all of these to 64-bit integers.
            ColumnDataType::Byte
            | ColumnDataType::Short
            | ColumnDataType::UnsignedShort
            | ColumnDataType::Int
            | ColumnDataType::Long
            | ColumnDataType::UnsignedLong
            | ColumnDataType::LongLong => {
                Column::Int(fe!(file, hdu.read_col::<i64>(&mut fptr, name)))
            }
            ref other => {
                warn!("Skipping column {name} of unsupported type {other:?}");
                continue;
            }
        };
        trace!("Read column {name}");
        table.insert_column(name, column)?;
    }
    Ok(table)
}

/// fitsio can't read array-valued cells, so use cfitsio directly.
fn read_array_col(
    fptr: &mut FitsFile,
    file: &Path,
    i_col: usize,
    num_rows: usize,
    repeat: usize,
) -> Result<Vec<Vec<f64>>, TableReadError> {
    let mut rows = Vec::with_capacity(num_rows);
    for i_row in 0..num_rows {
        let mut array = vec![0.0; repeat];
        let mut status = 0;
        unsafe {
            // ffgcv = fits_read_col
            fitsio_sys::ffgcv(
                fptr.as_raw(),
                82, // TDOUBLE (fitsio.h)
                i_col as i32 + 1,
                i_row as i64 + 1,
                1,
                repeat as i64,
                std::ptr::null_mut(),
                array.as_mut_ptr().cast(),
                &mut 0,
                &mut status,
            );
        }
        if status != 0 {
            return Err(TableReadError::Fits(format!(
                "{}: cfitsio status {status} reading column {} row {i_row}",
                file.display(),
                i_col + 1
            )));
        }
        rows.push(array);
    }
    Ok(rows)
}
