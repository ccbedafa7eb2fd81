//! Binary event-file codec.
//!
//! Layout: the 4-byte magic `PXF1`, a little-endian `u32` header length,
//! a JSON header, then the column data as contiguous little-endian arrays
//! (one blob per column, structure-of-arrays on disk). Column offsets in
//! the header are relative to the start of the data section, so the header
//! can be serialized in a single pass.

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::file::EventFile;
use crate::meta::MetaMap;
use crate::table::{ColumnData, Dtype, Table};

/// File magic identifying the event-file container.
pub const MAGIC: &[u8; 4] = b"PXF1";

#[derive(Serialize, Deserialize)]
struct FileHeader {
    primary: MetaMap,
    extensions: Vec<ExtensionHeader>,
}

#[derive(Serialize, Deserialize)]
struct ExtensionHeader {
    name: String,
    meta: MetaMap,
    rows: u64,
    columns: Vec<ColumnDesc>,
}

#[derive(Serialize, Deserialize)]
struct ColumnDesc {
    name: String,
    dtype: Dtype,
    /// Byte offset into the data section.
    offset: u64,
    /// Byte length of the column array.
    bytes: u64,
}

fn column_bytes(data: &ColumnData) -> u64 {
    (data.len() * data.dtype().size()) as u64
}

fn write_column<W: Write>(writer: &mut W, data: &ColumnData) -> Result<()> {
    match data {
        ColumnData::F64(v) => {
            for x in v {
                writer.write_all(&x.to_le_bytes())?;
            }
        }
        ColumnData::F32(v) => {
            for x in v {
                writer.write_all(&x.to_le_bytes())?;
            }
        }
        ColumnData::I32(v) => {
            for x in v {
                writer.write_all(&x.to_le_bytes())?;
            }
        }
        ColumnData::U8(v) => writer.write_all(v)?,
    }
    Ok(())
}

fn decode_column(dtype: Dtype, raw: &[u8]) -> ColumnData {
    match dtype {
        Dtype::F64 => ColumnData::F64(
            raw.chunks_exact(8)
                .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
                .collect(),
        ),
        Dtype::F32 => ColumnData::F32(
            raw.chunks_exact(4)
                .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
                .collect(),
        ),
        Dtype::I32 => ColumnData::I32(
            raw.chunks_exact(4)
                .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
                .collect(),
        ),
        Dtype::U8 => ColumnData::U8(raw.to_vec()),
    }
}

fn build_header(file: &EventFile) -> FileHeader {
    let mut offset = 0_u64;
    let extensions = file
        .extensions
        .iter()
        .map(|extension| {
            let columns = extension
                .table
                .columns()
                .iter()
                .map(|column| {
                    let bytes = column_bytes(&column.data);
                    let desc = ColumnDesc {
                        name: column.name.clone(),
                        dtype: column.data.dtype(),
                        offset,
                        bytes,
                    };
                    offset += bytes;
                    desc
                })
                .collect();
            ExtensionHeader {
                name: extension.name.clone(),
                meta: extension.meta.clone(),
                rows: extension.table.n_rows() as u64,
                columns,
            }
        })
        .collect();
    FileHeader {
        primary: file.primary.clone(),
        extensions,
    }
}

/// Serializes a file into a byte buffer.
///
/// # Errors
/// Fails only on header serialization problems.
pub fn encode(file: &EventFile) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    encode_into(file, &mut buffer)?;
    Ok(buffer)
}

fn encode_into<W: Write>(file: &EventFile, writer: &mut W) -> Result<()> {
    let header = build_header(file);
    let header_json = serde_json::to_vec(&header)?;
    let header_len = u32::try_from(header_json.len())
        .map_err(|_| Error::InvalidFormat("header exceeds u32 length".to_string()))?;

    writer.write_all(MAGIC)?;
    writer.write_all(&header_len.to_le_bytes())?;
    writer.write_all(&header_json)?;
    for extension in &file.extensions {
        for column in extension.table.columns() {
            write_column(writer, &column.data)?;
        }
    }
    Ok(())
}

/// Writes a file to disk through a buffered writer.
///
/// # Errors
/// Fails on I/O or header serialization problems.
pub fn write_file<P: AsRef<Path>>(file: &EventFile, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    encode_into(file, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Deserializes a file from a byte buffer.
///
/// # Errors
/// Fails on a bad magic, a truncated buffer, malformed header JSON, or a
/// column layout that disagrees with its declared row count.
pub fn decode(bytes: &[u8]) -> Result<EventFile> {
    if bytes.len() < 8 {
        return Err(Error::Truncated {
            expected: 8,
            actual: bytes.len(),
        });
    }
    if &bytes[..4] != MAGIC {
        return Err(Error::BadMagic {
            found: [bytes[0], bytes[1], bytes[2], bytes[3]],
        });
    }
    let header_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let header_end = 8 + header_len;
    if bytes.len() < header_end {
        return Err(Error::Truncated {
            expected: header_end,
            actual: bytes.len(),
        });
    }
    let header: FileHeader = serde_json::from_slice(&bytes[8..header_end])?;
    let data = &bytes[header_end..];

    let mut file = EventFile::new(header.primary);
    for extension in header.extensions {
        let rows = usize::try_from(extension.rows)
            .map_err(|_| Error::InvalidFormat("row count overflows usize".to_string()))?;
        let mut table = Table::new();
        for desc in extension.columns {
            let raw = column_slice(data, header_end, &desc)?;
            let expected = rows.checked_mul(desc.dtype.size()).ok_or_else(|| {
                Error::InvalidFormat(format!("column {} size overflows", desc.name))
            })?;
            if raw.len() != expected {
                return Err(Error::InvalidFormat(format!(
                    "column {} has {} bytes for {} rows of {}",
                    desc.name,
                    raw.len(),
                    rows,
                    desc.dtype.name()
                )));
            }
            table.push_column(&desc.name, decode_column(desc.dtype, raw))?;
        }
        file.push_extension(&extension.name, extension.meta, table)?;
    }
    Ok(file)
}

fn column_slice<'a>(data: &'a [u8], header_end: usize, desc: &ColumnDesc) -> Result<&'a [u8]> {
    let start = usize::try_from(desc.offset)
        .map_err(|_| Error::InvalidFormat(format!("column {} offset overflows", desc.name)))?;
    let len = usize::try_from(desc.bytes)
        .map_err(|_| Error::InvalidFormat(format!("column {} length overflows", desc.name)))?;
    let end = start
        .checked_add(len)
        .ok_or_else(|| Error::InvalidFormat(format!("column {} extent overflows", desc.name)))?;
    if end > data.len() {
        return Err(Error::Truncated {
            expected: header_end + end,
            actual: header_end + data.len(),
        });
    }
    Ok(&data[start..end])
}

/// Reads a file from disk through a read-only memory mapping.
///
/// # Errors
/// Fails on I/O problems or any condition [`decode`] rejects.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<EventFile> {
    let file = File::open(path)?;
    // SAFETY: The file is opened read-only and we assume it is not modified
    // concurrently. This is the standard safety contract for memory mapping.
    #[allow(unsafe_code)]
    let mmap = unsafe { Mmap::map(&file)? };
    decode(&mmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{EVENTS_EXTENSION, GTI_EXTENSION};
    use tempfile::NamedTempFile;

    fn sample_file() -> EventFile {
        let mut primary = MetaMap::new();
        primary.set("TSTART", 0.0);
        primary.set("TSTOP", 10.0);
        primary.set("DET_ID", 1_i64);
        primary.set("ORIGIN", "polarpix");

        let mut events = Table::new();
        events
            .push_column("TIME", ColumnData::F64(vec![0.5, 2.5, 7.0]))
            .unwrap();
        events
            .push_column("PI", ColumnData::F32(vec![55.0, 110.0, 210.0]))
            .unwrap();
        events
            .push_column("NUM_PIX", ColumnData::I32(vec![60, 140, 260]))
            .unwrap();
        events
            .push_column("FLAG", ColumnData::U8(vec![0, 1, 0]))
            .unwrap();

        let mut gti = Table::new();
        gti.push_column("START", ColumnData::F64(vec![0.0])).unwrap();
        gti.push_column("STOP", ColumnData::F64(vec![10.0])).unwrap();

        let mut file = EventFile::new(primary);
        let mut events_meta = MetaMap::new();
        events_meta.set("VERSION", 3_i64);
        file.push_extension(EVENTS_EXTENSION, events_meta, events)
            .unwrap();
        file.push_extension(GTI_EXTENSION, MetaMap::new(), gti)
            .unwrap();
        file
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let file = sample_file();
        let bytes = encode(&file).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn test_write_read_round_trip() {
        let file = sample_file();
        let tmp = NamedTempFile::new().unwrap();
        write_file(&file, tmp.path()).unwrap();
        let back = read_file(tmp.path()).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn test_zero_row_round_trip() {
        let file = sample_file();
        let empty = file.select_events(&[]).unwrap();
        let bytes = encode(&empty).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back.n_events().unwrap(), 0);
        assert_eq!(back.events().unwrap().table.n_columns(), 4);
        assert_eq!(back.gti_list().unwrap(), file.gti_list().unwrap());
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode(&sample_file()).unwrap();
        bytes[0] = b'X';
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::BadMagic { .. }));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = encode(&sample_file()).unwrap();
        let err = decode(&bytes[..6]).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }

    #[test]
    fn test_truncated_data() {
        let bytes = encode(&sample_file()).unwrap();
        let err = decode(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }

    #[test]
    fn test_oversized_row_count_rejected() {
        // A header claiming u64::MAX rows would overflow the byte-count
        // arithmetic; the decoder must reject it, not panic or wrap
        let header = format!(
            r#"{{"primary":{{}},"extensions":[{{"name":"EVENTS","meta":{{}},"rows":{},"columns":[{{"name":"TIME","dtype":"f64","offset":0,"bytes":8}}]}}]}}"#,
            u64::MAX
        );
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&u32::try_from(header.len()).unwrap().to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&1.0_f64.to_le_bytes());

        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_empty_file_round_trip() {
        let mut primary = MetaMap::new();
        primary.set("ORIGIN", "polarpix");
        let file = EventFile::new(primary);
        let back = decode(&encode(&file).unwrap()).unwrap();
        assert_eq!(back, file);
        assert!(back.extensions.is_empty());
    }
}
