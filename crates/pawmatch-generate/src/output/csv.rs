use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

/// Size and content hash of a written CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDigest {
    pub rows: u64,
    pub bytes_written: u64,
    pub sha256: String,
}

/// Write rows as CSV, header first, in the order given.
///
/// The header is passed explicitly so that an empty table still gets one.
pub fn write_table_csv<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> Result<TableDigest, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let digesting = DigestWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(digesting);

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let digesting = writer.into_inner().map_err(|err| err.into_error())?;
    let (bytes_written, sha256) = digesting.finish()?;
    Ok(TableDigest {
        rows: rows.len() as u64,
        bytes_written,
        sha256,
    })
}

/// Read every row of a CSV file with a header line.
pub fn read_table_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, csv::Error> {
    let reader = BufReader::new(File::open(path).map_err(csv::Error::from)?);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader.deserialize().collect()
}

struct DigestWriter<W: Write> {
    inner: W,
    bytes: u64,
    hasher: Sha256,
}

impl<W: Write> DigestWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: 0,
            hasher: Sha256::new(),
        }
    }

    fn finish(mut self) -> std::io::Result<(u64, String)> {
        self.inner.flush()?;
        Ok((self.bytes, hex::encode(self.hasher.finalize())))
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.hasher.update(&buf[..size]);
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
