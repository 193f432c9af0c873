//! Zip packing for dictionary transfer.
//!
//! GBoard imports a zip holding a single `.txt` dictionary. Packing names
//! both the archive and its entry after the current UTC time; unpacking takes
//! the first `.txt` entry of any archive.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Prefix of packed archive names
pub const ARCHIVE_PREFIX: &str = "gboard_dictionary";

/// Deflate level used when packing
pub const COMPRESSION_LEVEL: i32 = 9;

/// Timestamp format used in archive names
pub const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Archive stem for a point in time, e.g. `gboard_dictionary_2025-03-23_20-57-02`
pub fn archive_stem(at: DateTime<Utc>) -> String {
    format!("{}_{}", ARCHIVE_PREFIX, at.format(STAMP_FORMAT))
}

/// Pack `input` into `<output_dir>/<stem>.zip` as `<stem>.txt`.
///
/// The output directory is created if needed. Returns the archive path.
pub fn pack_dictionary(input: &Path, output_dir: &Path, stem: &str) -> Result<PathBuf> {
    if !input.is_file() {
        return Err(Error::source_read(input, "input file not found"));
    }
    let mut source = BufReader::new(File::open(input).map_err(|e| Error::source_read(input, e))?);

    fs::create_dir_all(output_dir).map_err(|e| Error::output_write(output_dir, e))?;
    let zip_path = output_dir.join(format!("{}.zip", stem));

    let temp = NamedTempFile::new_in(output_dir).map_err(|e| Error::output_write(&zip_path, e))?;
    let mut zip = ZipWriter::new(temp.as_file());
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    zip.start_file(format!("{}.txt", stem), options)
        .map_err(|e| Error::Archive(e.to_string()))?;
    io::copy(&mut source, &mut zip).map_err(|e| Error::output_write(&zip_path, e))?;
    zip.finish().map_err(|e| Error::Archive(e.to_string()))?;
    drop(zip);

    temp.persist(&zip_path)
        .map_err(|e| Error::output_write(&zip_path, e.error))?;

    let bytes = fs::metadata(&zip_path).map(|m| m.len()).unwrap_or(0);
    info!(archive = %zip_path.display(), bytes, "dictionary packaged");
    Ok(zip_path)
}

/// Extract the first `.txt` entry of `zip_path` to `output`.
///
/// The parent directory of `output` is created if needed. Returns the name
/// of the extracted entry.
pub fn unpack_dictionary(zip_path: &Path, output: &Path) -> Result<String> {
    let file = File::open(zip_path).map_err(|e| Error::source_read(zip_path, e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| Error::Archive(format!("{}: {}", zip_path.display(), e)))?;

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| Error::output_write(output, e))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::Archive(e.to_string()))?;

        if !entry.is_file() || !entry.name().ends_with(".txt") {
            continue;
        }
        let name = entry.name().to_string();
        info!(entry = %name, "extracting dictionary");

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| Error::output_write(output, e))?;
        io::copy(&mut entry, &mut temp).map_err(|e| Error::Archive(format!("{}: {}", name, e)))?;
        temp.flush().map_err(|e| Error::output_write(output, e))?;
        temp.persist(output)
            .map_err(|e| Error::output_write(output, e.error))?;

        info!(output = %output.display(), "dictionary extracted");
        return Ok(name);
    }

    Err(Error::Archive(format!(
        "{}: no .txt dictionary found in archive",
        zip_path.display()
    )))
}
