//! Per-district registration log
//!
//! One CSV file per district, `{district}_user_crop_entry.csv`, with the
//! header `Name,Year,Crop,Area,Production`. Rows are only ever appended.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use agripredict_common::{
    DISTRICTS, DistrictDescriptor, REGISTRATION_FILE_SUFFIX, RegistrationRecord, ServiceError,
    ServiceResult, StorageConfig,
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Append-only registration store
#[derive(Debug)]
pub struct AppendLog {
    dir: PathBuf,
    /// Serializes writers of the same district file
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl AppendLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: DashMap::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.registration_dir)
    }

    /// Log file of a district
    #[must_use]
    pub fn path_for(&self, district: &DistrictDescriptor) -> PathBuf {
        self.dir
            .join(format!("{}{REGISTRATION_FILE_SUFFIX}", district.file_stem()))
    }

    fn lock_for(&self, district_id: i64) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(district_id).or_default().value())
    }

    /// Append one registration to the district's log
    ///
    /// The directory and file are created on demand; a new file starts with
    /// the header row. The row is written with a single `write_all`.
    pub fn record(&self, district: &DistrictDescriptor, record: &RegistrationRecord) -> ServiceResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| ServiceError::io(&self.dir, e))?;
        let path = self.path_for(district);

        let lock = self.lock_for(district.id);
        let _guard = lock.lock();

        let is_new = !path.exists();
        let row = encode_row(record, is_new).map_err(|e| ServiceError::io(&path, e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ServiceError::io(&path, e))?;
        file.write_all(&row).map_err(|e| ServiceError::io(&path, e))?;

        debug!(district = %district, path = %path.display(), created = is_new, "Registration appended");
        Ok(())
    }

    /// Sum of registered production for a crop across every district log
    ///
    /// Crop names match case-insensitively. Missing files, files without the
    /// expected header and unparsable rows are skipped.
    pub fn crop_total(&self, crop_name: &str) -> ServiceResult<f64> {
        let mut total = 0.0;
        for district in &DISTRICTS {
            let path = self.path_for(district);
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ServiceError::io(&path, e)),
            };
            match sum_production(file, crop_name) {
                Some(sum) => total += sum,
                None => warn!(path = %path.display(), "Registration log has no Crop/Production header, skipped"),
            }
        }
        Ok(total)
    }
}

fn encode_row(record: &RegistrationRecord, with_header: bool) -> std::io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.serialize(record)?;
    writer.into_inner().map_err(csv::IntoInnerError::into_error)
}

fn sum_production(reader: impl Read, crop_name: &str) -> Option<f64> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().ok()?.clone();
    let crop_col = headers.iter().position(|h| h.trim() == "Crop")?;
    let production_col = headers.iter().position(|h| h.trim() == "Production")?;

    Some(
        reader
            .records()
            .filter_map(Result::ok)
            .filter(|row| {
                row.get(crop_col)
                    .is_some_and(|crop| crop.trim().eq_ignore_ascii_case(crop_name))
            })
            .filter_map(|row| row.get(production_col)?.trim().parse::<f64>().ok())
            .sum(),
    )
}
