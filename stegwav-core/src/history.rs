//! Append-only log of embedding attempts.
//!
//! The [`AttemptLog`] trait is the seam between the heuristic and storage:
//! [`MemoryLog`] keeps records in process, [`JsonFileLog`] persists them as a
//! JSON array that is rewritten in full after every append. Both serialize
//! access behind a mutex, so concurrent appends within a process are never lost.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// One embedding attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Identifier of the carrier (file id or name).
    #[serde(rename = "filename")]
    pub carrier_id: String,
    /// Carrier size in bytes.
    pub size: u64,
    /// Bit depth used.
    #[serde(rename = "bits")]
    pub bit_depth: u32,
    pub success: bool,
    /// SNR in dB; `None` for failed attempts.
    #[serde(
        rename = "snr",
        serialize_with = "serialize_quality",
        deserialize_with = "deserialize_quality",
        default
    )]
    pub quality: Option<f64>,
}

impl AttemptRecord {
    pub fn success(carrier_id: impl Into<String>, size: u64, bit_depth: u32, quality: f64) -> Self {
        Self {
            carrier_id: carrier_id.into(),
            size,
            bit_depth,
            success: true,
            quality: Some(quality),
        }
    }

    pub fn failure(carrier_id: impl Into<String>, size: u64, bit_depth: u32) -> Self {
        Self {
            carrier_id: carrier_id.into(),
            size,
            bit_depth,
            success: false,
            quality: None,
        }
    }
}

/// JSON has no infinity; the lossless sentinel is stored as the string `"inf"`.
const INFINITE_QUALITY: &str = "inf";

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredQuality {
    Db(f64),
    Tag(String),
}

fn serialize_quality<S>(quality: &Option<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match quality {
        Some(q) if q.is_infinite() && q.is_sign_positive() => {
            serializer.serialize_str(INFINITE_QUALITY)
        }
        Some(q) if q.is_finite() => serializer.serialize_f64(*q),
        _ => serializer.serialize_none(),
    }
}

fn deserialize_quality<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StoredQuality>::deserialize(deserializer)? {
        Some(StoredQuality::Db(q)) => Some(q),
        Some(StoredQuality::Tag(tag)) if tag.eq_ignore_ascii_case(INFINITE_QUALITY) => {
            Some(f64::INFINITY)
        }
        Some(StoredQuality::Tag(_)) | None => None,
    })
}

/// Storage for attempt records.
pub trait AttemptLog: Send + Sync {
    /// Append a record and make it durable.
    fn append(&self, record: AttemptRecord) -> Result<()>;

    /// Records matching `filter`, in insertion order.
    fn query(&self, filter: &dyn Fn(&AttemptRecord) -> bool) -> Vec<AttemptRecord>;

    /// Every record, in insertion order.
    fn records(&self) -> Vec<AttemptRecord> {
        self.query(&|_| true)
    }
}

fn lock(records: &Mutex<Vec<AttemptRecord>>) -> MutexGuard<'_, Vec<AttemptRecord>> {
    // A panic while holding the lock cannot leave a half-written Vec behind.
    records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-process log with no persistence.
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<AttemptRecord>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<AttemptRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl AttemptLog for MemoryLog {
    fn append(&self, record: AttemptRecord) -> Result<()> {
        lock(&self.records).push(record);
        Ok(())
    }

    fn query(&self, filter: &dyn Fn(&AttemptRecord) -> bool) -> Vec<AttemptRecord> {
        lock(&self.records)
            .iter()
            .filter(|r| filter(r))
            .cloned()
            .collect()
    }
}

/// Log persisted as a pretty-printed JSON array.
#[derive(Debug)]
pub struct JsonFileLog {
    path: PathBuf,
    records: Mutex<Vec<AttemptRecord>>,
}

impl JsonFileLog {
    /// Default file name, relative to the working directory.
    pub const DEFAULT_PATH: &'static str = "learning_history.json";

    /// Load the log at `path`. A missing, unreadable or malformed file yields
    /// an empty log; it is replaced on the next append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match load(&path) {
            Ok(records) => {
                debug!(path = %path.display(), records = records.len(), "attempt log loaded");
                records
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "attempt log unreadable, starting empty");
                Vec::new()
            }
        };
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[AttemptRecord]) -> io::Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

fn load(path: &Path) -> io::Result<Vec<AttemptRecord>> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

impl AttemptLog for JsonFileLog {
    fn append(&self, record: AttemptRecord) -> Result<()> {
        let mut records = lock(&self.records);
        records.push(record);
        self.persist(&records).map_err(|source| Error::Persistence {
            path: self.path.clone(),
            source,
        })
    }

    fn query(&self, filter: &dyn Fn(&AttemptRecord) -> bool) -> Vec<AttemptRecord> {
        lock(&self.records)
            .iter()
            .filter(|r| filter(r))
            .cloned()
            .collect()
    }
}
