use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::entities::{PetGenConfig, UserGenConfig};
use crate::matching::{MatchStats, StopReason};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written.
    pub out_dir: PathBuf,
    /// Distributions for the pet table.
    #[serde(default)]
    pub pets: PetGenConfig,
    /// Distributions for the user table.
    #[serde(default)]
    pub users: UserGenConfig,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            pets: PetGenConfig::default(),
            users: UserGenConfig::default(),
        }
    }
}

/// Summary of a written table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub file: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub bytes_written: u64,
    /// SHA-256 of the CSV file, hex encoded.
    pub sha256: String,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub adoption_target: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching: Option<MatchStats>,
    pub bytes_written: u64,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            seed,
            tables: Vec::new(),
            adoption_target: 0,
            stop_reason: None,
            matching: None,
            bytes_written: 0,
            duration_ms: 0,
            failure: None,
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|table| table.table == name)
    }

    pub fn record_table(&mut self, table: TableReport) {
        self.bytes_written += table.bytes_written;
        self.tables.push(table);
    }

    pub fn record_failure(&mut self, message: String) {
        self.failure = Some(message);
    }
}
