//! Validation and change record payloads for the external log store
//!
//! The core produces these payloads after every significant operation;
//! persistence is the collaborator's concern, reached through [`RecordSink`].
//! Delivery is best-effort: a failing sink must never fail the operation
//! that produced the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Outcome of a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Success,
    Failed,
    Partial,
    Pending,
}

/// Kind of node mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Add,
    Update,
    Delete,
    Validate,
}

/// Emitted after each parse or bulk-store pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub timestamp: DateTime<Utc>,
    /// e.g. "parse", "initial_parsing", "node_storage"
    pub operation_type: String,
    pub status: ValidationStatus,
    pub total_nodes: usize,
    pub validated_nodes: usize,
    pub failed_nodes: usize,
    pub error_messages: Vec<String>,
    pub metadata: Map<String, Value>,
    /// Model or agent responsible for the pass
    pub agent: String,
    pub processing_time_secs: f64,
}

impl ValidationRecord {
    /// A fully-successful pass over `total` nodes
    pub fn success(operation_type: &str, total: usize, agent: &str, elapsed_secs: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            operation_type: operation_type.to_string(),
            status: ValidationStatus::Success,
            total_nodes: total,
            validated_nodes: total,
            failed_nodes: 0,
            error_messages: Vec::new(),
            metadata: Map::new(),
            agent: agent.to_string(),
            processing_time_secs: elapsed_secs,
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// Emitted after each node mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub timestamp: DateTime<Utc>,
    pub node_id: String,
    pub change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_data: Option<Value>,
    pub validation_status: ValidationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub metadata: Map<String, Value>,
}

impl ChangeRecord {
    pub fn update(node_id: &str, old_data: Value, new_data: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            node_id: node_id.to_string(),
            change_type: ChangeType::Update,
            old_data: Some(old_data),
            new_data: Some(new_data),
            validation_status: ValidationStatus::Success,
            error_message: None,
            suggestion: None,
            metadata: Map::new(),
        }
    }
}

/// Collaborator port for record persistence
pub trait RecordSink {
    fn record_validation(&self, record: ValidationRecord) -> Result<(), String>;
    fn record_change(&self, record: ChangeRecord) -> Result<(), String>;
}

/// In-memory sink for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemorySink {
    validations: Mutex<Vec<ValidationRecord>>,
    changes: Mutex<Vec<ChangeRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validations(&self) -> Vec<ValidationRecord> {
        self.validations.lock().expect("sink poisoned").clone()
    }

    pub fn changes(&self) -> Vec<ChangeRecord> {
        self.changes.lock().expect("sink poisoned").clone()
    }
}

impl RecordSink for MemorySink {
    fn record_validation(&self, record: ValidationRecord) -> Result<(), String> {
        self.validations
            .lock()
            .map_err(|e| e.to_string())?
            .push(record);
        Ok(())
    }

    fn record_change(&self, record: ChangeRecord) -> Result<(), String> {
        self.changes.lock().map_err(|e| e.to_string())?.push(record);
        Ok(())
    }
}
