use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Summary of one open document
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub n_pending: u32,
}

/// Response for diagnostics information
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub service: String,
    pub environment: String,
    pub uptime_secs: i64,
    pub n_conn: u32,
    pub n_docs: u32,
    pub n_pending_entries: u32,
    pub documents: Vec<DocumentSummary>,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
