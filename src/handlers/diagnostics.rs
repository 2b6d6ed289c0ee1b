use crate::{models::DiagnosticsResponse, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::{Arc, Mutex, OnceLock};
use sysinfo::System;
use tracing::info;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Report connection, document and host statistics
pub async fn diagnostics(
    State(app_state): State<Arc<AppState>>,
) -> (StatusCode, Json<DiagnosticsResponse>) {

    // Snapshot the session under the lock, then release it
    let (n_conn, n_docs, n_pending_entries, documents) = {
        let session = app_state.session.lock().await;
        (
            session.conn_count() as u32,
            session.documents().len() as u32,
            session.pending().len() as u32,
            session.summaries(),
        )
    };

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| {
            Mutex::new(System::new_all())
        });
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0)
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Docs: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        n_conn,
        n_docs
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            service: app_state.config.service_name.clone(),
            environment: app_state.config.environment.clone(),
            uptime_secs: (Utc::now() - app_state.started_at).num_seconds(),
            n_conn,
            n_docs,
            n_pending_entries,
            documents,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    )
}
