//! Best-effort writes to the `system_logs` audit table.

use serde_json::Value;
use socwatch_core::LogKind;
use socwatch_db::NewSystemLog;

use crate::store::CollectionStore;

/// Module name recorded on every collector log entry.
pub const MODULE: &str = "scraper";

pub struct AuditLog<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> AuditLog<'a, S>
where
    S: CollectionStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Appends an entry. A failed insert is reported through `tracing` and
    /// otherwise ignored.
    pub async fn write(
        &self,
        kind: LogKind,
        message: &str,
        details: Option<Value>,
        duration_ms: Option<i64>,
    ) {
        let entry = NewSystemLog {
            kind,
            module: MODULE,
            message,
            details,
            duration_ms,
        };

        if let Err(e) = self.store.append_log(&entry).await {
            tracing::warn!(error = %e, %kind, entry = message, "failed to write audit log entry");
        }
    }

    pub async fn info(&self, message: &str) {
        self.write(LogKind::Info, message, None, None).await;
    }

    pub async fn error(&self, message: &str, details: Option<Value>, duration_ms: Option<i64>) {
        self.write(LogKind::Error, message, details, duration_ms)
            .await;
    }
}
