//! Audit trail of console commands sent to the server

use crate::codec;
use modhost_errors::Error;
use modhost_events::{EventEmitter, EventSender};
use modhost_store::BlobStore;
use modhost_types::CommandRecord;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const COMMANDS_DOCUMENT: &str = "sent_commands.json";

/// Append-only command log
#[derive(Clone)]
pub struct CommandLog {
    store: Arc<dyn BlobStore>,
    lock: Arc<Mutex<()>>,
    tx: Option<EventSender>,
}

impl EventEmitter for CommandLog {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl CommandLog {
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
            tx: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// # Errors
    ///
    /// Returns an error if the existing log is corrupt or cannot be saved.
    pub async fn append(&self, record: CommandRecord) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let existing = self.store.read_document(COMMANDS_DOCUMENT).await?;
        let mut records: Vec<CommandRecord> = match existing {
            Some(bytes) => codec::decode(COMMANDS_DOCUMENT, &bytes)?,
            None => Vec::new(),
        };
        records.push(record);
        let bytes = codec::encode(&records)?;
        self.store.write_document(COMMANDS_DOCUMENT, &bytes).await
    }

    /// Every recorded command, oldest first. An unreadable log reads as
    /// empty with a warning.
    pub async fn history(&self) -> Vec<CommandRecord> {
        let _guard = self.lock.lock().await;
        let loaded = match self.store.read_document(COMMANDS_DOCUMENT).await {
            Ok(Some(bytes)) => codec::decode(COMMANDS_DOCUMENT, &bytes),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(e),
        };
        loaded.unwrap_or_else(|e| {
            self.emit_warning_with_context("command history could not be read", e.to_string());
            Vec::new()
        })
    }
}
