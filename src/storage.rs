/// Snapshot state and the persistence port.
pub mod snapshot;
/// The persistent store coupling a library to a port.
pub mod store;
/// Import of previously exported JSON.
pub mod import;
/// Export to JSON, CSV, and single-prompt documents.
pub mod export;

pub use export::{ExportError, PromptDocFormat};
pub use import::{ImportError, ImportReport};
pub use snapshot::{MemoryPort, PersistedState, PortError, StatePort};
pub use store::{JsonPort, PromptStore, StoreError};
