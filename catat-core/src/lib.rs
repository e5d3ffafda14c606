//! catat-core: entry types, localization and the persistence contract for Catat

pub mod entry;
pub mod locale;
pub mod store;

pub use entry::{Category, Entry, EntryKind, KnownCategory, ParsedEntry};
pub use locale::{Language, Locale, UnknownLanguage};
pub use store::{EntryStore, MemoryStore, StoreError};
