//! Two-tier competition cache.
//!
//! Artifacts live durably as pretty-printed JSON files and are served
//! through a process-local TTL memory cache:
//!
//! - Reads check memory first, then fall through to the durable file and
//!   reseed memory with a fresh TTL window
//! - Writes overwrite the durable file only; the next read warms memory
//! - Clearing drops memory entries and never touches files

pub mod clock;
pub mod files;
pub mod memory;
pub mod store;

pub use crate::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use files::ArtifactFiles;
pub use memory::{MemoryCache, TtlCache};
pub use store::{CACHE_NAMESPACE, CompetitionStore};
