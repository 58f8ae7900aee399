//! Persistence adapters: SQLite (default) and in-memory.

pub mod clock;
pub mod memory_repo;
pub mod sqlite_repo;

pub use clock::CreationClock;
pub use memory_repo::MemoryRepo;
pub use sqlite_repo::SqliteRepo;
