pub mod memory;
pub mod sqlite;

pub use memory::InMemoryIntelligenceStore;
pub use sqlite::SqliteIntelligenceStore;
