//! Sources of actors and graph data that plug into `GraphCollection`.

pub mod csv_dir;
pub mod memory;

pub use csv_dir::CsvDirectoryLoader;
pub use memory::MemoryTripleStore;
