mod settings;

pub use settings::{Config, StorageBackend, EXAMPLE_CONFIG};
