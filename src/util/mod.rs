//! Utility modules

pub mod ids;
pub mod names;
pub mod paths;

pub use ids::{IdGenerator, MAX_WORKSPACE_ID};
pub use names::{generate_workspace_name, DEFAULT_NAME_LENGTH};
pub use paths::{config_path, data_dir, database_path, init_data_dir, log_file_path, logs_dir};
