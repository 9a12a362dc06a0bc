pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::{DATA_DIR_ENV, default_store_path, get_data_dir, recent_sources_path};
pub use paths::{
    MAX_EXPORT_FILE_BYTES, discover_export_files, format_path_with_tilde, read_export_file,
    validate_file_size,
};
pub use terminal::sanitize_for_terminal;
