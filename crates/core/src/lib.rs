mod change_log;
mod config;
mod filename;
mod filter;
mod inserter;
mod pipeline;
mod remover;
mod replacer;
mod walker;

pub use change_log::{append_change, format_change_line, TIMESTAMP_FORMAT};
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use filename::split_filename;
pub use filter::FileFilter;
pub use inserter::{apply_insertions, resolve_position, InsertOp};
pub use pipeline::{load_rules, transform, RenameRules, Transformed};
pub use remover::{apply_removals, resolve_range, RangeError, RemoveRange};
pub use replacer::{apply_replacements, ReplaceOp};
pub use walker::{rename_directory, RenameConfig, RenameEvent, RenameReport, DEFAULT_LOG_PATH};
