//! Configuration loading and dependency wiring.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{
    ElasticConfig, LoadOptions, LoaderSettings, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH,
    DEFAULT_CSV_PATH,
};
