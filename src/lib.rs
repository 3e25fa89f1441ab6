//! magicsort - sort files into category folders by their content
//!
//! This library classifies files from their leading bytes (falling back to
//! the extension), derives short metadata tokens from decoded content, and
//! copies a source tree into per-category folders under collision-free,
//! optionally metadata-annotated names.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod job;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod path_builder;
pub mod report;
pub mod signature;

pub use classifier::Classifier;
pub use config::{CompiledFilters, Config, ConfigError};
pub use file_category::{Category, ClassificationResult, DetectionMethod, FileMapper};
pub use file_organizer::{
    OrganizeError, OrganizeRequest, OrganizeResult, OrganizingPipeline, RunState, RunStatistics,
};
pub use job::{CancellationToken, OrganizeHandle, OrganizeProgress, Organizer};
pub use metadata::{ContentProbe, MetadataProbe};
pub use path_builder::{DestinationPlan, PathBuilder};

pub use cli::{Cli, run_cli};
