pub mod chart_normalizer;
pub mod combiner;
pub mod data_loader;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod region_mapper;
pub mod track_normalizer;

pub use chart_normalizer::ChartNormalizer;
pub use combiner::Combiner;
pub use data_loader::DataLoader;
pub use error::{MissingColumn, PipelineError, Result};
pub use models::{CombinePaths, PipelineConfig, Stage, StagePaths, StageReport};
pub use pipeline::{run_pipeline, run_stage};
pub use region_mapper::RegionMapper;
pub use track_normalizer::TrackNormalizer;
