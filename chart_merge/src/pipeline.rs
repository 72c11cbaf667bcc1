use crate::chart_normalizer::ChartNormalizer;
use crate::combiner::Combiner;
use crate::error::Result;
use crate::models::{PipelineConfig, Stage, StageReport};
use crate::track_normalizer::TrackNormalizer;

pub fn run_stage(stage: Stage, config: &PipelineConfig) -> Result<StageReport> {
    match stage {
        Stage::Tracks => TrackNormalizer::new(config.tracks.clone()).run(),
        Stage::Chart => ChartNormalizer::new(config.chart.clone()).run(),
        Stage::Combine => Combiner::new(config.combine.clone()).run(),
    }
}

/// Run the three stages in order, stopping at the first fatal error.
pub fn run_pipeline(config: &PipelineConfig) -> Result<Vec<StageReport>> {
    Stage::ALL
        .iter()
        .map(|&stage| run_stage(stage, config))
        .collect()
}
