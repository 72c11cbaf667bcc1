use crate::error::MissingColumn;
use std::fmt;
use std::path::{Path, PathBuf};

pub const TRACKS_INPUT: &str = "tracks.csv";
pub const TRACKS_OUTPUT: &str = "tracks_processed.csv";
pub const CHART_INPUT: &str = "data.csv";
pub const CHART_OUTPUT: &str = "spatial_data_processed.csv";
pub const COMBINED_OUTPUT: &str = "combined_processed.csv";

/// Track metadata columns carried into the combined table, in output order.
pub const TRACK_FEATURE_COLUMNS: [&str; 14] = [
    "danceability",
    "energy",
    "key",
    "loudness",
    "mode",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_minutes",
    "time_signature",
    "explicit",
];

/// Identifies one chart observation.
pub const DEDUP_KEY: [&str; 4] = ["Track Name", "Date", "Artist", "Region"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl StagePaths {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinePaths {
    pub tracks: PathBuf,
    pub chart: PathBuf,
    pub output: PathBuf,
}

/// File locations for all three stages. The outputs of the normalizers are
/// the inputs of the combiner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub tracks: StagePaths,
    pub chart: StagePaths,
    pub combine: CombinePaths,
}

impl PipelineConfig {
    /// The fixed file names, resolved under `dir` instead of the working directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            tracks: StagePaths::new(dir.join(TRACKS_INPUT), dir.join(TRACKS_OUTPUT)),
            chart: StagePaths::new(dir.join(CHART_INPUT), dir.join(CHART_OUTPUT)),
            combine: CombinePaths {
                tracks: dir.join(TRACKS_OUTPUT),
                chart: dir.join(CHART_OUTPUT),
                output: dir.join(COMBINED_OUTPUT),
            },
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::in_dir(Path::new(""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Tracks,
    Chart,
    Combine,
}

impl Stage {
    /// Run order of a full pipeline.
    pub const ALL: [Stage; 3] = [Stage::Tracks, Stage::Chart, Stage::Combine];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Tracks => "Track metadata",
            Stage::Chart => "Chart",
            Stage::Combine => "Combined",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub output: PathBuf,
    pub rows: usize,
    pub warnings: Vec<MissingColumn>,
}
