use crate::data_loader::DataLoader;
use crate::error::Result;
use crate::models::{CombinePaths, Stage, StageReport, DEDUP_KEY, TRACK_FEATURE_COLUMNS};
use crate::track_normalizer::recode_explicit;
use log::info;
use polars::prelude::*;

/// Copy of the track `name` used as the right-hand join key, so `name`
/// itself survives the join (null on unmatched chart rows).
const JOIN_KEY: &str = "__track_name_key";

/// Attaches track audio features to every chart observation.
pub struct Combiner {
    paths: CombinePaths,
    loader: DataLoader,
}

impl Combiner {
    pub fn new(paths: CombinePaths) -> Self {
        Self {
            paths,
            loader: DataLoader::new(),
        }
    }

    pub fn run(&self) -> Result<StageReport> {
        println!("\n🔗 Combining chart and track data");
        println!("{}", "=".repeat(60));

        let tracks = self.loader.load_csv(&self.paths.tracks)?;
        let chart = self.loader.load_csv(&self.paths.chart)?;
        println!("  📊 Chart rows: {}, track rows: {}", chart.height(), tracks.height());

        let mut combined = combine(&chart, &tracks)?;
        println!("  📊 Final record count: {}", combined.height());

        self.loader.write_csv(&mut combined, &self.paths.output)?;
        println!("  💾 Combined file created: {}", self.paths.output.display());

        Ok(StageReport {
            stage: Stage::Combine,
            output: self.paths.output.clone(),
            rows: combined.height(),
            warnings: Vec::new(),
        })
    }
}

/// Left-join the track features onto the chart rows by `Track Name == name`.
/// Both key columns are kept; chart rows without a match get nulls in
/// `name` and every attached column.
pub fn join_track_features(chart: &DataFrame, tracks: &DataFrame) -> Result<DataFrame> {
    let mut selection = vec!["name"];
    selection.extend(TRACK_FEATURE_COLUMNS);
    let mut features = tracks.select(selection)?;

    // A normalized file read back may come in with TRUE/FALSE parsed as booleans.
    let explicit = recode_explicit(features.column("explicit")?)?;
    features.with_column(explicit)?;

    let mut key = features.column("name")?.clone();
    key.rename(JOIN_KEY);
    features.with_column(key)?;

    let joined = chart.left_join(&features, ["Track Name"], [JOIN_KEY])?;
    Ok(joined)
}

/// Keep the first row per (Track Name, Date, Artist, Region).
pub fn dedup_observations(df: &DataFrame) -> Result<DataFrame> {
    let subset: Vec<String> = DEDUP_KEY.iter().map(|c| c.to_string()).collect();
    let unique = df.unique_stable(Some(&subset), UniqueKeepStrategy::First, None)?;
    Ok(unique)
}

/// Join, deduplicate, then drop every row with a null anywhere. Unmatched
/// chart rows carry nulls from the join, so they never reach the output.
pub fn combine(chart: &DataFrame, tracks: &DataFrame) -> Result<DataFrame> {
    let joined = join_track_features(chart, tracks)?;
    let unique = dedup_observations(&joined)?;
    let complete = unique.drop_nulls::<String>(None)?;

    info!(
        "Combined {} chart rows: {} after join, {} unique, {} complete",
        chart.height(),
        joined.height(),
        unique.height(),
        complete.height()
    );
    Ok(complete)
}
