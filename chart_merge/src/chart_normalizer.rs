use crate::data_loader::DataLoader;
use crate::error::{MissingColumn, Result};
use crate::models::{Stage, StagePaths, StageReport};
use crate::region_mapper::RegionMapper;
use log::warn;
use polars::prelude::*;

/// Ranks chart rows by streams and spells out region codes.
pub struct ChartNormalizer {
    paths: StagePaths,
    loader: DataLoader,
    regions: RegionMapper,
}

impl ChartNormalizer {
    pub fn new(paths: StagePaths) -> Self {
        Self {
            paths,
            loader: DataLoader::new(),
            regions: RegionMapper::default(),
        }
    }

    pub fn run(&self) -> Result<StageReport> {
        println!("\n📈 Normalizing chart data");
        println!("{}", "=".repeat(60));

        let df = self.loader.load_csv(&self.paths.input)?;
        println!("  📊 Chart rows: {}", df.height());

        let (mut df, warnings) = normalize_chart(df, &self.regions)?;

        self.loader.write_csv(&mut df, &self.paths.output)?;
        println!("  💾 Processed data saved to {}", self.paths.output.display());

        Ok(StageReport {
            stage: Stage::Chart,
            output: self.paths.output.clone(),
            rows: df.height(),
            warnings,
        })
    }
}

pub fn normalize_chart(
    df: DataFrame,
    regions: &RegionMapper,
) -> Result<(DataFrame, Vec<MissingColumn>)> {
    let mut warnings = Vec::new();
    let columns: Vec<String> = df.get_column_names().iter().map(|c| c.to_string()).collect();

    let mut df = if columns.iter().any(|c| c == "Streams") {
        with_overall_rank(df)?
    } else {
        warnings.push(MissingColumn::new("Streams"));
        df
    };

    if columns.iter().any(|c| c == "Region") {
        let mapped = regions.map_series(df.column("Region")?)?;
        df.with_column(mapped)?;
    } else {
        warnings.push(MissingColumn::new("Region"));
    }

    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok((df, warnings))
}

/// Competition rank over the whole `Streams` column: the most streamed row
/// gets 1 and tied rows share the lowest rank of their group. Rows are not
/// partitioned by date or region.
pub fn with_overall_rank(df: DataFrame) -> PolarsResult<DataFrame> {
    df.lazy()
        .with_column(
            col("Streams")
                .rank(
                    RankOptions {
                        method: RankMethod::Min,
                        descending: true,
                    },
                    None,
                )
                .cast(DataType::Int64)
                .alias("overall_rank"),
        )
        .collect()
}
