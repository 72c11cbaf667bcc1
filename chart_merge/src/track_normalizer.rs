use crate::data_loader::DataLoader;
use crate::error::{MissingColumn, Result};
use crate::models::{Stage, StagePaths, StageReport};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use log::warn;
use polars::prelude::*;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Cleans the raw track metadata export.
pub struct TrackNormalizer {
    paths: StagePaths,
    loader: DataLoader,
}

impl TrackNormalizer {
    pub fn new(paths: StagePaths) -> Self {
        Self {
            paths,
            loader: DataLoader::new(),
        }
    }

    pub fn run(&self) -> Result<StageReport> {
        println!("\n🎵 Normalizing track metadata");
        println!("{}", "=".repeat(60));

        let df = self.loader.load_csv(&self.paths.input)?;
        let (mut df, warnings) = normalize_tracks(df)?;

        self.loader.write_csv(&mut df, &self.paths.output)?;
        println!("  💾 Processed data saved to {}", self.paths.output.display());

        Ok(StageReport {
            stage: Stage::Tracks,
            output: self.paths.output.clone(),
            rows: df.height(),
            warnings,
        })
    }
}

/// Apply every track transform whose source column is present. Missing
/// columns are logged and returned; the remaining transforms still run.
pub fn normalize_tracks(mut df: DataFrame) -> Result<(DataFrame, Vec<MissingColumn>)> {
    let mut warnings = Vec::new();
    let columns: Vec<String> = df.get_column_names().iter().map(|c| c.to_string()).collect();
    let has = |name: &str| columns.iter().any(|c| c == name);

    if has("explicit") {
        let recoded = recode_explicit(df.column("explicit")?)?;
        df.with_column(recoded)?;
    } else {
        warnings.push(MissingColumn::new("explicit"));
    }

    if has("artists") {
        let cleaned = clean_artists_series(df.column("artists")?)?;
        df.with_column(cleaned)?;
    } else {
        warnings.push(MissingColumn::new("artists"));
    }

    // duration_ms stays in the table next to the derived column
    if has("duration_ms") {
        let minutes = duration_minutes(df.column("duration_ms")?)?;
        df.with_column(minutes)?;
    } else {
        warnings.push(MissingColumn::new("duration_ms"));
    }

    if has("release_date") {
        let years = release_years(df.column("release_date")?)?;
        df.with_column(years)?;
    } else {
        warnings.push(MissingColumn::new("release_date"));
    }

    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok((df, warnings))
}

/// 0 -> "FALSE", 1 -> "TRUE"; anything else keeps its text form.
///
/// A column that loads as booleans is labelled too (`true == 1`), so a raw
/// `True`/`False` export comes out as `TRUE`/`FALSE` rather than unchanged.
pub fn recode_explicit(explicit: &Series) -> PolarsResult<Series> {
    let labels: Vec<Option<String>> = match explicit.dtype() {
        DataType::Boolean => explicit
            .bool()?
            .into_iter()
            .map(|v| v.map(|flag| bool_label(flag).to_string()))
            .collect(),
        dtype if dtype.is_numeric() => {
            let numbers = explicit.cast(&DataType::Float64)?;
            let text = explicit.cast(&DataType::Utf8)?;
            numbers
                .f64()?
                .into_iter()
                .zip(text.utf8()?.into_iter())
                .map(|(number, raw)| match number {
                    Some(n) if n == 0.0 => Some(bool_label(false).to_string()),
                    Some(n) if n == 1.0 => Some(bool_label(true).to_string()),
                    _ => raw.map(str::to_string),
                })
                .collect()
        }
        _ => {
            let text = explicit.cast(&DataType::Utf8)?;
            text.utf8()?
                .into_iter()
                .map(|raw| raw.map(str::to_string))
                .collect()
        }
    };

    Ok(Series::new(explicit.name(), labels))
}

fn bool_label(flag: bool) -> &'static str {
    if flag {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Turn a list-literal-looking artist string such as `['A', 'B']` into
/// `A, B`. Only one enclosing bracket pair is removed; no list parsing.
pub fn clean_artists(raw: &str) -> String {
    let inner = raw.strip_prefix('[').unwrap_or(raw);
    let inner = inner.strip_suffix(']').unwrap_or(inner);

    if inner.contains('"') {
        inner.replace('"', "")
    } else {
        inner.replace('\'', "")
    }
}

fn clean_artists_series(artists: &Series) -> PolarsResult<Series> {
    let text = artists.cast(&DataType::Utf8)?;
    let cleaned: Vec<Option<String>> = text
        .utf8()?
        .into_iter()
        .map(|raw| raw.map(clean_artists))
        .collect();

    Ok(Series::new(artists.name(), cleaned))
}

fn duration_minutes(duration_ms: &Series) -> PolarsResult<Series> {
    let ms = duration_ms.cast(&DataType::Float64)?;
    let mut minutes = &ms / MS_PER_MINUTE;
    minutes.rename("duration_minutes");
    Ok(minutes)
}

fn release_years(release_date: &Series) -> PolarsResult<Series> {
    let text = release_date.cast(&DataType::Utf8)?;
    let years: Vec<Option<i32>> = text
        .utf8()?
        .into_iter()
        .map(|raw| raw.and_then(release_year))
        .collect();

    Ok(Series::new(release_date.name(), years))
}

/// Calendar-date layouts tried in order.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y%m%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Timestamp layouts without an offset; offsets go through RFC 3339.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Representable calendar range of the timestamps the release dates are
/// coerced through; dates outside it count as unparseable.
fn timestamp_bounds() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(1677, 9, 22).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(2262, 4, 11).unwrap_or(NaiveDate::MAX),
    )
}

fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    // bare year or year-month
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(raw.parse().ok()?, 1, 1);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return Some(date);
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }

    // Local calendar date of an offset timestamp, e.g. `2020-05-01T10:00:00Z`
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date())
}

/// Year of a release date such as `2020-05-01`, `2020-05`, `2020`,
/// `20200501`, `May 1, 2020` or an ISO timestamp.
/// Returns `None` for anything that is not a real calendar date.
pub fn release_year(raw: &str) -> Option<i32> {
    let date = parse_release_date(raw.trim())?;
    let (earliest, latest) = timestamp_bounds();
    if date < earliest || date > latest {
        return None;
    }
    Some(date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .utf8()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_song_a_example() {
        let df = df!(
            "name" => &["Song A"],
            "artists" => &["['Alice']"],
            "explicit" => &[1i64],
            "duration_ms" => &[180_000i64],
            "release_date" => &["2020-05-01"],
        )
        .unwrap();

        let (out, warnings) = normalize_tracks(df).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(utf8_values(&out, "explicit"), vec![Some("TRUE".to_string())]);
        assert_eq!(utf8_values(&out, "artists"), vec![Some("Alice".to_string())]);
        assert_eq!(out.column("duration_minutes").unwrap().f64().unwrap().get(0), Some(3.0));
        assert_eq!(out.column("release_date").unwrap().i32().unwrap().get(0), Some(2020));
        // source column is kept alongside the derived one
        assert!(out.get_column_names().contains(&"duration_ms"));
    }

    #[test]
    fn test_explicit_passes_through_other_values() {
        let explicit = Series::new("explicit", &[Some(0i64), Some(1), Some(2), None]);
        let recoded = recode_explicit(&explicit).unwrap();
        let values: Vec<Option<&str>> = recoded.utf8().unwrap().into_iter().collect();

        assert_eq!(values, vec![Some("FALSE"), Some("TRUE"), Some("2"), None]);
    }

    #[test]
    fn test_explicit_text_untouched() {
        let explicit = Series::new("explicit", &["yes", "0"]);
        let recoded = recode_explicit(&explicit).unwrap();
        let values: Vec<Option<&str>> = recoded.utf8().unwrap().into_iter().collect();

        assert_eq!(values, vec![Some("yes"), Some("0")]);
    }

    #[test]
    fn test_explicit_boolean_column() {
        let explicit = Series::new("explicit", &[true, false]);
        let recoded = recode_explicit(&explicit).unwrap();
        let values: Vec<Option<&str>> = recoded.utf8().unwrap().into_iter().collect();

        assert_eq!(values, vec![Some("TRUE"), Some("FALSE")]);
    }

    #[test]
    fn test_boolean_explicit_column_gets_labels_in_table() {
        let df = df!(
            "name" => &["a", "b", "c"],
            "explicit" => &[Some(true), Some(false), None],
        )
        .unwrap();

        let (out, _) = normalize_tracks(df).unwrap();

        assert_eq!(
            utf8_values(&out, "explicit"),
            vec![Some("TRUE".to_string()), Some("FALSE".to_string()), None]
        );
    }

    #[test]
    fn test_clean_artists() {
        assert_eq!(clean_artists("['Alice', 'Bob']"), "Alice, Bob");
        assert_eq!(clean_artists(r#"["Guns N' Roses"]"#), "Guns N' Roses");
        assert_eq!(clean_artists("Plain Name"), "Plain Name");
        // only one bracket pair is stripped
        assert_eq!(clean_artists("[['A']]"), "[A]");
        assert_eq!(clean_artists("[]"), "");
    }

    #[test]
    fn test_duration_minutes_exact() {
        let ms = Series::new("duration_ms", &[Some(90_000i64), Some(1), None]);
        let minutes = duration_minutes(&ms).unwrap();
        let values: Vec<Option<f64>> = minutes.f64().unwrap().into_iter().collect();

        assert_eq!(minutes.name(), "duration_minutes");
        assert_eq!(values[0], Some(1.5));
        assert!((values[1].unwrap() - 1.0 / 60_000.0).abs() < 1e-15);
        assert_eq!(values[2], None);
    }

    #[test]
    fn test_release_year_shapes() {
        assert_eq!(release_year("2020-05-01"), Some(2020));
        assert_eq!(release_year("1999-12"), Some(1999));
        assert_eq!(release_year("1987"), Some(1987));
        assert_eq!(release_year("2001/02/03"), Some(2001));
        assert_eq!(release_year("12/31/1975"), Some(1975));
        assert_eq!(release_year("2010-06-01T00:00:00"), Some(2010));
        assert_eq!(release_year(" 2015-01-01 "), Some(2015));
    }

    #[test]
    fn test_release_year_compact_and_named_months() {
        assert_eq!(release_year("20200501"), Some(2020));
        assert_eq!(release_year("May 1, 2020"), Some(2020));
        assert_eq!(release_year("Sep 14, 1969"), Some(1969));
        assert_eq!(release_year("3 March 2001"), Some(2001));
    }

    #[test]
    fn test_release_year_timestamps() {
        assert_eq!(release_year("2020-05-01T10:00:00Z"), Some(2020));
        assert_eq!(release_year("2019-12-31T23:30:00-05:00"), Some(2019));
        assert_eq!(release_year("2020-05-01 10:00"), Some(2020));
        assert_eq!(release_year("2020-05-01 10:00:00.250"), Some(2020));
    }

    #[test]
    fn test_release_year_unparseable() {
        assert_eq!(release_year("not a date"), None);
        assert_eq!(release_year("2020-13-01"), None);
        assert_eq!(release_year("2021-02-30"), None);
        assert_eq!(release_year("0000"), None);
        assert_eq!(release_year(""), None);
    }

    #[test]
    fn test_integer_release_dates_are_years() {
        let df = df!(
            "name" => &["a", "b"],
            "release_date" => &[1999i64, 2004],
        )
        .unwrap();

        let (out, _) = normalize_tracks(df).unwrap();
        let years: Vec<Option<i32>> = out.column("release_date").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(1999), Some(2004)]);
    }

    #[test]
    fn test_missing_columns_warn_and_continue() {
        let df = df!(
            "name" => &["Song"],
            "explicit" => &[0i64],
        )
        .unwrap();

        let (out, warnings) = normalize_tracks(df).unwrap();
        let missing: Vec<&str> = warnings.iter().map(|w| w.column.as_str()).collect();

        assert_eq!(missing, vec!["artists", "duration_ms", "release_date"]);
        assert_eq!(utf8_values(&out, "explicit"), vec![Some("FALSE".to_string())]);
        assert!(!out.get_column_names().contains(&"duration_minutes"));
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tracks.csv");
        let output = dir.path().join("tracks_processed.csv");
        std::fs::write(
            &input,
            "name,artists,explicit,duration_ms,release_date\n\"Song A\",\"['Alice']\",1,180000,2020-05-01\n",
        )
        .unwrap();

        let report = TrackNormalizer::new(StagePaths::new(&input, &output)).run().unwrap();

        assert_eq!(report.rows, 1);
        assert!(report.warnings.is_empty());
        let written = std::fs::read_to_string(&output).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("name,artists,explicit,duration_ms,release_date,duration_minutes")
        );
        let fields: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(&fields[..5], &["Song A", "Alice", "TRUE", "180000", "2020"]);
        assert_eq!(fields[5].parse::<f64>().unwrap(), 3.0);
        assert_eq!(lines.next(), None);
    }
}
