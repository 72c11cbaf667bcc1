use polars::prelude::*;
use std::collections::HashMap;

/// Chart region codes in enumeration order. `lv`, `py` and `id` appear twice;
/// the later entry wins, so `id` resolves to India.
pub const REGION_NAMES: [(&str, &str); 57] = [
    ("ar", "Argentina"),
    ("cl", "Chile"),
    ("cr", "Costa Rica"),
    ("de", "Germany"),
    ("ec", "Ecuador"),
    ("ee", "Estonia"),
    ("fi", "Finland"),
    ("fr", "France"),
    ("it", "Italy"),
    ("lt", "Lithuania"),
    ("no", "Norway"),
    ("nz", "New Zealand"),
    ("ph", "Philippines"),
    ("sv", "El Salvador"),
    ("tr", "Turkey"),
    ("tw", "Taiwan"),
    ("us", "United States"),
    ("hk", "Hong Kong"),
    ("gr", "Greece"),
    ("lv", "Latvia"),
    ("au", "Australia"),
    ("py", "Paraguay"),
    ("global", "Global"),
    ("gb", "United Kingdom"),
    ("lu", "Luxembourg"),
    ("do", "Dominican Republic"),
    ("id", "Indonesia"),
    ("sg", "Singapore"),
    ("jp", "Japan"),
    ("co", "Colombia"),
    ("sk", "South Korea"),
    ("nl", "Netherlands"),
    ("ie", "Ireland"),
    ("cz", "Czech Republic"),
    ("at", "Austria"),
    ("be", "Belgium"),
    ("bo", "Bolivia"),
    ("br", "Brazil"),
    ("ca", "Canada"),
    ("ch", "China"),
    ("dk", "Denmark"),
    ("es", "Spain"),
    ("hn", "Honduras"),
    ("hu", "Hungary"),
    ("id", "India"),
    ("is", "Iceland"),
    ("lv", "Latvia"),
    ("mx", "Mexico"),
    ("my", "Malaysia"),
    ("pa", "Panama"),
    ("pe", "Peru"),
    ("pl", "Poland"),
    ("pt", "Portugal"),
    ("py", "Paraguay"),
    ("se", "Sweden"),
    ("uy", "Uruguay"),
    ("gt", "Guatemala"),
];

/// Immutable code -> country name lookup.
pub struct RegionMapper {
    names: HashMap<&'static str, &'static str>,
}

impl RegionMapper {
    /// Build from an ordered table; repeated codes keep their last name.
    pub fn from_entries(entries: &[(&'static str, &'static str)]) -> Self {
        let mut names = HashMap::with_capacity(entries.len());
        for &(code, name) in entries {
            names.insert(code, name);
        }
        Self { names }
    }

    pub fn country_name(&self, code: &str) -> Option<&'static str> {
        self.names.get(code).copied()
    }

    /// Country name for a known code, the code itself otherwise.
    pub fn map_code<'a>(&self, code: &'a str) -> &'a str {
        self.country_name(code).unwrap_or(code)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Rewrite every value of a region column. Nulls stay null; non-text
    /// columns are compared by their text form.
    pub fn map_series(&self, regions: &Series) -> PolarsResult<Series> {
        let as_text = regions.cast(&DataType::Utf8)?;
        let mapped: Vec<Option<String>> = as_text
            .utf8()?
            .into_iter()
            .map(|value| value.map(|code| self.map_code(code).to_string()))
            .collect();

        Ok(Series::new(regions.name(), mapped))
    }
}

impl Default for RegionMapper {
    fn default() -> Self {
        Self::from_entries(&REGION_NAMES)
    }
}
