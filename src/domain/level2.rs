// Level-2 domain models: projects, retrieved products and scan search
use crate::domain::level1::parse_api_datetime;
use crate::domain::plot_data::{
    OffsetInput, PlotDataError, Point, combine_series, max_with_positive_error, meters_to_km,
    min_with_negative_error, normalize_offset, ratio_to_ppm,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of scans the search table shows per page.
pub const SEARCH_PAGE_SIZE: u32 = 1000;

const RETRIEVED_LABEL: &str = "Odin-SMR-v3";
const RETRIEVED_COLOUR: &str = "#2c5aa0";
const APRIORI_LABEL: &str = "Odin-SMR-apriori";
const APRIORI_COLOUR: &str = "#5aa02c";
const MEAS_RESPONSE_COLOUR: &str = "black";
const PROFILE_AXIS_MARGIN: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectMode {
    Production,
    Development,
}

impl ProjectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectMode::Production => "production",
            ProjectMode::Development => "development",
        }
    }
}

impl fmt::Display for ProjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(ProjectMode::Production),
            "development" => Ok(ProjectMode::Development),
            other => anyhow::bail!("unknown project mode: {}", other),
        }
    }
}

/// A Level-2 processing project, qualified by the database it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectRef {
    pub mode: ProjectMode,
    pub name: String,
}

impl ProjectRef {
    pub fn new(mode: ProjectMode, name: impl Into<String>) -> Self {
        Self {
            mode,
            name: name.into(),
        }
    }

    /// Path segment(s) under `level2/`; production projects are addressed by name only.
    pub fn api_path(&self) -> String {
        match self.mode {
            ProjectMode::Production => self.name.clone(),
            ProjectMode::Development => format!("development/{}", self.name),
        }
    }
}

impl FromStr for ProjectRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((mode, name)) if !name.is_empty() => Ok(Self::new(mode.parse()?, name)),
            _ => Ok(Self::new(ProjectMode::Production, s)),
        }
    }
}

/// One retrieved product of a Level-2 scan.
#[derive(Debug, Clone, Deserialize)]
pub struct L2Product {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Altitude")]
    pub altitude: Vec<f64>,
    #[serde(rename = "VMR", default)]
    pub vmr: Vec<f64>,
    #[serde(rename = "Temperature", default)]
    pub temperature: Option<Vec<f64>>,
    #[serde(rename = "Apriori")]
    pub apriori: Vec<f64>,
    #[serde(rename = "ErrorTotal")]
    pub error_total: Vec<f64>,
    #[serde(rename = "AVK", default)]
    pub avk: Vec<Vec<f64>>,
    #[serde(rename = "MeasResponse", default)]
    pub meas_response: Vec<f64>,
}

impl L2Product {
    pub fn is_temperature(&self) -> bool {
        self.product.starts_with("Temperature")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub label: Option<String>,
    pub color: Option<String>,
    /// Flot-style error bars along x; points carry the error as third element.
    pub x_errorbars: bool,
    pub data: Vec<Point>,
}

impl PlotSeries {
    fn new(label: Option<&str>, color: Option<&str>, data: Vec<Point>) -> Self {
        Self {
            label: label.map(str::to_string),
            color: color.map(str::to_string),
            x_errorbars: false,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Profile and averaging-kernel plots for one product.
#[derive(Debug, Clone, Serialize)]
pub struct AltitudeCrossSection {
    pub product: String,
    pub profile: Vec<PlotSeries>,
    pub profile_xaxis: AxisRange,
    pub avk: Vec<PlotSeries>,
    pub avk_xaxis: AxisRange,
}

impl AltitudeCrossSection {
    pub fn from_product(product: &L2Product) -> Result<Self, PlotDataError> {
        let altitude_km = meters_to_km(&product.altitude);
        let two_sigma: Vec<f64> = product.error_total.iter().map(|e| e * 2.0).collect();

        let (value, error, apriori) = match (&product.temperature, product.is_temperature()) {
            (Some(temperature), true) => (temperature.clone(), two_sigma, product.apriori.clone()),
            (None, true) => return Err(PlotDataError::EmptyInput),
            (_, false) => (
                ratio_to_ppm(&product.vmr),
                ratio_to_ppm(&two_sigma),
                ratio_to_ppm(&product.apriori),
            ),
        };

        let x_max = max_with_positive_error(&value, &error)?;
        let x_min = min_with_negative_error(&value, &error)?;
        let apriori_max = apriori.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut retrieved = PlotSeries::new(
            Some(RETRIEVED_LABEL),
            Some(RETRIEVED_COLOUR),
            combine_series(&[value, altitude_km.clone(), error])?,
        );
        retrieved.x_errorbars = true;
        let apriori_series = PlotSeries::new(
            Some(APRIORI_LABEL),
            Some(APRIORI_COLOUR),
            combine_series(&[apriori, altitude_km.clone()])?,
        );

        let mut avk = Vec::with_capacity(product.avk.len() + 1);
        if !product.avk.is_empty() {
            for column in combine_series(&product.avk)? {
                avk.push(PlotSeries::new(
                    None,
                    None,
                    combine_series(&[column, altitude_km.clone()])?,
                ));
            }
        }
        avk.push(PlotSeries::new(
            None,
            Some(MEAS_RESPONSE_COLOUR),
            combine_series(&[product.meas_response.clone(), altitude_km])?,
        ));

        Ok(Self {
            product: product.product.clone(),
            profile: vec![retrieved, apriori_series],
            profile_xaxis: AxisRange {
                min: Some(x_min),
                max: Some(x_max.max(apriori_max) * PROFILE_AXIS_MARGIN),
            },
            avk,
            avk_xaxis: AxisRange {
                min: Some(-0.5),
                max: Some(1.5),
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Scans,
    Failed,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Scans => "scans",
            ScanKind::Failed => "failed",
        }
    }
}

/// A search bound given as a timestamp or a bare date (midnight UTC).
fn search_bound(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    parse_api_datetime(raw)
        .or_else(|| {
            ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("start_time {start} is after end_time {end}")]
    InvertedRange { start: String, end: String },
}

/// Query string of a Level-2 scan search as submitted by the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanSearchQuery {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub offset: Option<OffsetInput>,
}

impl ScanSearchQuery {
    pub fn offset(&self) -> u32 {
        self.offset.clone().map(normalize_offset).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if let (Some(start), Some(end)) = (&self.start_time, &self.end_time) {
            let (Some(from), Some(to)) = (search_bound(start), search_bound(end)) else {
                return Ok(());
            };
            if from > to {
                return Err(SearchError::InvertedRange {
                    start: start.clone(),
                    end: end.clone(),
                });
            }
        }
        Ok(())
    }

    /// Encoded query parameters for the upstream API, offset normalized.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start_time.as_ref().filter(|s| !s.is_empty()) {
            params.push(("start_time", start.clone()));
        }
        if let Some(end) = self.end_time.as_ref().filter(|s| !s.is_empty()) {
            params.push(("end_time", end.clone()));
        }
        params.push(("offset", self.offset().to_string()));
        params
    }
}

/// Scan entry returned by the upstream search.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanEntry {
    #[serde(rename = "ScanID")]
    pub scan_id: u64,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "URLS", default)]
    pub urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRow {
    pub scan_id: u64,
    pub date: Option<String>,
    pub message: String,
    pub level1_data: Option<String>,
    pub level1_plot: String,
    pub level2_data: Option<String>,
    pub level2_plot: String,
}

impl SearchRow {
    pub fn new(entry: &ScanEntry, project: &ProjectRef, freqmode: u32) -> Self {
        Self {
            scan_id: entry.scan_id,
            date: entry.date.clone(),
            message: entry.error.clone().unwrap_or_else(|| "N/A".to_string()),
            level1_data: entry.urls.get("URL-spectra").cloned(),
            level1_plot: format!("/browse/{}/{}/", freqmode, entry.scan_id),
            level2_data: entry.urls.get("URL-level2").cloned(),
            level2_plot: format!("/level2/{}/{}/{}", project.api_path(), freqmode, entry.scan_id),
        }
    }
}

/// Paging summary shown above the search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSummary {
    pub count: u64,
    pub offset: u32,
    pub lower_bound: u64,
    pub upper_bound: u64,
    pub max_offset: u64,
    pub text: String,
}

impl SearchSummary {
    pub fn new(project: &ProjectRef, freqmode: u32, kind: ScanKind, count: u64, offset: u32) -> Self {
        let page = SEARCH_PAGE_SIZE as u64;
        let lower_bound = offset as u64 + 1;
        let upper_bound = (offset as u64 + page).min(count);
        let max_offset = count.saturating_sub(1) / page * page;

        let mut text = format!(
            "Project: {}, Freqmode: {}, Type: {}: In total data from {} scans is available. ",
            project.api_path(),
            freqmode,
            kind.as_str(),
            count
        );
        if lower_bound > count {
            text.push_str(&format!(
                "You have entered an offset ({}) that is greater or equal to the total number \
                 of available scans. Update offset to be less or equal to {} to get entries \
                 to scans in table.",
                offset, max_offset
            ));
        } else {
            text.push_str(&format!(
                "The table is showing entries for scan {} to {} within selected range. ",
                lower_bound, upper_bound
            ));
            if count > page {
                text.push_str("Update start date or offset to get entries to other scans in table.");
            }
        }

        Self {
            count,
            offset,
            lower_bound,
            upper_bound,
            max_offset,
            text,
        }
    }
}
