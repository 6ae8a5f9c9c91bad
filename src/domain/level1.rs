// Level-1 overview domain models
use crate::domain::freqmode::{self, Backend};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const OVERVIEW_SERIES_COLOUR: &str = "#2C5AA0";

/// Earliest date the calendar will rewind to when looking for data.
pub fn first_measurement_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2001, 2, 20).unwrap_or_default()
}

/// Number of scans for one frequency mode on one day.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DayFreqMode {
    #[serde(rename = "Date", default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Backend")]
    pub backend: Backend,
    #[serde(rename = "FreqMode")]
    pub freq_mode: u32,
    #[serde(rename = "NumScan")]
    pub num_scan: u64,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

/// Log record of a single Level-1 scan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanLog {
    #[serde(rename = "ScanID")]
    pub scan_id: u64,
    #[serde(rename = "DateTime")]
    pub date_time: String,
    #[serde(rename = "FreqMode")]
    pub freq_mode: u32,
    #[serde(rename = "LatStart")]
    pub lat_start: f64,
    #[serde(rename = "LonStart")]
    pub lon_start: f64,
    #[serde(rename = "SunZD")]
    pub sun_zd: f64,
    #[serde(rename = "AltStart")]
    pub alt_start: f64,
    #[serde(rename = "AltEnd")]
    pub alt_end: f64,
    #[serde(rename = "NumSpec")]
    pub num_spec: f64,
    #[serde(rename = "Quality", default)]
    pub quality: Option<f64>,
    #[serde(rename = "URLS", default)]
    pub urls: HashMap<String, String>,
}

impl ScanLog {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_api_datetime(&self.date_time)
    }
}

/// Parse the timestamps the API emits: naive ISO 8601 (UTC) or RFC 3339.
pub fn parse_api_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDate,
    pub id: NaiveDate,
    pub url: String,
    pub color: String,
    #[serde(rename = "textColor")]
    pub text_color: String,
    #[serde(rename = "FreqMode")]
    pub freq_mode: u32,
    #[serde(rename = "Backend")]
    pub backend: Backend,
}

impl CalendarEvent {
    /// Build an event from a period entry; entries without a date have no slot on the calendar.
    pub fn from_period_entry(entry: &DayFreqMode) -> Option<Self> {
        let date = entry.date?;
        Some(Self {
            title: format!(
                "FM: {} ({}): {} scans",
                entry.freq_mode, entry.backend, entry.num_scan
            ),
            start: date,
            id: date,
            url: "#level1-date".to_string(),
            color: freqmode::colour(entry.freq_mode).to_string(),
            text_color: freqmode::text_colour(entry.freq_mode).to_string(),
            freq_mode: entry.freq_mode,
            backend: entry.backend,
        })
    }
}

/// Table row for the scans of one frequency mode.
#[derive(Debug, Clone, Serialize)]
pub struct ScanTableRow {
    #[serde(rename = "ScanID")]
    pub scan_id: u64,
    #[serde(rename = "DateTime")]
    pub date_time: String,
    #[serde(rename = "AltStart")]
    pub alt_start: f64,
    #[serde(rename = "AltEnd")]
    pub alt_end: f64,
    #[serde(rename = "FreqMode")]
    pub freq_mode: u32,
    #[serde(rename = "Quality")]
    pub quality: Option<f64>,
    #[serde(rename = "SunZD")]
    pub sun_zd: String,
    #[serde(rename = "URL")]
    pub url: Option<String>,
}

impl From<&ScanLog> for ScanTableRow {
    fn from(log: &ScanLog) -> Self {
        Self {
            scan_id: log.scan_id,
            date_time: log.date_time.clone(),
            alt_start: log.alt_start,
            alt_end: log.alt_end,
            freq_mode: log.freq_mode,
            quality: log.quality,
            sun_zd: format!("{:.2}", log.sun_zd),
            url: log.urls.get("URL-spectra").cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeAxis {
    pub min: i64,
    pub max: i64,
}

impl TimeAxis {
    /// Whole UTC day in epoch milliseconds, start inclusive, end at the last millisecond.
    pub fn for_day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1) - Duration::milliseconds(1);
        Self {
            min: start.timestamp_millis(),
            max: end.timestamp_millis(),
        }
    }
}

/// Per-scan series plotted under a frequency mode row.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOverviewPlots {
    pub color: &'static str,
    pub xaxis: TimeAxis,
    pub latitude: Vec<[f64; 2]>,
    pub longitude: Vec<[f64; 2]>,
    pub sun_zd: Vec<[f64; 2]>,
    pub num_spec: Vec<[f64; 2]>,
    pub quality: Vec<[f64; 2]>,
}

impl ScanOverviewPlots {
    pub fn from_logs(date: NaiveDate, logs: &[ScanLog]) -> Self {
        let mut plots = Self {
            color: OVERVIEW_SERIES_COLOUR,
            xaxis: TimeAxis::for_day(date),
            latitude: Vec::with_capacity(logs.len()),
            longitude: Vec::with_capacity(logs.len()),
            sun_zd: Vec::with_capacity(logs.len()),
            num_spec: Vec::with_capacity(logs.len()),
            quality: Vec::with_capacity(logs.len()),
        };

        for log in logs {
            let Some(time) = log.timestamp() else {
                tracing::warn!(
                    "Skipping scan {} with unparsable DateTime {:?}",
                    log.scan_id,
                    log.date_time
                );
                continue;
            };
            let t = time.timestamp_millis() as f64;

            plots.latitude.push([t, log.lat_start]);
            plots.longitude.push([t, log.lon_start]);
            plots.sun_zd.push([t, log.sun_zd]);
            plots.num_spec.push([t, log.num_spec]);
            if let Some(q) = log.quality {
                plots.quality.push([t, q]);
            }
        }

        plots
    }
}
