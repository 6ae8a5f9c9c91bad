// Scan statistics chart models
use crate::domain::freqmode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FreqModeCount {
    pub freqmode: u32,
    pub sum: u64,
}

/// Upstream timeline: per freqmode a list of `[year or month, scans]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeline {
    #[serde(rename = "Data", default)]
    pub data: BTreeMap<String, Vec<[f64; 2]>>,
    #[serde(rename = "Years", default)]
    pub years: Vec<u32>,
    #[serde(rename = "Months", default)]
    pub months: Vec<u32>,
}

/// Whole archive or a single year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsScope {
    Total,
    Year(i32),
}

impl StatisticsScope {
    pub fn from_year(year: Option<i32>) -> Self {
        year.map(StatisticsScope::Year).unwrap_or(StatisticsScope::Total)
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            StatisticsScope::Total => None,
            StatisticsScope::Year(y) => Some(*y),
        }
    }

    fn suffix(&self) -> String {
        match self {
            StatisticsScope::Total => String::new(),
            StatisticsScope::Year(y) => format!(" for {}", y),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub color: &'static str,
    pub data: u64,
    pub label: String,
    pub short_label: String,
    pub long_label: String,
}

impl From<&FreqModeCount> for PieSlice {
    fn from(count: &FreqModeCount) -> Self {
        Self {
            color: freqmode::colour(count.freqmode),
            data: count.sum,
            label: format!("FM {} ({})", count.freqmode, count.sum),
            short_label: format!("FM {}", count.freqmode),
            long_label: format!("Frequency mode {}: {} scans", count.freqmode, count.sum),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FreqModePie {
    pub slices: Vec<PieSlice>,
    pub total: u64,
    pub heading: String,
    pub summary: String,
}

impl FreqModePie {
    pub fn new(scope: StatisticsScope, counts: &[FreqModeCount]) -> Self {
        let total = counts.iter().map(|c| c.sum).sum();
        Self {
            slices: counts.iter().map(PieSlice::from).collect(),
            total,
            heading: format!("Total number of scans by frequency mode{}:", scope.suffix()),
            summary: format!("Total number of scans{}: {}", scope.suffix(), total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSeries {
    pub freqmode: u32,
    pub color: &'static str,
    pub label: String,
    pub long_label: String,
    pub data: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub value: u32,
    pub label: String,
}

/// Stacked bars of scans per year (total) or per month (single year).
#[derive(Debug, Clone, Serialize)]
pub struct TimelineChart {
    pub series: Vec<TimelineSeries>,
    pub ticks: Vec<Tick>,
    pub heading: String,
}

impl TimelineChart {
    pub fn new(scope: StatisticsScope, timeline: &Timeline) -> Self {
        let mut series: Vec<TimelineSeries> = timeline
            .data
            .iter()
            .filter_map(|(key, data)| match key.parse::<u32>() {
                Ok(fm) => Some(TimelineSeries {
                    freqmode: fm,
                    color: freqmode::colour(fm),
                    label: format!("FM {}", fm),
                    long_label: format!("Frequency mode {}", fm),
                    data: data.clone(),
                }),
                Err(_) => {
                    tracing::warn!("Ignoring timeline entry with non-numeric freqmode {:?}", key);
                    None
                }
            })
            .collect();
        series.sort_by_key(|s| s.freqmode);

        let (ticks, per) = match scope {
            StatisticsScope::Total => (
                timeline
                    .years
                    .iter()
                    .map(|y| Tick {
                        value: *y,
                        label: y.to_string(),
                    })
                    .collect(),
                "year".to_string(),
            ),
            StatisticsScope::Year(year) => (
                timeline
                    .months
                    .iter()
                    .map(|m| Tick {
                        value: *m,
                        label: freqmode::month_name(*m).unwrap_or_default().to_string(),
                    })
                    .collect(),
                format!("month for {}", year),
            ),
        };

        Self {
            series,
            ticks,
            heading: format!(
                "Number of scans and frequency mode distribution per {}:",
                per
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_totals_and_labels() {
        let counts = vec![
            FreqModeCount { freqmode: 1, sum: 300 },
            FreqModeCount { freqmode: 2, sum: 700 },
        ];
        let pie = FreqModePie::new(StatisticsScope::Total, &counts);
        assert_eq!(pie.total, 1000);
        assert_eq!(pie.slices[1].label, "FM 2 (700)");
        assert_eq!(pie.slices[1].long_label, "Frequency mode 2: 700 scans");
        assert_eq!(pie.slices[1].color, "#4169E1");
        assert_eq!(pie.heading, "Total number of scans by frequency mode:");
        assert_eq!(pie.summary, "Total number of scans: 1000");

        let yearly = FreqModePie::new(StatisticsScope::Year(2015), &counts);
        assert_eq!(yearly.heading, "Total number of scans by frequency mode for 2015:");
    }

    #[test]
    fn test_timeline_year_scope_uses_month_names() {
        let json = r#"{"Data": {"13": [[1, 10], [2, 20]], "2": [[1, 5]], "x": []},
                        "Months": [1, 2]}"#;
        let timeline: Timeline = serde_json::from_str(json).unwrap();
        let chart = TimelineChart::new(StatisticsScope::Year(2015), &timeline);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].freqmode, 2);
        assert_eq!(chart.series[1].data, vec![[1.0, 10.0], [2.0, 20.0]]);
        assert_eq!(chart.ticks[1].label, "February");
        assert!(chart.heading.ends_with("per month for 2015:"));
    }

    #[test]
    fn test_timeline_total_scope_uses_years() {
        let timeline = Timeline {
            years: vec![2002, 2003],
            ..Default::default()
        };
        let chart = TimelineChart::new(StatisticsScope::from_year(None), &timeline);
        assert_eq!(chart.ticks[0].label, "2002");
        assert!(chart.heading.ends_with("per year:"));
    }
}
