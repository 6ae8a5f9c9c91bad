// Level-1 service - Calendar, day overview and scan plots
use crate::application::odin_repository::OdinRepository;
use crate::domain::level1::{
    CalendarEvent, DayFreqMode, ScanOverviewPlots, ScanTableRow, first_measurement_date,
};
use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Days covered by one upstream period request (six calendar weeks).
pub const PERIOD_LENGTH_DAYS: i64 = 42;
const START_VIEW_STEP_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarMessage {
    Period {
        start: NaiveDate,
        events: Vec<CalendarEvent>,
    },
    Failed {
        start: NaiveDate,
        error: String,
    },
    Complete {
        periods: usize,
        events: usize,
        duration_ms: i64,
    },
}

#[derive(Clone)]
pub struct Level1Service {
    repository: Arc<dyn OdinRepository>,
}

impl Level1Service {
    pub fn new(repository: Arc<dyn OdinRepository>) -> Self {
        Self { repository }
    }

    pub async fn calendar_events(&self, start: NaiveDate) -> anyhow::Result<Vec<CalendarEvent>> {
        let entries = self.repository.period_info(start).await?;
        Ok(entries.iter().filter_map(CalendarEvent::from_period_entry).collect())
    }

    /// Closest date at or before `date` whose period has data, stepping back a week at a time.
    pub async fn start_view(&self, date: NaiveDate) -> anyhow::Result<NaiveDate> {
        let earliest = first_measurement_date();
        let mut current = date;

        loop {
            if !self.repository.period_info(current).await?.is_empty() {
                return Ok(current);
            }
            if current <= earliest {
                return Ok(earliest);
            }
            current -= Duration::days(START_VIEW_STEP_DAYS);
            tracing::debug!("No data in period, stepping back to {}", current);
        }
    }

    pub async fn day_overview(&self, date: NaiveDate) -> anyhow::Result<Vec<DayFreqMode>> {
        self.repository.day_overview(date).await
    }

    pub async fn scan_table(&self, date: NaiveDate, freqmode: u32) -> anyhow::Result<Vec<ScanTableRow>> {
        let logs = self.repository.scan_logs(date, freqmode).await?;
        Ok(logs.iter().map(ScanTableRow::from).collect())
    }

    pub async fn scan_plots(&self, date: NaiveDate, freqmode: u32) -> anyhow::Result<ScanOverviewPlots> {
        let logs = self.repository.scan_logs(date, freqmode).await?;
        tracing::debug!("Plotting {} scans of freqmode {} on {}", logs.len(), freqmode, date);
        Ok(ScanOverviewPlots::from_logs(date, &logs))
    }

    /// Stream calendar events for `periods` consecutive periods starting at `start`.
    ///
    /// Each period is fetched by its own task and sent as soon as it arrives;
    /// the completion message follows once every task has finished.
    pub async fn stream_calendar(
        &self,
        start: NaiveDate,
        periods: usize,
    ) -> mpsc::Receiver<CalendarMessage> {
        let (tx, rx) = mpsc::channel(periods.max(1) + 1);
        let start_time = Instant::now();

        let mut handles = Vec::with_capacity(periods);
        for i in 0..periods {
            let tx = tx.clone();
            let repo = self.repository.clone();
            let period_start = start + Duration::days(PERIOD_LENGTH_DAYS * i as i64);

            handles.push(tokio::spawn(async move {
                let msg = match repo.period_info(period_start).await {
                    Ok(entries) => CalendarMessage::Period {
                        start: period_start,
                        events: entries
                            .iter()
                            .filter_map(CalendarEvent::from_period_entry)
                            .collect(),
                    },
                    Err(e) => {
                        tracing::error!("Error fetching period {}: {:#}", period_start, e);
                        CalendarMessage::Failed {
                            start: period_start,
                            error: e.to_string(),
                        }
                    }
                };
                let count = match &msg {
                    CalendarMessage::Period { events, .. } => events.len(),
                    _ => 0,
                };
                let _ = tx.send(msg).await;
                count
            }));
        }

        tokio::spawn(async move {
            let events = join_all(handles)
                .await
                .into_iter()
                .filter_map(Result::ok)
                .sum();
            let complete = CalendarMessage::Complete {
                periods,
                events,
                duration_ms: start_time.elapsed().as_millis() as i64,
            };
            let _ = tx.send(complete).await;
        });

        rx
    }
}
