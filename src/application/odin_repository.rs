// Repository trait for Odin API data access
use crate::domain::level1::{DayFreqMode, ScanLog};
use crate::domain::level2::{L2Product, ProjectMode, ProjectRef, ScanEntry, ScanKind, ScanSearchQuery};
use crate::domain::statistics::{FreqModeCount, Timeline};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// One page of a Level-2 scan search plus the total number of matches.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub scans: Vec<ScanEntry>,
    pub count: u64,
}

#[async_trait]
pub trait OdinRepository: Send + Sync {
    /// Raw project entries (`Name`, ...) of the production or development database
    async fn list_projects(&self, mode: ProjectMode) -> anyhow::Result<Vec<Value>>;

    /// Raw freqmode entries (`FreqMode`, ...) processed in a project
    async fn list_freqmodes(&self, project: &ProjectRef) -> anyhow::Result<Vec<Value>>;

    /// Scans per backend and freqmode for one day
    async fn day_overview(&self, date: NaiveDate) -> anyhow::Result<Vec<DayFreqMode>>;

    /// Scans per day, backend and freqmode for the calendar period starting at `date`
    async fn period_info(&self, date: NaiveDate) -> anyhow::Result<Vec<DayFreqMode>>;

    /// Log records of every scan of a freqmode on one day
    async fn scan_logs(&self, date: NaiveDate, freqmode: u32) -> anyhow::Result<Vec<ScanLog>>;

    /// Retrieved products of one Level-2 scan
    async fn level2_products(
        &self,
        project: &ProjectRef,
        freqmode: u32,
        scan_id: u64,
    ) -> anyhow::Result<Vec<L2Product>>;

    async fn search_scans(
        &self,
        project: &ProjectRef,
        freqmode: u32,
        kind: ScanKind,
        query: &ScanSearchQuery,
    ) -> anyhow::Result<ScanPage>;

    /// Level-2 results within an area/time window, one object per retrieved point
    async fn level2_area(
        &self,
        project: &ProjectRef,
        params: &[(String, String)],
    ) -> anyhow::Result<Vec<Map<String, Value>>>;

    async fn freqmode_statistics(&self, year: Option<i32>) -> anyhow::Result<Vec<FreqModeCount>>;

    async fn timeline_statistics(&self, year: Option<i32>) -> anyhow::Result<Timeline>;
}
