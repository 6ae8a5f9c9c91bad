// In-memory repository for service tests
use crate::application::odin_repository::{OdinRepository, ScanPage};
use crate::domain::level1::{DayFreqMode, ScanLog};
use crate::domain::level2::{L2Product, ProjectMode, ProjectRef, ScanKind, ScanSearchQuery};
use crate::domain::statistics::{FreqModeCount, Timeline};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeRepository {
    pub production_projects: Option<Vec<Value>>,
    pub development_projects: Option<Vec<Value>>,
    pub freqmodes: Vec<Value>,
    pub periods: HashMap<NaiveDate, Vec<DayFreqMode>>,
    pub days: HashMap<NaiveDate, Vec<DayFreqMode>>,
    pub scan_logs: Vec<ScanLog>,
    pub products: Vec<L2Product>,
    pub scan_page: ScanPage,
    pub area: Vec<Map<String, Value>>,
    pub freqmode_counts: Vec<FreqModeCount>,
    pub timeline: Timeline,
    pub fail_all: bool,
    pub period_requests: Mutex<Vec<NaiveDate>>,
    pub search_requests: Mutex<Vec<ScanSearchQuery>>,
}

impl FakeRepository {
    fn check(&self) -> anyhow::Result<()> {
        if self.fail_all {
            anyhow::bail!("upstream unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl OdinRepository for FakeRepository {
    async fn list_projects(&self, mode: ProjectMode) -> anyhow::Result<Vec<Value>> {
        self.check()?;
        let projects = match mode {
            ProjectMode::Production => &self.production_projects,
            ProjectMode::Development => &self.development_projects,
        };
        projects
            .clone()
            .ok_or_else(|| anyhow::anyhow!("{} projects unavailable", mode))
    }

    async fn list_freqmodes(&self, _project: &ProjectRef) -> anyhow::Result<Vec<Value>> {
        self.check()?;
        Ok(self.freqmodes.clone())
    }

    async fn day_overview(&self, date: NaiveDate) -> anyhow::Result<Vec<DayFreqMode>> {
        self.check()?;
        Ok(self.days.get(&date).cloned().unwrap_or_default())
    }

    async fn period_info(&self, date: NaiveDate) -> anyhow::Result<Vec<DayFreqMode>> {
        self.check()?;
        if let Ok(mut requests) = self.period_requests.lock() {
            requests.push(date);
        }
        Ok(self.periods.get(&date).cloned().unwrap_or_default())
    }

    async fn scan_logs(&self, _date: NaiveDate, freqmode: u32) -> anyhow::Result<Vec<ScanLog>> {
        self.check()?;
        Ok(self
            .scan_logs
            .iter()
            .filter(|l| l.freq_mode == freqmode)
            .cloned()
            .collect())
    }

    async fn level2_products(
        &self,
        _project: &ProjectRef,
        _freqmode: u32,
        _scan_id: u64,
    ) -> anyhow::Result<Vec<L2Product>> {
        self.check()?;
        Ok(self.products.clone())
    }

    async fn search_scans(
        &self,
        _project: &ProjectRef,
        _freqmode: u32,
        _kind: ScanKind,
        query: &ScanSearchQuery,
    ) -> anyhow::Result<ScanPage> {
        self.check()?;
        if let Ok(mut requests) = self.search_requests.lock() {
            requests.push(query.clone());
        }
        Ok(self.scan_page.clone())
    }

    async fn level2_area(
        &self,
        _project: &ProjectRef,
        _params: &[(String, String)],
    ) -> anyhow::Result<Vec<Map<String, Value>>> {
        self.check()?;
        Ok(self.area.clone())
    }

    async fn freqmode_statistics(&self, _year: Option<i32>) -> anyhow::Result<Vec<FreqModeCount>> {
        self.check()?;
        Ok(self.freqmode_counts.clone())
    }

    async fn timeline_statistics(&self, _year: Option<i32>) -> anyhow::Result<Timeline> {
        self.check()?;
        Ok(self.timeline.clone())
    }
}
