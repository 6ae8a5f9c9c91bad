// Statistics service - Scan counts per freqmode and over time
use crate::application::odin_repository::OdinRepository;
use crate::domain::freqmode::{self, FreqModeInfoRow};
use crate::domain::statistics::{FreqModePie, StatisticsScope, TimelineChart};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsPage {
    pub year: Option<i32>,
    pub freqmodes: FreqModePie,
    pub timeline: TimelineChart,
}

#[derive(Clone)]
pub struct StatisticsService {
    repository: Arc<dyn OdinRepository>,
}

impl StatisticsService {
    pub fn new(repository: Arc<dyn OdinRepository>) -> Self {
        Self { repository }
    }

    pub async fn statistics(&self, year: Option<i32>) -> anyhow::Result<StatisticsPage> {
        let scope = StatisticsScope::from_year(year);
        let (counts, timeline) = futures::try_join!(
            self.repository.freqmode_statistics(scope.year()),
            self.repository.timeline_statistics(scope.year()),
        )?;

        Ok(StatisticsPage {
            year,
            freqmodes: FreqModePie::new(scope, &counts),
            timeline: TimelineChart::new(scope, &timeline),
        })
    }

    pub fn freqmode_info(&self) -> Vec<FreqModeInfoRow> {
        freqmode::info_table()
    }
}
