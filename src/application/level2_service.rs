// Level-2 service - Project selectors, scan plots, search and period overview
use crate::application::odin_repository::OdinRepository;
use crate::domain::geo::{OverviewScale, overview_info_text, to_feature_collection};
use crate::domain::level2::{
    AltitudeCrossSection, ProjectMode, ProjectRef, ScanKind, ScanSearchQuery, SearchRow,
    SearchSummary,
};
use crate::domain::selector::{Selector, SelectorSettings, populate};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub summary: SearchSummary,
    pub rows: Vec<SearchRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodOverview {
    /// Heading text, present when the window's product, times and altitudes were given.
    pub info: Option<String>,
    pub geojson: Value,
    /// Absent when the window holds no results.
    pub scale: Option<OverviewScale>,
}

#[derive(Clone)]
pub struct Level2Service {
    repository: Arc<dyn OdinRepository>,
}

impl Level2Service {
    pub fn new(repository: Arc<dyn OdinRepository>) -> Self {
        Self { repository }
    }

    /// Projects from both databases; returned only once both requests have finished.
    pub async fn project_selector(&self) -> Selector {
        let (production, development) = futures::join!(
            self.repository.list_projects(ProjectMode::Production),
            self.repository.list_projects(ProjectMode::Development),
        );

        let mut options = Vec::new();
        for (mode, response) in [
            (ProjectMode::Production, production),
            (ProjectMode::Development, development),
        ] {
            if let Err(e) = &response {
                tracing::error!("Error fetching {} projects: {:#}", mode, e);
            }
            let settings = SelectorSettings {
                title: Some(mode.to_string()),
                empty: Some("No projects in database".to_string()),
                fail: Some("Failed to load projects".to_string()),
                item_key: "Name".to_string(),
            };
            options.extend(populate(&settings, response.as_deref()));
        }

        Selector {
            placeholder: "Choose project".to_string(),
            options,
        }
    }

    pub async fn freqmode_selector(&self, project: &ProjectRef) -> Selector {
        let response = self.repository.list_freqmodes(project).await;
        if let Err(e) = &response {
            tracing::error!("Error fetching freqmodes for {}: {:#}", project.api_path(), e);
        }

        let settings = SelectorSettings {
            title: None,
            empty: Some(format!("No freqmodes in database for {}", project.api_path())),
            fail: Some(format!("Failed to load freqmodes for {}", project.api_path())),
            item_key: "FreqMode".to_string(),
        };

        Selector {
            placeholder: "Choose freqmode".to_string(),
            options: populate(&settings, response.as_deref()),
        }
    }

    pub async fn cross_sections(
        &self,
        project: &ProjectRef,
        freqmode: u32,
        scan_id: u64,
    ) -> anyhow::Result<Vec<AltitudeCrossSection>> {
        let products = self
            .repository
            .level2_products(project, freqmode, scan_id)
            .await?;

        let mut sections = Vec::with_capacity(products.len());
        for product in &products {
            sections.push(AltitudeCrossSection::from_product(product)?);
        }
        Ok(sections)
    }

    pub async fn search(
        &self,
        project: &ProjectRef,
        freqmode: u32,
        kind: ScanKind,
        query: &ScanSearchQuery,
    ) -> anyhow::Result<SearchResult> {
        query.validate()?;

        let page = self
            .repository
            .search_scans(project, freqmode, kind, query)
            .await?;
        tracing::debug!(
            "Search {} freqmode {} returned {} of {} scans",
            project.api_path(),
            freqmode,
            page.scans.len(),
            page.count
        );

        Ok(SearchResult {
            summary: SearchSummary::new(project, freqmode, kind, page.count, query.offset()),
            rows: page
                .scans
                .iter()
                .map(|s| SearchRow::new(s, project, freqmode))
                .collect(),
        })
    }

    pub async fn period_overview(
        &self,
        project: &ProjectRef,
        params: &[(String, String)],
        parameter: &str,
    ) -> anyhow::Result<PeriodOverview> {
        let results = self.repository.level2_area(project, params).await?;
        let mut geojson = to_feature_collection(&results);
        let scale = if results.is_empty() {
            None
        } else {
            let scale = OverviewScale::from_results(&results, parameter)?;
            scale.style_features(&mut geojson);
            Some(scale)
        };

        Ok(PeriodOverview {
            info: window_info(params),
            geojson,
            scale,
        })
    }
}

fn window_info(params: &[(String, String)]) -> Option<String> {
    let get = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let altitude = |key: &str| get(key).and_then(|v| v.parse::<f64>().ok());

    Some(overview_info_text(
        get("product")?,
        get("start_time")?,
        get("end_time")?,
        altitude("min_altitude")?,
        altitude("max_altitude")?,
    ))
}
