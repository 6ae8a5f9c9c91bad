// Odin REST API repository implementation
use crate::application::odin_repository::{OdinRepository, ScanPage};
use crate::domain::level1::{DayFreqMode, ScanLog};
use crate::domain::level2::{
    L2Product, ProjectMode, ProjectRef, ScanEntry, ScanKind, ScanSearchQuery,
};
use crate::domain::statistics::{FreqModeCount, Timeline};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

const API_PREFIX: &str = "rest_api/v5";

#[derive(Debug, Clone)]
pub struct OdinApiRepository {
    base_url: String,
    client: reqwest::Client,
}

/// `Data` envelope wrapped around every v5 response.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(rename = "Data")]
    data: T,
    #[serde(rename = "Count", default)]
    count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Level2Scan {
    #[serde(rename = "L2")]
    l2: DataEnvelope<Vec<L2Product>>,
}

impl OdinApiRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, path: &str, params: &[(String, String)]) -> String {
        let mut url = format!("{}/{}/{}", self.base_url, API_PREFIX, path);
        if !params.is_empty() {
            let query: Vec<String> = params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    async fn execute_get<T: DeserializeOwned>(&self, path: &str, params: &[(String, String)]) -> Result<T> {
        let url = self.build_url(path, params);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Odin API request {} failed with status {}: {}", path, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse Odin API response for {}", path))
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str, params: &[(String, String)]) -> Result<T> {
        let envelope: DataEnvelope<T> = self.execute_get(path, params).await?;
        Ok(envelope.data)
    }
}

fn year_params(year: Option<i32>) -> Vec<(String, String)> {
    year.map(|y| vec![("year".to_string(), y.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl OdinRepository for OdinApiRepository {
    async fn list_projects(&self, mode: ProjectMode) -> Result<Vec<Value>> {
        let path = match mode {
            ProjectMode::Production => "level2/projects/",
            ProjectMode::Development => "level2/development/projects/",
        };
        self.get_data(path, &[]).await
    }

    async fn list_freqmodes(&self, project: &ProjectRef) -> Result<Vec<Value>> {
        self.get_data(&format!("level2/{}/", project.api_path()), &[])
            .await
    }

    async fn day_overview(&self, date: NaiveDate) -> Result<Vec<DayFreqMode>> {
        self.get_data(&format!("freqmode_info/{}/", date.format("%Y-%m-%d")), &[])
            .await
    }

    async fn period_info(&self, date: NaiveDate) -> Result<Vec<DayFreqMode>> {
        let path = format!(
            "period_info/{}/{:02}/{:02}/",
            date.year(),
            date.month(),
            date.day()
        );
        self.get_data(&path, &[]).await
    }

    async fn scan_logs(&self, date: NaiveDate, freqmode: u32) -> Result<Vec<ScanLog>> {
        let path = format!("freqmode_info/{}/{}/", date.format("%Y-%m-%d"), freqmode);
        self.get_data(&path, &[]).await
    }

    async fn level2_products(
        &self,
        project: &ProjectRef,
        freqmode: u32,
        scan_id: u64,
    ) -> Result<Vec<L2Product>> {
        let path = format!("level2/{}/{}/{}/", project.api_path(), freqmode, scan_id);
        let scan: Level2Scan = self.get_data(&path, &[]).await?;
        Ok(scan.l2.data)
    }

    async fn search_scans(
        &self,
        project: &ProjectRef,
        freqmode: u32,
        kind: ScanKind,
        query: &ScanSearchQuery,
    ) -> Result<ScanPage> {
        let path = format!("level2/{}/{}/{}/", project.api_path(), freqmode, kind.as_str());
        let params: Vec<(String, String)> = query
            .to_params()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let envelope: DataEnvelope<Vec<ScanEntry>> = self.execute_get(&path, &params).await?;
        let count = envelope.count.unwrap_or(envelope.data.len() as u64);
        Ok(ScanPage {
            scans: envelope.data,
            count,
        })
    }

    async fn level2_area(
        &self,
        project: &ProjectRef,
        params: &[(String, String)],
    ) -> Result<Vec<Map<String, Value>>> {
        let path = format!("level2/{}/area", project.api_path());
        self.get_data(&path, params).await
    }

    async fn freqmode_statistics(&self, year: Option<i32>) -> Result<Vec<FreqModeCount>> {
        self.get_data("statistics/freqmode/", &year_params(year))
            .await
    }

    async fn timeline_statistics(&self, year: Option<i32>) -> Result<Timeline> {
        self.execute_get("statistics/freqmode/timeline/", &year_params(year))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> OdinApiRepository {
        OdinApiRepository::new("http://odin.test/".to_string(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_build_url_encodes_params() {
        let url = repository().build_url(
            "level2/meso/area",
            &[
                ("product".to_string(), "O3 / 545 GHz".to_string()),
                ("min_altitude".to_string(), "20000".to_string()),
            ],
        );
        assert_eq!(
            url,
            "http://odin.test/rest_api/v5/level2/meso/area?product=O3%20%2F%20545%20GHz&min_altitude=20000"
        );
    }

    #[test]
    fn test_build_url_without_params() {
        assert_eq!(
            repository().build_url("level2/projects/", &[]),
            "http://odin.test/rest_api/v5/level2/projects/"
        );
    }

    #[test]
    fn test_year_params() {
        assert!(year_params(None).is_empty());
        assert_eq!(year_params(Some(2012)), vec![("year".to_string(), "2012".to_string())]);
    }

    #[test]
    fn test_decode_level2_scan_envelope() {
        let json = r#"{"Data": {"L2": {"Data": [{
            "Product": "O3 / 545 GHz / 20 to 85 km",
            "Altitude": [20000.0], "VMR": [2e-6], "Apriori": [1e-6],
            "ErrorTotal": [1e-7], "AVK": [[0.5]], "MeasResponse": [0.9]
        }], "Type": "L2", "Count": 1}}, "Type": "mixed", "Count": null}"#;
        let envelope: DataEnvelope<Level2Scan> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.l2.data[0].vmr, vec![2e-6]);
        assert_eq!(envelope.count, None);
    }

    #[test]
    fn test_decode_search_envelope() {
        let json = r#"{"Data": [{"ScanID": 7014769646, "Date": "2015-01-12T06:30:00",
            "URLS": {"URL-level2": "http://odin.test/x"}}], "Type": "level2_scan_info", "Count": 2500}"#;
        let envelope: DataEnvelope<Vec<ScanEntry>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.count, Some(2500));
        assert_eq!(envelope.data[0].scan_id, 7014769646);
    }
}
