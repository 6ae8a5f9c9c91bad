// Application state for HTTP handlers
use crate::application::level1_service::Level1Service;
use crate::application::level2_service::Level2Service;
use crate::application::statistics_service::StatisticsService;

#[derive(Clone)]
pub struct AppState {
    pub level1_service: Level1Service,
    pub level2_service: Level2Service,
    pub statistics_service: StatisticsService,
    /// Default number of periods for the calendar stream
    pub calendar_periods: usize,
}
