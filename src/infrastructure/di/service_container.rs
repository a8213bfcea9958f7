//! Service container for dependency injection
//!
//! Wires up settings, the filesystem and the chart service.

use std::sync::Arc;

use crate::application::services::ChartService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::OrgChart;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and shared I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Chart service around a fresh chart named after the configured company.
    pub fn new_chart_service(&self) -> ChartService {
        ChartService::new(
            Arc::clone(&self.fs),
            OrgChart::new(self.settings.company_name.clone()),
        )
    }

    /// Chart service loaded from the configured data file.
    pub fn open_chart_service(&self) -> ApplicationResult<ChartService> {
        ChartService::open(Arc::clone(&self.fs), &self.settings.data_file)
    }
}
