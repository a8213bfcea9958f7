//! Chart persistence service
//!
//! Owns the live chart and moves it to and from the flat text format on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{self, OrgChart};
use crate::infrastructure::traits::FileSystem;

/// Summary of a completed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    /// Records written, root included
    pub nodes: usize,
    pub bytes: usize,
}

/// Service holding one chart plus the filesystem it persists to.
pub struct ChartService {
    fs: Arc<dyn FileSystem>,
    chart: OrgChart,
}

impl ChartService {
    /// Create a chart service around an existing chart.
    pub fn new(fs: Arc<dyn FileSystem>, chart: OrgChart) -> Self {
        Self { fs, chart }
    }

    /// Create a chart service from a saved chart file.
    pub fn open(fs: Arc<dyn FileSystem>, path: &Path) -> ApplicationResult<Self> {
        let chart = Self::read_chart(&fs, path)?;
        Ok(Self { fs, chart })
    }

    pub fn chart(&self) -> &OrgChart {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut OrgChart {
        &mut self.chart
    }

    /// Write the chart to `path`.
    ///
    /// The whole file is encoded before anything is written, so an
    /// unencodable field leaves the destination untouched. The write itself
    /// is not atomic.
    pub fn save(&self, path: &Path) -> ApplicationResult<SaveReport> {
        debug!("save: path={}", path.display());
        let content = domain::encode(&self.chart)?;
        self.fs
            .write(path, &content)
            .with_path_context("save chart", path)?;
        info!("saved {} nodes to {}", self.chart.size(), path.display());
        Ok(SaveReport {
            path: path.to_path_buf(),
            nodes: self.chart.size(),
            bytes: content.len(),
        })
    }

    /// Replace the current chart with the one stored at `path`.
    ///
    /// On any error the current chart is kept.
    pub fn load(&mut self, path: &Path) -> ApplicationResult<()> {
        debug!("load: path={}", path.display());
        self.chart = Self::read_chart(&self.fs, path)?;
        info!("loaded {} nodes from {}", self.chart.size(), path.display());
        Ok(())
    }

    fn read_chart(fs: &Arc<dyn FileSystem>, path: &Path) -> ApplicationResult<OrgChart> {
        let content = fs
            .read_to_string(path)
            .with_path_context("read chart", path)?;
        Ok(domain::decode(&content)?)
    }
}
