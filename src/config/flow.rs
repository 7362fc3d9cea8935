use crate::error::{FlowError, Result};
use crate::flow::{FlowParams, SolverParams, SweepPolicy};
use crate::needle::NeedleMapOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct FlowToolConfig {
    pub frames: FramesConfig,
    pub solver: SolverConfig,
    #[serde(default)]
    pub needles: NeedleMapOptions,
    pub output: FlowOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct FramesConfig {
    /// Frame at time t.
    pub first: PathBuf,
    /// Frame at time t + dt.
    pub second: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Number of relaxation steps. Required: there is no sensible default
    /// independent of image size and worker layout.
    pub iterations: usize,
    #[serde(default)]
    pub policy: SweepPolicy,
    #[serde(flatten)]
    pub flow: FlowParams,
}

fn default_workers() -> usize {
    2
}

impl SolverConfig {
    pub fn to_solver_params(&self) -> SolverParams {
        SolverParams::new(self.iterations)
            .with_workers(self.workers)
            .with_policy(self.policy)
            .with_flow(self.flow)
    }
}

#[derive(Debug, Deserialize)]
pub struct FlowOutputConfig {
    #[serde(rename = "needle_map")]
    pub needle_map: PathBuf,
    #[serde(default, rename = "report_json")]
    pub report_json: Option<PathBuf>,
}

impl FlowToolConfig {
    /// Check solver and needle-map settings before any file is touched.
    pub fn validate(&self) -> Result<()> {
        self.solver.to_solver_params().validate()?;
        self.needles.validate()
    }
}

pub fn parse_config(json: &str) -> Result<FlowToolConfig> {
    let config: FlowToolConfig = serde_json::from_str(json)
        .map_err(|e| FlowError::Config(format!("Failed to parse config: {e}")))?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<FlowToolConfig> {
    let data = fs::read_to_string(path).map_err(|e| {
        FlowError::Config(format!("Failed to read config {}: {e}", path.display()))
    })?;
    parse_config(&data).map_err(|e| match e {
        FlowError::Config(msg) => FlowError::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}
