use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Ticks;
use crate::error::SimError;
use crate::scheduler::{DEFAULT_AGING_INTERVAL, DEFAULT_BASE_QUANTUM, PolicyKind};
use crate::sim::job::{BernoulliParams, ProcessSpec, Workload};

const DEFAULT_CONFIG_FILE: &str = "schedsim.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrivalGating {
    /// Every process is admitted before the first decision
    #[default]
    Ungated,
    /// Processes are admitted once `arrival_time <= now`
    Gated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgingConfig {
    pub interval: Ticks,
    pub gating: ArrivalGating,
    pub priority_tiebreak: bool,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_AGING_INTERVAL,
            gating: ArrivalGating::Ungated,
            priority_tiebreak: false,
        }
    }
}

/// Policy knobs shared by every simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub base_quantum: Ticks,
    pub aging: AgingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            base_quantum: DEFAULT_BASE_QUANTUM,
            aging: AgingConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.base_quantum == 0 {
            return Err(SimError::ZeroQuantum);
        }
        if self.aging.interval == 0 {
            return Err(SimError::ZeroAgingInterval);
        }
        Ok(())
    }
}

/// Contents of the binary's TOML config file.
///
/// ```toml
/// policies = ["round-robin", "sjn"]
///
/// [sim]
/// base_quantum = 5
///
/// [[process]]
/// id = 1
/// arrival_time = 0
/// burst_time = 20
/// priority = 2
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub policies: Vec<PolicyKind>,
    pub sim: SimConfig,
    #[serde(rename = "process")]
    pub processes: Vec<ProcessSpec>,
    pub workload: Option<BernoulliParams>,
}

impl FileConfig {
    /// Reads `path`, else `schedsim.toml` in the working directory if
    /// present, else defaults; then applies `SCHEDSIM_*` env overrides.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        Self::load_or(path, Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_or(path: Option<PathBuf>, default_path: &Path) -> Result<Self> {
        let path = path.or_else(|| default_path.exists().then(|| default_path.to_path_buf()));

        let mut cfg = match path {
            Some(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::parse(&raw).with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(v) = env::var("SCHEDSIM_POLICY") {
            cfg.policies = parse_policies(&v)?;
        }
        maybe_env_u64(&mut cfg.sim.base_quantum, "SCHEDSIM_BASE_QUANTUM")?;
        maybe_env_u64(&mut cfg.sim.aging.interval, "SCHEDSIM_AGING_INTERVAL")?;

        cfg.sim.validate()?;
        Ok(cfg)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Policies to run; every policy when none are configured.
    pub fn effective_policies(&self) -> Vec<PolicyKind> {
        if self.policies.is_empty() {
            PolicyKind::ALL.to_vec()
        } else {
            self.policies.clone()
        }
    }

    /// Explicit processes win over the generator; with neither, the
    /// built-in demo workload is used.
    pub fn workload(&self) -> Result<Workload, SimError> {
        if !self.processes.is_empty() {
            Workload::new(self.processes.clone())
        } else if let Some(params) = &self.workload {
            Workload::bernoulli(params)
        } else {
            Ok(Workload::demo())
        }
    }
}

pub fn parse_policies(raw: &str) -> Result<Vec<PolicyKind>, SimError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

fn maybe_env_u64(val: &mut u64, key: &str) -> Result<()> {
    if let Ok(v) = env::var(key) {
        *val = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer, got `{v}`"))?;
    }
    Ok(())
}
