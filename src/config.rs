//! # Configuration
//! Model selection and model constants, read from a TOML file.
//!
//! Every key is optional, missing keys take their default value.
//!
//! # Example
//!```
//! use rustles::config::{LesConfig, ModelKind};
//!
//! let config: LesConfig = r#"
//!     model = "wale"
//!     cw = 0.55
//!     nspecies = 2
//!
//!     [grid]
//!     n = [16, 16, 16]
//!     dx = [0.1, 0.1, 0.1]
//! "#
//! .parse()
//! .unwrap();
//! assert_eq!(config.model, ModelKind::Wale);
//! assert_eq!(config.cs, 0.1);
//! assert!(config.grid.is_some());
//!```
use crate::eos::Eos;
use crate::error::{LesError, Result};
use crate::field::Grid;
use crate::layout::Layout;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Available subgrid-scale closures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Static Smagorinsky
    Smagorinsky,
    /// Dynamic Smagorinsky (Germano identity)
    DynamicSmagorinsky,
    /// Wall-adapting local eddy viscosity
    Wale,
    /// Vreman
    Vreman,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Smagorinsky => "smagorinsky",
            ModelKind::DynamicSmagorinsky => "dynamic_smagorinsky",
            ModelKind::Wale => "wale",
            ModelKind::Vreman => "vreman",
        };
        write!(f, "{}", name)
    }
}

/// LES configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LesConfig {
    /// Closure model
    pub model: ModelKind,
    /// Smagorinsky constant
    pub cs: f64,
    /// WALE / Vreman constant
    pub cw: f64,
    /// Isotropic (Yoshizawa) constant
    pub ci: f64,
    /// Turbulent Prandtl number
    pub prt: f64,
    /// Resolved filter width over mean grid spacing
    pub grid_filter_ratio: f64,
    /// Test filter width over resolved filter width
    pub test_filter_ratio: f64,
    /// Regularization of dynamic denominators and coefficient floor
    pub small_num: f64,
    /// Number of species
    pub nspecies: usize,
    /// Grid, optional for library use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    /// Specific heat model
    pub eos: Eos,
}

impl Default for LesConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::Smagorinsky,
            cs: 0.1,
            cw: 0.5,
            ci: 0.0,
            prt: 0.7,
            grid_filter_ratio: 1.,
            test_filter_ratio: 2.,
            small_num: 1e-8,
            nspecies: 1,
            grid: None,
            eos: Eos::default(),
        }
    }
}

impl FromStr for LesConfig {
    type Err = LesError;

    /// Parse and validate a TOML string
    fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl LesConfig {
    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// File not readable, not valid TOML or values out of range
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LesError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = content.parse()?;
        info!("Loaded configuration from {}", path.display());
        info!("{:?}", config);
        Ok(config)
    }

    /// Write configuration as TOML string
    ///
    /// # Errors
    /// Serialization failed
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Check ranges of all values
    ///
    /// # Errors
    /// First value which is out of range
    pub fn validate(&self) -> Result<()> {
        non_negative("cs", self.cs)?;
        non_negative("cw", self.cw)?;
        non_negative("ci", self.ci)?;
        positive("prt", self.prt)?;
        positive("small_num", self.small_num)?;
        at_least_one("grid_filter_ratio", self.grid_filter_ratio)?;
        at_least_one("test_filter_ratio", self.test_filter_ratio)?;
        if let Some(grid) = &self.grid {
            for (&n, &dx) in grid.n.iter().zip(grid.dx.iter()) {
                if n == 0 {
                    return Err(LesError::InvalidParameter {
                        name: "grid.n",
                        value: 0.,
                        reason: "must be positive",
                    });
                }
                positive("grid.dx", dx)?;
            }
        }
        if let Eos::NasaMixture(mixture) = &self.eos {
            if mixture.len() != self.nspecies {
                return Err(LesError::InvalidParameter {
                    name: "eos.species",
                    value: mixture.len() as f64,
                    reason: "must match nspecies",
                });
            }
        }
        Ok(())
    }

    /// Slot layouts for the configured number of species
    pub fn layout(&self) -> Layout {
        Layout::new(self.nspecies)
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0. {
        Ok(())
    } else {
        Err(LesError::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if value >= 0. {
        Ok(())
    } else {
        Err(LesError::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        })
    }
}

fn at_least_one(name: &'static str, value: f64) -> Result<()> {
    if value >= 1. {
        Ok(())
    } else {
        Err(LesError::InvalidParameter {
            name,
            value,
            reason: "must be at least 1",
        })
    }
}
