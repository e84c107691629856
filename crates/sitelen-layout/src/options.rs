use crate::constants::DEFAULT_SURFACE_FACTOR;
use crate::sizer::SizeTables;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How finished options are filtered by surface
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SurfacePruning {
    /// Keep an option only if `surface / min_surface < factor`, where
    /// `min_surface` is the smallest surface seen so far. `None` keeps all.
    pub factor: Option<f64>,
    /// Re-filter the collected options against the final minimum surface
    pub recheck_final: bool,
}

impl Default for SurfacePruning {
    fn default() -> Self {
        Self {
            factor: Some(DEFAULT_SURFACE_FACTOR),
            recheck_final: false,
        }
    }
}

impl SurfacePruning {
    /// No surface pruning, duplicates are still dropped
    pub fn disabled() -> Self {
        Self {
            factor: None,
            recheck_final: false,
        }
    }
}

/// Limits on a single search. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchBudget {
    /// Maximum number of search nodes (placement attempts) to expand
    pub max_nodes: Option<u64>,
    /// Wall-clock limit in milliseconds
    pub time_limit_ms: Option<u64>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn nodes(max_nodes: u64) -> Self {
        Self {
            max_nodes: Some(max_nodes),
            time_limit_ms: None,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_nodes.is_none() && self.time_limit_ms.is_none()
    }
}

/// Layout engine configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    // Search policy
    pub pruning: SurfacePruning,
    pub budget: SearchBudget,

    // Run the top-level branches on the rayon pool
    pub parallel: bool,

    // Token sizes for the composer
    pub sizes: SizeTables,
}

impl LayoutOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        self.validate_search()?;
        self.validate_sizes()
    }

    /// Validate the search policy only (pruning and budget). Callers that
    /// size tokens with their own [`crate::UnitSizer`] never read the size
    /// tables.
    pub fn validate_search(&self) -> Result<()> {
        if let Some(factor) = self.pruning.factor {
            // the bound is strict, so a factor of 1 would prune the minimum too
            if !factor.is_finite() || factor <= 1.0 {
                return Err(LayoutError::Config(format!(
                    "Surface pruning factor must be a finite number > 1, got {}",
                    factor
                )));
            }
        }

        if self.budget.max_nodes == Some(0) {
            return Err(LayoutError::Config(
                "Node budget must be greater than zero".to_string(),
            ));
        }
        if self.budget.time_limit_ms == Some(0) {
            return Err(LayoutError::Config(
                "Time limit must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate the token size tables
    pub fn validate_sizes(&self) -> Result<()> {
        if let Some(bad) = self.sizes.all_sizes().find(|size| !size.is_valid()) {
            return Err(LayoutError::Config(format!(
                "Size tables contain a non-positive size {}x{}",
                bad.width, bad.height
            )));
        }

        Ok(())
    }
}
