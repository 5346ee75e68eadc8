//! Layout configuration
//!
//! All distances share one linear unit, the unit of `available_space`. The
//! defaults are character cells so the bundled [`CellMeasurer`](super::CellMeasurer)
//! and the ASCII preview work without any tuning.

use serde::{Deserialize, Serialize};

use super::{ChartError, Result};

/// Immutable per-run layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Gap between neighbouring boxes in a horizontal level
    pub horizontal_spacing: f64,
    /// Gap between consecutive levels
    pub vertical_spacing: f64,
    /// Gap between stacked boxes inside a vertical run
    pub vertical_subtree_spacing: f64,
    /// Indent added per depth inside a vertical run
    pub vertical_child_offset: f64,
    /// Width of a large box, in units of a normal box
    pub large_org_size_multiplier: f64,
    /// Total usable width
    pub available_space: f64,
    pub min_col_width: f64,
    pub max_col_width: f64,
    /// Side margin reserved when a skip connector hugs a level edge
    pub skip_line_extra_spacing: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 2.0,
            vertical_spacing: 4.0,
            vertical_subtree_spacing: 1.0,
            vertical_child_offset: 4.0,
            large_org_size_multiplier: 1.5,
            available_space: 120.0,
            min_col_width: 14.0,
            max_col_width: 32.0,
            skip_line_extra_spacing: 4.0,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same settings with a different usable width
    pub fn with_available_space(mut self, available_space: f64) -> Self {
        self.available_space = available_space;
        self
    }

    /// Parse a (possibly partial) JSON config; unnamed knobs keep their defaults
    pub fn from_json(input: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no layout can be computed from
    ///
    /// Non-positive column widths are accepted: they force every level
    /// into vertical orientation.
    pub fn validate(&self) -> Result<()> {
        let knobs = [
            ("horizontalSpacing", self.horizontal_spacing),
            ("verticalSpacing", self.vertical_spacing),
            ("verticalSubtreeSpacing", self.vertical_subtree_spacing),
            ("verticalChildOffset", self.vertical_child_offset),
            ("largeOrgSizeMultiplier", self.large_org_size_multiplier),
            ("availableSpace", self.available_space),
            ("minColWidth", self.min_col_width),
            ("maxColWidth", self.max_col_width),
            ("skipLineExtraSpacing", self.skip_line_extra_spacing),
        ];
        if let Some((name, value)) = knobs.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ChartError::invalid_input(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }

        let non_negative = [
            ("horizontalSpacing", self.horizontal_spacing),
            ("verticalSpacing", self.vertical_spacing),
            ("verticalSubtreeSpacing", self.vertical_subtree_spacing),
            ("skipLineExtraSpacing", self.skip_line_extra_spacing),
            ("availableSpace", self.available_space),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return Err(ChartError::invalid_input(format!(
                "{} must not be negative, got {}",
                name, value
            )));
        }

        if self.large_org_size_multiplier <= 0.0 {
            return Err(ChartError::invalid_input(format!(
                "largeOrgSizeMultiplier must be positive, got {}",
                self.large_org_size_multiplier
            )));
        }

        Ok(())
    }

    /// Clamp a computed column width into `[min_col_width, max_col_width]`
    ///
    /// Unlike `f64::clamp` this never panics on an inverted range; the
    /// maximum wins.
    pub fn clamp_col_width(&self, width: f64) -> f64 {
        width.max(self.min_col_width).min(self.max_col_width)
    }
}
