//! Session configuration
//!
//! # Environment Variables
//!
//! - `MATCH3_WIDTH`: grid columns (default: 7)
//! - `MATCH3_HEIGHT`: grid rows (default: 7)
//! - `MATCH3_TILE_TYPES`: number of tile kinds (default: 6)
//! - `MATCH3_MOVES`: move budget (default: 10)
//! - `MATCH3_THRESHOLD`: progress needed to win (default: 100)
//!
//! Unparsable values fall back to the default; range checks happen in
//! [`SessionConfig::validate`].

use crate::error::{Error, Result};
use crate::types::{
    CASCADE_CAP_FACTOR, DEFAULT_COMPLETION_THRESHOLD, DEFAULT_HEIGHT, DEFAULT_MOVES,
    DEFAULT_TILE_TYPES, DEFAULT_WIDTH, MAX_GRID_DIM, MAX_TILE_TYPES, MIN_GRID_DIM,
    MIN_TILE_TYPES, PROGRESS_MAX,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub width: u8,
    pub height: u8,
    pub tile_type_count: u8,
    pub initial_moves: u32,
    pub completion_threshold: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tile_type_count: DEFAULT_TILE_TYPES,
            initial_moves: DEFAULT_MOVES,
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
        }
    }
}

impl SessionConfig {
    pub fn new(width: u8, height: u8, tile_type_count: u8, initial_moves: u32) -> Self {
        Self {
            width,
            height,
            tile_type_count,
            initial_moves,
            ..Self::default()
        }
    }

    pub fn with_completion_threshold(mut self, threshold: f32) -> Self {
        self.completion_threshold = threshold;
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        fn parse<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let d = Self::default();
        Self {
            width: parse("MATCH3_WIDTH").unwrap_or(d.width),
            height: parse("MATCH3_HEIGHT").unwrap_or(d.height),
            tile_type_count: parse("MATCH3_TILE_TYPES").unwrap_or(d.tile_type_count),
            initial_moves: parse("MATCH3_MOVES").unwrap_or(d.initial_moves),
            completion_threshold: parse("MATCH3_THRESHOLD").unwrap_or(d.completion_threshold),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let dims = MIN_GRID_DIM..=MAX_GRID_DIM;
        if !dims.contains(&self.width) || !dims.contains(&self.height) {
            return Err(Error::InvalidConfig(format!(
                "grid must be between {MIN_GRID_DIM}x{MIN_GRID_DIM} and {MAX_GRID_DIM}x{MAX_GRID_DIM}, got {}x{}",
                self.width, self.height
            )));
        }
        if !(MIN_TILE_TYPES..=MAX_TILE_TYPES).contains(&self.tile_type_count) {
            return Err(Error::InvalidConfig(format!(
                "tile type count must be between {MIN_TILE_TYPES} and {MAX_TILE_TYPES}, got {}",
                self.tile_type_count
            )));
        }
        if self.initial_moves == 0 {
            return Err(Error::InvalidConfig("initial moves must be positive".into()));
        }
        let t = self.completion_threshold;
        if !t.is_finite() || t <= 0.0 || t > PROGRESS_MAX {
            return Err(Error::InvalidConfig(format!(
                "completion threshold must be in (0, {PROGRESS_MAX}], got {t}"
            )));
        }
        Ok(())
    }

    pub fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Maximum cascade passes before a cascade is forced stable
    pub fn cascade_cap(&self) -> u32 {
        CASCADE_CAP_FACTOR * self.area() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = SessionConfig::default();
        assert_eq!((c.width, c.height, c.tile_type_count, c.initial_moves), (7, 7, 6, 10));
        assert_eq!(c.completion_threshold, 100.0);
        assert!(c.validate().is_ok());
        assert_eq!(c.cascade_cap(), 147);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        assert!(SessionConfig::new(2, 7, 6, 10).validate().is_err());
        assert!(SessionConfig::new(7, 65, 6, 10).validate().is_err());
        assert!(SessionConfig::new(7, 7, 2, 10).validate().is_err());
        assert!(SessionConfig::new(7, 7, 33, 10).validate().is_err());
        assert!(SessionConfig::new(7, 7, 6, 0).validate().is_err());
        assert!(SessionConfig::default()
            .with_completion_threshold(0.0)
            .validate()
            .is_err());
        assert!(SessionConfig::default()
            .with_completion_threshold(150.0)
            .validate()
            .is_err());
        assert!(SessionConfig::default()
            .with_completion_threshold(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn minimum_config_is_valid() {
        assert!(SessionConfig::new(3, 3, 3, 1).validate().is_ok());
    }
}
