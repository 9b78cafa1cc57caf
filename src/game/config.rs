use serde::{Deserialize, Serialize};

/// Configuration for the game board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Random draws for a free food cell before enumerating free cells
    pub food_retry_budget: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 16,
            grid_height: 16,
            initial_snake_length: 1,
            food_retry_budget: 64,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Validate the board dimensions
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width < 2 || self.grid_height < 2 {
            return Err(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            return Err("grid dimensions exceed coordinate range".to_string());
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        // The snake starts at the centre and extends back towards the left wall
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(format!(
                "initial_snake_length ({}) does not fit a {}-wide grid",
                self.initial_snake_length, self.grid_width
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 16);
        assert_eq!(config.grid_height, 16);
        assert_eq!(config.initial_snake_length, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.cell_count(), 180);
    }

    #[test]
    fn test_validation_rejects_tiny_grid() {
        assert!(GameConfig::new(1, 10).validate().is_err());
        assert!(GameConfig::new(10, 1).validate().is_err());
    }

    #[test]
    fn test_validation_rejects_oversized_snake() {
        let mut config = GameConfig::new(4, 4);
        config.initial_snake_length = 3;
        assert!(config.validate().is_ok());

        config.initial_snake_length = 4;
        assert!(config.validate().is_err());

        config.initial_snake_length = 0;
        assert!(config.validate().is_err());
    }
}
