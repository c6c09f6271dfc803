//! Generation session shared by the headless runner and the viewer.

use crate::dungeon::dungeon_rules;
use bevy::prelude::*;
use grammar_core::{
    ConfigError, GenerationContext, Generator, GeneratorConfig, GridError, RuleError, RuleFilter,
    RuleSet, Tile, VoxelTileGrid,
};
use std::path::PathBuf;

/// Errors that can occur while setting up a session.
#[derive(Debug)]
pub enum StudioError {
    Config(ConfigError),
    Grid(GridError),
    Rules(RuleError),
}

impl std::fmt::Display for StudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudioError::Config(e) => write!(f, "config: {}", e),
            StudioError::Grid(e) => write!(f, "grid: {}", e),
            StudioError::Rules(e) => write!(f, "rules: {}", e),
        }
    }
}

impl std::error::Error for StudioError {}

impl From<ConfigError> for StudioError {
    fn from(e: ConfigError) -> Self {
        StudioError::Config(e)
    }
}

impl From<GridError> for StudioError {
    fn from(e: GridError) -> Self {
        StudioError::Grid(e)
    }
}

impl From<RuleError> for StudioError {
    fn from(e: RuleError) -> Self {
        StudioError::Rules(e)
    }
}

/// Command line: `grammar_studio [config.json] [--view]`.
#[derive(Resource, Debug, Clone, Default)]
pub struct LaunchArgs {
    pub config_path: Option<PathBuf>,
    pub view: bool,
}

impl LaunchArgs {
    pub fn from_env() -> Self {
        let mut args = LaunchArgs::default();
        for arg in std::env::args().skip(1) {
            if arg == "--view" {
                args.view = true;
            } else if args.config_path.is_none() {
                args.config_path = Some(PathBuf::from(arg));
            }
        }
        args
    }

    /// Load the config file, falling back to defaults when it can't be read.
    pub fn load_config(&self) -> GeneratorConfig {
        let Some(path) = &self.config_path else {
            return GeneratorConfig::default();
        };
        match GeneratorConfig::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                error!(
                    "Failed to load config {}: {}, using defaults",
                    path.display(),
                    e
                );
                GeneratorConfig::default()
            }
        }
    }
}

/// Grid, rules and generator of one session.
#[derive(Resource)]
pub struct Studio {
    pub config: GeneratorConfig,
    pub rules: RuleSet,
    pub grid: VoxelTileGrid,
    pub generator: Generator,
    /// Seed for the next reset; None keeps drawing from the current stream
    pub seed: Option<u64>,
    /// Whether the closing sweep already ran
    pub swept: bool,
    pub finished: bool,
}

impl Studio {
    pub fn new(config: GeneratorConfig) -> Result<Self, StudioError> {
        config.validate()?;
        let rules = dungeon_rules()?;
        let grid = VoxelTileGrid::new(config.grid_size(), Tile::new(&config.fill))?;
        let generator = Generator::from_config(&config);
        Ok(Self {
            seed: config.seed,
            config,
            rules,
            grid,
            generator,
            swept: false,
            finished: false,
        })
    }

    /// Clear the grid and start a new run.
    pub fn restart(&mut self) {
        self.grid.fill(Tile::new(&self.config.fill));
        let mut ctx = GenerationContext::new(&mut self.grid, &self.rules);
        self.generator.reset(&mut ctx, self.seed);
        self.swept = false;
        self.finished = false;
    }

    /// One single step, or the closing sweep once single steps run dry.
    ///
    /// Returns false when the session has finished.
    pub fn advance(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let mut ctx = GenerationContext::new(&mut self.grid, &self.rules);
        let budget_left =
            self.config.max_steps == 0 || self.generator.step() < self.config.max_steps;

        if budget_left && self.generator.step_single(&mut ctx, &RuleFilter::none()) {
            return true;
        }

        if !self.swept {
            self.swept = true;
            if let Some(prefix) = &self.config.finish_with_sweep {
                if self.generator.step_sweep(&mut ctx, &RuleFilter::prefix(prefix.as_str())) {
                    return true;
                }
            }
        }

        self.finished = true;
        info!(
            "Generation finished at step {} ({} rule applications)",
            self.generator.step(),
            self.generator.use_counts().total()
        );
        false
    }

    /// Restart and advance until finished. Returns the final step counter.
    pub fn generate(&mut self) -> usize {
        self.restart();
        while self.advance() {}
        self.generator.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::CLEANUP_PREFIX;
    use grammar_core::SelectionStrategy;

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            grid_size: [20, 1, 20],
            seed: Some(9),
            strategy: SelectionStrategy::Random,
            max_steps: 150,
            finish_with_sweep: Some(CLEANUP_PREFIX.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_is_reproducible() {
        let mut a = Studio::new(config()).unwrap();
        let mut b = Studio::new(config()).unwrap();
        a.generate();
        b.generate();
        assert_eq!(a.grid.layers_to_string(), b.grid.layers_to_string());
        assert!(a.finished);
    }

    #[test]
    fn test_budget_and_sweep() {
        let mut studio = Studio::new(GeneratorConfig {
            max_steps: 3,
            ..config()
        })
        .unwrap();
        // Three single steps plus at most one sweep
        let steps = studio.generate();
        assert!(steps == 3 || steps == 4);
        assert!(studio.swept);
    }

    #[test]
    fn test_restart_clears_previous_run() {
        let mut studio = Studio::new(config()).unwrap();
        studio.generate();
        studio.restart();
        assert_eq!(studio.generator.step(), 0);
        assert_eq!(studio.grid.count("R"), 9);
        assert_eq!(studio.grid.count("C"), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = Studio::new(GeneratorConfig {
            grid_size: [0, 1, 1],
            ..Default::default()
        });
        assert!(matches!(err, Err(StudioError::Config(ConfigError::InvalidGridSize(_)))));
    }
}
