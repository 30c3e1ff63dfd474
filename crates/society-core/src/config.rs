//! Configuration loading for the society simulation.
//!
//! All settings come from a TOML file. Every section is optional and falls
//! back to its defaults, except that at least one persona is required.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::agent::Persona;
use crate::components::world::WorldState;
use crate::economy::{is_malformed_target, is_world_target, EconomyRules};
use crate::systems::goals::GoalThresholds;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "society.toml";

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub world: WorldConfig,
    /// Cost table and social/decay constants
    #[serde(default)]
    pub economy: EconomyRules,
    /// Interpersonal goal thresholds
    #[serde(default)]
    pub goals: GoalThresholds,
    #[serde(default)]
    pub personas: Vec<PersonaConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            world: WorldConfig::default(),
            economy: EconomyRules::default(),
            goals: GoalThresholds::default(),
            personas: default_personas(),
        }
    }
}

impl SimulationConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or the default config if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.personas.is_empty() {
            return Err(ConfigError::Invalid("at least one persona is required".to_string()));
        }
        if self.simulation.max_turns == 0 {
            return Err(ConfigError::Invalid("max_turns must be positive".to_string()));
        }

        let mut seen = BTreeSet::new();
        for persona in &self.personas {
            let name = persona.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid("persona names must not be empty".to_string()));
            }
            if is_world_target(name) || is_malformed_target(name) {
                return Err(ConfigError::Invalid(format!(
                    "persona name '{}' is reserved and cannot be targeted",
                    name
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(ConfigError::Invalid(format!("duplicate persona name '{}'", name)));
            }
        }
        Ok(())
    }

    pub fn persona_names(&self) -> Vec<String> {
        self.personas.iter().map(|p| p.name.clone()).collect()
    }
}

/// Run-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub max_turns: u64,
    /// Turn summaries each agent remembers
    pub history_depth: usize,
    /// Attempts per decision before defaulting to pass
    pub proposer_retries: u32,
    /// Seed for the built-in weighted proposer
    pub seed: u64,
    /// JSONL event log path; no file is written when unset
    pub event_log: Option<PathBuf>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_turns: 10,
            history_depth: 2,
            proposer_retries: 3,
            seed: 42,
            event_log: None,
        }
    }
}

/// Starting resource levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub treasury: u32,
    pub food: u32,
    pub energy: u32,
    pub infrastructure: u32,
    pub morale: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            treasury: 50,
            food: 50,
            energy: 50,
            infrastructure: 50,
            morale: 50,
        }
    }
}

impl WorldConfig {
    pub fn initial_state(&self) -> WorldState {
        WorldState::with_resources(
            self.treasury,
            self.food,
            self.energy,
            self.infrastructure,
            self.morale,
        )
    }
}

/// One agent's persona as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub name: String,
    #[serde(default)]
    pub archetype: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub ambition: f64,
}

impl PersonaConfig {
    pub fn to_persona(&self) -> Persona {
        Persona {
            archetype: self.archetype.clone(),
            description: self.description.clone(),
            goals: self.goals.clone(),
            ambition: self.ambition,
        }
    }
}

fn default_personas() -> Vec<PersonaConfig> {
    vec![
        PersonaConfig {
            name: "Eldric the Conservative".to_string(),
            archetype: "Conservative".to_string(),
            description: "A cautious steward who distrusts rapid change.".to_string(),
            goals: vec!["Keep the treasury solvent".to_string()],
            ambition: 5.0,
        },
        PersonaConfig {
            name: "Mara the Reformer".to_string(),
            archetype: "Reformer".to_string(),
            description: "An energetic planner pushing for new infrastructure.".to_string(),
            goals: vec!["Modernize energy and infrastructure".to_string()],
            ambition: 12.0,
        },
        PersonaConfig {
            name: "Tobin the Populist".to_string(),
            archetype: "Populist".to_string(),
            description: "A voice of the crowd who lives on public approval.".to_string(),
            goals: vec!["Keep morale high".to_string()],
            ambition: 8.0,
        },
    ]
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Society Simulation Configuration

[simulation]
max_turns = 10
history_depth = 2
proposer_retries = 3
seed = 42
# event_log = "output/events.jsonl"

[world]
treasury = 50
food = 50
energy = 50
infrastructure = 50
morale = 50

[economy]
support_morale_bonus = 5
oppose_morale_penalty = 3
entropy_decay = 2

[economy.improve_food]
spend = "energy"
cost = 3
gain = "food"
output = 8

[economy.improve_energy]
spend = "treasury"
cost = 3
gain = "energy"
output = 8

[economy.improve_infrastructure]
spend = "treasury"
cost = 4
gain = "infrastructure"
output = 8

[economy.boost_morale]
spend = "food"
cost = 2
gain = "morale"
output = 8

[economy.generate_treasury]
spend = "energy"
cost = 4
gain = "treasury"
output = 3

[goals]
ally_set = 15.0
ally_clear = 10.0
undermine_set = 15.0
undermine_clear = 10.0
approval_set = 10.0
approval_clear = 5.0
influence_ambition = 10.0
influence_stability = 50

[[personas]]
name = "Eldric the Conservative"
archetype = "Conservative"
description = "A cautious steward who distrusts rapid change."
goals = ["Keep the treasury solvent"]
ambition = 5.0

[[personas]]
name = "Mara the Reformer"
archetype = "Reformer"
description = "An energetic planner pushing for new infrastructure."
goals = ["Modernize energy and infrastructure"]
ambition = 12.0

[[personas]]
name = "Tobin the Populist"
archetype = "Populist"
description = "A voice of the crowd who lives on public approval."
goals = ["Keep morale high"]
ambition = 8.0
"#
    .to_string()
}
