//! Configuration file support for Fitlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitlog/config.toml`.

use crate::nutrition::StaticFoodLookup;
use crate::{Error, FoodInfo, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub nutrition: NutritionConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Custom schedule location; the built-in plan is used when unset
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Food table and barcode map used for lookups
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NutritionConfig {
    #[serde(default = "default_foods")]
    pub foods: Vec<FoodInfo>,

    #[serde(default = "default_barcodes")]
    pub barcodes: HashMap<String, String>,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            foods: default_foods(),
            barcodes: default_barcodes(),
        }
    }
}

impl NutritionConfig {
    pub fn lookup(&self) -> StaticFoodLookup {
        StaticFoodLookup::new(self.foods.clone(), self.barcodes.clone())
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("fitlog")
}

fn food(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodInfo {
    FoodInfo {
        name: name.into(),
        calories,
        protein,
        carbs,
        fat,
    }
}

fn default_foods() -> Vec<FoodInfo> {
    vec![
        food("1 apple", 95.0, 0.5, 25.0, 0.3),
        food("2 eggs", 156.0, 12.6, 1.2, 10.6),
        food("1 cup of whole milk", 149.0, 7.7, 11.7, 7.9),
        food(
            "1 Quest Nutrition Chocolate Chip Cookie Dough Protein Bar",
            190.0,
            21.0,
            22.0,
            8.0,
        ),
        food("1 can of Coca-Cola Classic, 12 fl oz", 140.0, 0.0, 39.0, 0.0),
        food(
            "1 serving of skippy creamy peanut butter",
            190.0,
            7.0,
            7.0,
            16.0,
        ),
    ]
}

fn default_barcodes() -> HashMap<String, String> {
    [
        (
            "0123456789012",
            "1 Quest Nutrition Chocolate Chip Cookie Dough Protein Bar",
        ),
        ("9876543210987", "1 can of Coca-Cola Classic, 12 fl oz"),
        ("1112223334445", "1 serving of skippy creamy peanut butter"),
    ]
    .into_iter()
    .map(|(code, product)| (code.to_string(), product.to_string()))
    .collect()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject food entries with negative nutrition values
    pub fn validate(&self) -> Result<()> {
        for food in &self.nutrition.foods {
            let values = [food.calories, food.protein, food.carbs, food.fat];
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(Error::Config(format!(
                    "food {:?} has a negative or invalid value",
                    food.name
                )));
            }
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("fitlog").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
