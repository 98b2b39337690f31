use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Paramètres de la marche aléatoire sur les écarts médians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Premier numéro tiré dans [1, start_max] pour laisser de la marge vers le haut.
    pub start_max: u8,
    pub jitter_min: i32,
    pub jitter_max: i32,
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_max: 15,
            jitter_min: -2,
            jitter_max: 4,
            max_attempts: 100,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.start_max < 1 || self.start_max > 50 {
            bail!("start_max doit être dans 1-50 (reçu {})", self.start_max);
        }
        if self.jitter_min > self.jitter_max {
            bail!("jitter_min ({}) > jitter_max ({})", self.jitter_min, self.jitter_max);
        }
        if self.max_attempts == 0 {
            bail!("max_attempts doit être positif");
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {:?}", path))?;
        let config: GeneratorConfig = serde_json::from_str(&json)
            .with_context(|| format!("JSON invalide dans {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {:?}", path))?;
        Ok(())
    }
}
