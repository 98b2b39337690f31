//! Statistiques descriptives sur l'historique des tirages Eurojackpot
//! et générateurs de grilles de démonstration.

pub mod cache;
pub mod combinations;
pub mod config;
pub mod frequency;
pub mod gaps;
pub mod generators;
pub mod history;
pub mod report;
