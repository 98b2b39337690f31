use anyhow::{bail, Result};
use serde::Serialize;

pub const MAIN_POOL: u8 = 50;
pub const BONUS_POOL: u8 = 12;

/// Un tirage normalisé : numéros triés par ordre croissant, bornes et doublons vérifiés.
///
/// Les champs sont privés : tout `Draw` passe par [`Draw::new`], donc l'ordre
/// croissant est garanti pour les calculs d'écarts en aval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Draw {
    date: Option<String>,
    main: [u8; 5],
    bonus: [u8; 2],
}

impl Draw {
    pub fn new(mut main: [u8; 5], mut bonus: [u8; 2]) -> Result<Self> {
        main.sort_unstable();
        bonus.sort_unstable();
        validate_draw(&main, &bonus)?;
        Ok(Self { date: None, main, bonus })
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        let date = date.into();
        self.date = if date.is_empty() { None } else { Some(date) };
        self
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn main(&self) -> &[u8; 5] {
        &self.main
    }

    pub fn bonus(&self) -> &[u8; 2] {
        &self.bonus
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    Main,
    Bonus,
}

impl Pool {
    pub fn size(&self) -> usize {
        match self {
            Pool::Main => MAIN_POOL as usize,
            Pool::Bonus => BONUS_POOL as usize,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Pool::Main => 5,
            Pool::Bonus => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pool::Main => "Numéros (5 sur 50)",
            Pool::Bonus => "Numéros euro (2 sur 12)",
        }
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Main => draw.main(),
            Pool::Bonus => draw.bonus(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    /// Part des tirages contenant ce numéro.
    pub share: f64,
    /// Tirages écoulés depuis la dernière sortie (0 = dernier tirage).
    pub last_seen: u32,
}

/// Grille candidate produite par une stratégie de génération.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    pub main: [u8; 5],
    pub bonus: [u8; 2],
    /// Écarts de référence utilisés (stratégie des écarts médians uniquement).
    pub reference_gaps: Option<[i32; 4]>,
}

impl Tip {
    pub fn gaps(&self) -> [i32; 4] {
        let mut gaps = [0i32; 4];
        for i in 0..4 {
            gaps[i] = self.main[i + 1] as i32 - self.main[i] as i32;
        }
        gaps
    }
}

pub fn validate_draw(main: &[u8; 5], bonus: &[u8; 2]) -> Result<()> {
    for &n in main {
        if n < 1 || n > MAIN_POOL {
            bail!("Numéro {} hors limites (1-{})", n, MAIN_POOL);
        }
    }
    for &e in bonus {
        if e < 1 || e > BONUS_POOL {
            bail!("Numéro euro {} hors limites (1-{})", e, BONUS_POOL);
        }
    }
    for i in 0..main.len() {
        for j in (i + 1)..main.len() {
            if main[i] == main[j] {
                bail!("Numéro en double : {}", main[i]);
            }
        }
    }
    if bonus[0] == bonus[1] {
        bail!("Numéro euro en double : {}", bonus[0]);
    }
    Ok(())
}
