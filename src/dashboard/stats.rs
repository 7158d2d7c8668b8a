//! Statistics sources feeding the refresh pass.
//!
//! The dashboard only reports on fictional persona/skill/evolution
//! subsystems, so the shipped source is a generator of plausible numbers.
//! Hosts with real data implement [`StatsSource`] themselves.

#![allow(missing_docs)]

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::core::errors::Result;

/// Persona names cycled through by the mock source.
const PERSONAS: &[&str] = &["analyst", "storyteller", "mentor", "companion", "critic"];

/// Point-in-time statistics shown by the overview and statistics views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub captured_at: DateTime<Local>,
    pub active_persona: String,
    pub persona_count: u32,
    pub skills_loaded: u32,
    pub evolution_level: u32,
    /// Progress toward the next evolution level, `0.0..=1.0`.
    pub evolution_progress: f64,
    pub memory_mb: f64,
    pub response_ms: u32,
    pub interactions: u64,
}

impl StatsSnapshot {
    /// One-line summary used for activity log narration.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "persona={} skills={} level={} ({:.0}%) mem={:.1}MB resp={}ms",
            self.active_persona,
            self.skills_loaded,
            self.evolution_level,
            self.evolution_progress * 100.0,
            self.memory_mb,
            self.response_ms,
        )
    }
}

/// Produces a fresh snapshot on each refresh pass.
pub trait StatsSource {
    fn sample(&mut self) -> Result<StatsSnapshot>;
}

/// Generator of plausible statistics: random jitter around slowly growing
/// counters.
#[derive(Debug)]
pub struct MockStatsSource {
    rng: StdRng,
    samples: u64,
    interactions: u64,
    evolution_xp: f64,
}

impl Default for MockStatsSource {
    fn default() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl MockStatsSource {
    /// Deterministic source for tests and reproducible demos.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            samples: 0,
            interactions: 0,
            evolution_xp: 0.0,
        }
    }

    /// Number of snapshots produced so far.
    #[must_use]
    pub const fn samples(&self) -> u64 {
        self.samples
    }
}

impl StatsSource for MockStatsSource {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn sample(&mut self) -> Result<StatsSnapshot> {
        self.samples += 1;
        self.interactions += self.rng.random_range(0..=12);
        self.evolution_xp += self.rng.random_range(0.5..4.0);

        // Each level costs 100 xp.
        let level = (self.evolution_xp / 100.0).floor();
        let progress = (self.evolution_xp - level * 100.0) / 100.0;
        let persona_idx = self.rng.random_range(0..PERSONAS.len());

        Ok(StatsSnapshot {
            captured_at: Local::now(),
            active_persona: PERSONAS[persona_idx].to_string(),
            persona_count: PERSONAS.len() as u32,
            skills_loaded: self.rng.random_range(8..=24),
            evolution_level: level as u32 + 1,
            evolution_progress: progress,
            memory_mb: self.rng.random_range(32.0..96.0),
            response_ms: self.rng.random_range(40..=400),
            interactions: self.interactions,
        })
    }
}
