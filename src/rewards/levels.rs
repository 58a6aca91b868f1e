//! XP and Level system
//!
//! Levels are a flat 100 XP apart: `level = floor(xp / 100) + 1`. Titles are
//! cosmetic bands over level ranges.

use serde::Serialize;

/// Experience needed per level
pub const XP_PER_LEVEL: u64 = 100;

/// Title band definition
#[derive(Debug, Clone)]
pub struct TitleBand {
    pub from_level: u32,
    pub title: &'static str,
}

/// All title bands (must be sorted by level)
pub static TITLES: &[TitleBand] = &[
    TitleBand {
        from_level: 1,
        title: "Greenhorn",
    },
    TitleBand {
        from_level: 3,
        title: "Ranch Hand",
    },
    TitleBand {
        from_level: 5,
        title: "Wrangler",
    },
    TitleBand {
        from_level: 8,
        title: "Trail Boss",
    },
    TitleBand {
        from_level: 12,
        title: "Rancher",
    },
    TitleBand {
        from_level: 20,
        title: "Cattle Baron",
    },
    TitleBand {
        from_level: 30,
        title: "Legend of the Range",
    },
];

/// Level derived from total experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level;

impl Level {
    /// Level for the given total XP, always derived from scratch
    pub fn for_xp(xp: u64) -> u32 {
        u32::try_from(xp / XP_PER_LEVEL)
            .unwrap_or(u32::MAX - 1)
            .saturating_add(1)
    }

    /// Total XP at which `level` starts
    pub fn xp_required(level: u32) -> u64 {
        u64::from(level.saturating_sub(1)) * XP_PER_LEVEL
    }

    /// Title for a level
    pub fn title(level: u32) -> &'static str {
        TITLES
            .iter()
            .rev()
            .find(|t| level >= t.from_level)
            .map(|t| t.title)
            .unwrap_or(TITLES[0].title)
    }
}

/// Level summary for the presentation layer
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub total_xp: u64,
    pub level: u32,
    pub title: String,
    /// XP at which the current level started
    pub current_level_xp: u64,
    /// XP at which the next level starts
    pub next_level_xp: u64,
}

impl PlayerStats {
    pub fn new(total_xp: u64) -> Self {
        let level = Level::for_xp(total_xp);
        Self {
            total_xp,
            level,
            title: Level::title(level).to_string(),
            current_level_xp: Level::xp_required(level),
            next_level_xp: Level::xp_required(level.saturating_add(1)),
        }
    }

    /// Progress towards the next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        let xp_for_level = self.next_level_xp.saturating_sub(self.current_level_xp);
        if xp_for_level == 0 {
            return 1.0;
        }
        let xp_in_level = self.total_xp.saturating_sub(self.current_level_xp);
        xp_in_level as f32 / xp_for_level as f32
    }
}
