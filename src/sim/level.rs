//! Level themes
//!
//! The active theme is a pure function of the run score. Besides colors it
//! decides which obstacles the spawner draws from, so it is gameplay, not
//! just decoration.

use super::state::ObstacleKind;

/// Colors used by the renderer (CSS color strings)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub sky_top: &'static str,
    pub sky_mid: &'static str,
    pub sky_bottom: &'static str,
    pub ground: &'static str,
    pub ground_lines: &'static str,
    pub obstacle: &'static str,
    pub obstacle_detail: &'static str,
    pub player: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    /// Uniform draw pool; repeat a kind to make it more common
    pub obstacles: &'static [ObstacleKind],
    pub palette: Palette,
    pub has_clouds: bool,
    pub has_stars: bool,
}

use ObstacleKind::*;

pub const THEMES: [Theme; 4] = [
    Theme {
        name: "Neon City",
        obstacles: &[Crate, Crate, Crate, Barrier, Spike],
        palette: Palette {
            sky_top: "#1a1a2e",
            sky_mid: "#16213e",
            sky_bottom: "#0f3460",
            ground: "#2a2a3e",
            ground_lines: "rgba(255, 255, 255, 0.1)",
            obstacle: "#ef4444",
            obstacle_detail: "#ffffff",
            player: "#6366f1",
        },
        has_clouds: false,
        has_stars: true,
    },
    Theme {
        name: "Dune Sea",
        obstacles: &[Cactus, Cactus, Cactus, Boulder, Barrier],
        palette: Palette {
            sky_top: "#f59e0b",
            sky_mid: "#fbbf24",
            sky_bottom: "#fde68a",
            ground: "#b45309",
            ground_lines: "rgba(120, 53, 15, 0.3)",
            obstacle: "#15803d",
            obstacle_detail: "#bbf7d0",
            player: "#7c3aed",
        },
        has_clouds: false,
        has_stars: false,
    },
    Theme {
        name: "Wild Wood",
        obstacles: &[Log, Log, Boulder, Spike, Drone],
        palette: Palette {
            sky_top: "#38bdf8",
            sky_mid: "#7dd3fc",
            sky_bottom: "#bae6fd",
            ground: "#166534",
            ground_lines: "rgba(20, 83, 45, 0.4)",
            obstacle: "#78350f",
            obstacle_detail: "#d6a36a",
            player: "#4f46e5",
        },
        has_clouds: true,
        has_stars: false,
    },
    Theme {
        name: "Frozen Void",
        obstacles: &[Crystal, Crystal, Drone, Spike, Barrier],
        palette: Palette {
            sky_top: "#020617",
            sky_mid: "#0c4a6e",
            sky_bottom: "#164e63",
            ground: "#e0f2fe",
            ground_lines: "rgba(14, 116, 144, 0.25)",
            obstacle: "#67e8f9",
            obstacle_detail: "#ecfeff",
            player: "#a855f7",
        },
        has_clouds: true,
        has_stars: true,
    },
];

/// Theme index for a score: one theme per `span` points, cycling
pub fn theme_index(score: u64, span: u64) -> usize {
    if span == 0 {
        return 0;
    }
    ((score / span) % THEMES.len() as u64) as usize
}

pub fn theme(index: usize) -> &'static Theme {
    &THEMES[index % THEMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_changes_every_span() {
        assert_eq!(theme_index(0, 500), 0);
        assert_eq!(theme_index(499, 500), 0);
        assert_eq!(theme_index(500, 500), 1);
        assert_eq!(theme_index(1_990, 500), 3);
    }

    #[test]
    fn test_theme_cycles() {
        assert_eq!(theme_index(2_000, 500), 0);
        assert_eq!(theme_index(2_500, 500), 1);
        assert_eq!(theme(5).name, THEMES[1].name);
    }

    #[test]
    fn test_zero_span_pins_first_theme() {
        assert_eq!(theme_index(10_000, 0), 0);
    }

    #[test]
    fn test_every_theme_has_obstacles() {
        for t in &THEMES {
            assert!(!t.obstacles.is_empty(), "{} has no obstacles", t.name);
        }
    }

    #[test]
    fn test_first_theme_weights_crates() {
        let crates = THEMES[0].obstacles.iter().filter(|k| **k == Crate).count();
        assert_eq!(crates, 3);
        assert_eq!(THEMES[0].obstacles.len(), 5);
    }
}
