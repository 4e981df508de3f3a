//! Level configuration: a JSON platform layout loaded once at startup.
//!
//! Validation is strict so the simulation can assume well-formed geometry:
//! coordinates must be non-negative, dimensions positive, platform ids
//! unique, and at most one platform may carry the star. An empty platform
//! list is allowed and simply yields no collisions.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::collision::{Obstacle, RectF};
use crate::player::{PLAYER_SIZE, SCREEN_H};

pub const DEFAULT_PLATFORM_W: f32 = 250.0;
pub const DEFAULT_PLATFORM_H: f32 = 50.0;
pub const STAR_SIZE: f32 = 50.0;

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    #[serde(default)]
    pub spawn: SpawnPoint,
    pub platforms: Vec<PlatformSpec>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SpawnPoint {
    #[serde(default = "default_spawn_x")]
    pub x: f32,
    #[serde(default = "default_spawn_y")]
    pub y: f32,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            x: default_spawn_x(),
            y: default_spawn_y(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlatformSpec {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_platform_w")]
    pub width: f32,
    #[serde(default = "default_platform_h")]
    pub height: f32,
    #[serde(default)]
    pub has_star: bool,
}

/// The static obstacle set for one level. Immutable after construction.
pub struct World {
    obstacles: Vec<Obstacle>,
    spawn: SpawnPoint,
}

impl World {
    pub fn from_file(file: LevelFile) -> Self {
        let obstacles = file
            .platforms
            .iter()
            .map(|p| Obstacle {
                rect: RectF::new(p.x, p.y, p.width, p.height),
                is_goal: p.has_star,
            })
            .collect();
        Self {
            obstacles,
            spawn: file.spawn,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn spawn(&self) -> SpawnPoint {
        self.spawn
    }

    pub fn goal(&self) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.is_goal)
    }

    /// The win-trigger rectangle: the star sits centered on the goal
    /// platform, resting on its top edge.
    pub fn star_trigger(&self) -> Option<RectF> {
        self.goal().map(|goal| {
            RectF::new(
                goal.rect.center_x() - STAR_SIZE / 2.0,
                goal.rect.top() - STAR_SIZE,
                STAR_SIZE,
                STAR_SIZE,
            )
        })
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let level: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&level)?;
    Ok(level)
}

fn validate_level(level: &LevelFile) -> Result<(), String> {
    if level.spawn.x < 0.0 || level.spawn.y < 0.0 {
        return Err(format!(
            "Level validation failed: negative spawn point ({}, {})",
            level.spawn.x, level.spawn.y
        ));
    }

    let mut ids = HashSet::new();
    let mut star_count = 0usize;

    for platform in &level.platforms {
        if !ids.insert(platform.id.clone()) {
            return Err(format!(
                "Level validation failed: duplicate platform id '{}'",
                platform.id
            ));
        }
        if platform.x < 0.0 || platform.y < 0.0 {
            return Err(format!(
                "Level validation failed: platform '{}' has negative coordinates ({}, {})",
                platform.id, platform.x, platform.y
            ));
        }
        if platform.width <= 0.0 || platform.height <= 0.0 {
            return Err(format!(
                "Level validation failed: platform '{}' has non-positive size {}x{}",
                platform.id, platform.width, platform.height
            ));
        }
        if platform.has_star {
            star_count += 1;
        }
    }

    if star_count > 1 {
        return Err(format!(
            "Level validation failed: {star_count} platforms carry the star, at most one may"
        ));
    }
    if star_count == 0 {
        log::warn!("Level '{}' has no star platform and cannot be won.", level.level_id);
    }

    Ok(())
}

const fn default_spawn_x() -> f32 {
    340.0
}

fn default_spawn_y() -> f32 {
    SCREEN_H - PLAYER_SIZE
}

const fn default_platform_w() -> f32 {
    DEFAULT_PLATFORM_W
}

const fn default_platform_h() -> f32 {
    DEFAULT_PLATFORM_H
}
