//! Scripted input sequences for deterministic simulation tests.

use crate::player::FrameInput;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub up: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(FrameInput {
                    left: frame.left,
                    right: frame.right,
                    up: frame.up,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Obstacle, RectF};
    use crate::player::Player;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "shp_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn sample_obstacles() -> Vec<Obstacle> {
        vec![
            Obstacle {
                rect: RectF::new(475.0, 500.0, 250.0, 50.0),
                is_goal: false,
            },
            Obstacle {
                rect: RectF::new(50.0, 400.0, 250.0, 50.0),
                is_goal: false,
            },
            Obstacle {
                rect: RectF::new(425.0, 275.0, 250.0, 50.0),
                is_goal: true,
            },
        ]
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 3 },
                { "up": true }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert!(expanded[0].right && !expanded[0].up);
        assert!(expanded[3].up);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frame_list() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");

        let err = load_replay_from_path(&path).expect_err("empty frames should fail");
        assert!(err.contains("frames list is empty"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 45 },
                { "right": true, "up": true, "repeat": 2 },
                { "right": true, "repeat": 60 },
                { "left": true, "repeat": 30 },
                { "up": true, "repeat": 2 },
                { "repeat": 30 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let inputs = replay.expanded_inputs();
        let obstacles = sample_obstacles();

        let mut run_a = Player::new(340.0, 500.0);
        let mut run_b = Player::new(340.0, 500.0);
        for input in &inputs {
            run_a.step(*input, &obstacles);
            run_a.clamp_to_screen();
        }
        for input in &inputs {
            run_b.step(*input, &obstacles);
            run_b.clamp_to_screen();
        }

        assert_eq!(run_a.rect(), run_b.rect());
        assert_eq!(run_a.velocity(), run_b.velocity());
        assert_eq!(run_a.motion(), run_b.motion());
    }
}
