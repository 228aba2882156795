use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use gab_core::{GabError, ScriptNode};
use serde::{Deserialize, Serialize};

/// A clickable area in a room's inspection overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamineRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub kind: RegionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RegionKind {
    #[serde(rename_all = "camelCase")]
    Dialogue {
        level: String,
        dialogue_node: String,
    },
    #[serde(rename = "inventory")]
    AddToInventory { item: String },
    None { args: String },
}

/// Regions keyed by room name.
pub type RoomRegions = BTreeMap<String, Vec<ExamineRegion>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionFinding {
    pub room: String,
    pub index: usize,
    pub errors: Vec<String>,
}

pub fn load_room_regions(path: &Path) -> Result<RoomRegions, GabError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        GabError::new(
            "LINT_REGIONS_READ",
            format!("Failed to read {}: {}", path.display(), error),
        )
    })?;
    serde_json::from_str(&raw).map_err(|error| {
        GabError::new(
            "LINT_REGIONS_INVALID",
            format!("Invalid regions file {}: {}", path.display(), error),
        )
    })
}

/// `scripts_by_level` maps a level name to the nodes of `<level>.gab`.
pub fn validate_examine_region(
    region: &ExamineRegion,
    scripts_by_level: &BTreeMap<String, Vec<ScriptNode>>,
) -> Vec<String> {
    let mut errors = Vec::new();

    if region.x < 0.0 {
        errors.push(format!("Invalid x coordinate: {}", region.x));
    }
    if region.y < 0.0 {
        errors.push(format!("Invalid y coordinate: {}", region.y));
    }
    if region.width <= 0.0 {
        errors.push(format!("Invalid width: {}", region.width));
    }
    if region.height <= 0.0 {
        errors.push(format!("Invalid height: {}", region.height));
    }

    match &region.kind {
        RegionKind::Dialogue {
            level,
            dialogue_node,
        } => {
            if level.trim().is_empty() {
                errors.push("Missing level parameter for dialogue region".to_string());
            }
            if dialogue_node.trim().is_empty() {
                errors.push("Missing dialogueNode parameter for dialogue region".to_string());
            } else {
                let exists = scripts_by_level
                    .get(level)
                    .is_some_and(|nodes| nodes.iter().any(|node| &node.title == dialogue_node));
                if !exists {
                    errors.push(format!(
                        "Dialogue node '{}' not found in {}.gab",
                        dialogue_node, level
                    ));
                }
            }
        }
        RegionKind::AddToInventory { item } => {
            if item.trim().is_empty() {
                errors.push("Missing item parameter for inventory region".to_string());
            }
        }
        RegionKind::None { args } => {
            if args.trim().is_empty() {
                errors.push("Missing args parameter for none region".to_string());
            }
        }
    }

    errors
}

pub fn lint_room_regions(
    rooms: &RoomRegions,
    scripts_by_level: &BTreeMap<String, Vec<ScriptNode>>,
) -> Vec<RegionFinding> {
    let mut findings = Vec::new();
    for (room, regions) in rooms {
        for (index, region) in regions.iter().enumerate() {
            let errors = validate_examine_region(region, scripts_by_level);
            if !errors.is_empty() {
                findings.push(RegionFinding {
                    room: room.clone(),
                    index,
                    errors,
                });
            }
        }
    }
    findings
}
