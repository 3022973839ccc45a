use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// One classroom record from the directory seed file. Read-only after
/// startup; occupancy and schedule data reference it by `id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Classroom {
    pub id: String,
    pub room_number: String,
    pub building_id: String,
    pub faculty: String,
    pub floor: i32,
    pub capacity: u32,
    #[serde(default)]
    pub has_projector: bool,
    #[serde(default = "default_true")]
    pub has_wifi: bool,
    #[serde(default = "default_true")]
    pub has_power_outlets: bool,
    /// Camera feed bound to this room, if one is installed.
    #[serde(default)]
    pub camera_id: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read classroom directory: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse classroom directory: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load the classroom directory from a JSON seed file. A missing file is
/// an empty directory, not an error.
pub fn load_directory_from_path(
    path: impl AsRef<Path>,
) -> Result<Vec<Classroom>, DirectoryError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)?;
    let classrooms: Vec<Classroom> = serde_json::from_str(&contents)?;
    Ok(classrooms)
}
