use std::path::Path;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use crate::error::ReviewError;
use super::ThemeMap;

fn persistence_error(path: &Path, reason: impl ToString) -> ReviewError {
    ReviewError::Persistence {
        path:   path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Serializes the map as UTF-8 JSON indented by four spaces.
pub fn to_json(map: &ThemeMap) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    map.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes the snapshot, replacing any previous file at `path`.
pub fn save_snapshot(map: &ThemeMap, path: &Path) -> Result<(), ReviewError> {
    let json = to_json(map).map_err(|e| persistence_error(path, e))?;
    std::fs::write(path, json).map_err(|e| persistence_error(path, e))
}

pub fn load_snapshot(path: &Path) -> Result<ThemeMap, ReviewError> {
    let raw = std::fs::read_to_string(path).map_err(|e| persistence_error(path, e))?;
    serde_json::from_str(&raw).map_err(|e| persistence_error(path, e))
}

fn preview(review: &str) -> String {
    let head: String = review.chars().take(100).collect();
    format!("{}...", head)
}

/// Theme, its reviews, then each sub-theme with its reviews. Reviews are
/// cut to their first 100 characters.
pub fn render_hierarchy(map: &ThemeMap) -> String {
    let mut out = String::new();
    for (theme, bucket) in map {
        out.push_str(&format!("\nTheme: {}\nTheme Reviews:\n", theme));
        for review in &bucket.reviews {
            out.push_str(&format!("  - {}\n", preview(review)));
        }
        out.push_str("\nSubthemes:\n");
        for (subtheme, reviews) in &bucket.subthemes {
            out.push_str(&format!("  {}\n", subtheme));
            for review in reviews {
                out.push_str(&format!("    - {}\n", preview(review)));
            }
        }
    }
    out
}
