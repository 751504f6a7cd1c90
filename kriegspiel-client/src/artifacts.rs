//! Per-game artifacts: the score log and the final encoded map

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::sync::SessionEnd;

/// Append `label: score` to the score log
pub fn append_score(path: &Path, label: &str, score: f64) -> Result<(), ClientError> {
    let artifact_err = |source| ClientError::Artifact {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(artifact_err)?;
    writeln!(file, "{}: {}", label, score).map_err(artifact_err)
}

/// Overwrite `path` with the encoded map, one row per line
pub fn write_final_map(path: &Path, rows: &[String]) -> Result<(), ClientError> {
    let mut contents = rows.join("\n");
    contents.push('\n');
    fs::write(path, contents).map_err(|source| ClientError::Artifact {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist whatever a finished session produced. Only a completed game
/// leaves artifacts.
pub fn record_game(config: &ClientConfig, end: &SessionEnd) -> Result<(), ClientError> {
    let SessionEnd::GameOver { score, final_map, .. } = end else {
        return Ok(());
    };

    if let Some(path) = &config.score_log {
        append_score(path, &config.label, score.value)?;
        info!("Score appended to {}", path.display());
    }
    if let Some(path) = &config.final_map {
        write_final_map(path, final_map)?;
        info!("Final map written to {}", path.display());
    }
    Ok(())
}
