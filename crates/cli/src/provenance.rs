//! Provenance for result files: which code, which inputs, which engine settings.
//!
//! A points file `dir/name.csv` gets `dir/name.provenance.json` next to it.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Engine settings and inputs recorded for one result file.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<String>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    version: &'static str,
    /// `file:line` of the call that produced the result.
    written_by: String,
    params: &'a Value,
    inputs: &'a [String],
    output: String,
}

/// Write the sidecar for `result` and return its path.
#[track_caller]
pub fn write_sidecar(result: &Path, payload: Payload) -> Result<PathBuf> {
    let caller = Location::caller();
    let sidecar = Sidecar {
        code_rev: current_git_rev(),
        version: segint::VERSION,
        written_by: format!("{}:{}", caller.file(), caller.line()),
        params: &payload.params,
        inputs: &payload.inputs,
        output: result.display().to_string(),
    };
    let path = sidecar_path(result);
    fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(sidecar = %path.display(), "provenance written");
    Ok(path)
}

fn sidecar_path(result: &Path) -> PathBuf {
    let stem = result
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "result".to_string());
    result.with_file_name(format!("{stem}.provenance.json"))
}

/// Block printed by `segint report`.
pub fn report() -> Value {
    json!({
        "code_rev": current_git_rev(),
        "version": segint::VERSION,
        "backends": ["double", "decimal", "rational", "vectorized"],
    })
}

/// `GIT_COMMIT` from the environment, else `git rev-parse HEAD`, else `unknown`.
pub fn current_git_rev() -> String {
    if let Some(rev) = std::env::var("GIT_COMMIT").ok().filter(|r| !r.is_empty()) {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|rev| rev.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
