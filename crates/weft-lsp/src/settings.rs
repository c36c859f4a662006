//! Workspace settings.
//!
//! Settings arrive as JSON from the editor or a project settings file.
//! Unknown fields are tolerated so older services accept newer configs.

use std::path::Path;

use crate::decisions::{DecisionPointId, DecisionSet};

/// Policy and decision configuration for one workspace.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Workspace-default decision values (middle precedence tier).
    pub decision_defaults: DecisionSet,
    /// Style inferred from the codebase (lowest precedence tier).
    pub inferred_style: DecisionSet,
    /// Opt-in: treat heuristic-grade provenance as editable. Off by default;
    /// when on, affected renames report reduced confidence.
    pub allow_heuristic_provenance: bool,
    /// Whether the general-purpose fallback route may run at all.
    pub allow_fallback_route: bool,
    /// When set, required decision points must be resolved by the request or
    /// the workspace defaults; the inferred tier is not consulted.
    pub strict_decisions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mut inferred = DecisionSet::new();
        inferred
            .set(DecisionPointId::RenameStyle, "preserve")
            .set(DecisionPointId::ImportStyle, "relative-path")
            .set(DecisionPointId::AliasStrategy, "rewrite-references")
            .set(DecisionPointId::FileRename, "never");

        Self {
            decision_defaults: DecisionSet::new(),
            inferred_style: inferred,
            allow_heuristic_provenance: false,
            allow_fallback_route: true,
            strict_decisions: false,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| SettingsError::Io(path.display().to_string(), source))?;
        Self::from_json(&text).map_err(SettingsError::Parse)
    }

    /// The inferred tier the decision resolver should see: empty under a
    /// strict-decisions policy.
    pub fn effective_inferred_style(&self) -> DecisionSet {
        if self.strict_decisions {
            DecisionSet::new()
        } else {
            self.inferred_style.clone()
        }
    }
}

/// Failure to load a settings file.
#[derive(Debug)]
pub enum SettingsError {
    Io(String, std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(path, source) => write!(f, "cannot read settings {path}: {source}"),
            SettingsError::Parse(source) => write!(f, "invalid settings JSON: {source}"),
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
#[path = "../tests/settings_tests.rs"]
mod settings_tests;
