//! Decision points and layered decision resolution.
//!
//! Some rename axes are inherently ambiguous (how to case the attribute form
//! of a renamed resource, whether to rename the component file along with
//! it). Each axis is a named decision point the caller can resolve; values
//! resolve through strict precedence — request override, then workspace
//! default, then inferred style. An unresolved point is reported as such,
//! never silently defaulted.

use indexmap::IndexMap;

/// A named axis of caller-resolvable ambiguity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionPointId {
    /// How renamed names are written at markup sites.
    RenameStyle,
    /// How import specifiers are rewritten after a file rename.
    ImportStyle,
    /// Whether references are rewritten or an alias is introduced.
    AliasStrategy,
    /// Whether the declaring file is renamed along with the resource.
    FileRename,
}

impl DecisionPointId {
    pub const ALL: [DecisionPointId; 4] = [
        DecisionPointId::RenameStyle,
        DecisionPointId::ImportStyle,
        DecisionPointId::AliasStrategy,
        DecisionPointId::FileRename,
    ];

    /// Candidate values a caller may choose from.
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            DecisionPointId::RenameStyle => &["preserve", "kebab-case"],
            DecisionPointId::ImportStyle => &["relative-path", "project-root"],
            DecisionPointId::AliasStrategy => &["rewrite-references", "introduce-alias"],
            DecisionPointId::FileRename => &["never", "always"],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionPointId::RenameStyle => "rename-style",
            DecisionPointId::ImportStyle => "import-style",
            DecisionPointId::AliasStrategy => "alias-strategy",
            DecisionPointId::FileRename => "file-rename",
        }
    }
}

/// A mapping from decision point to chosen value. Iteration order is
/// insertion order, so reporting stays stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DecisionSet {
    values: IndexMap<DecisionPointId, String>,
}

impl DecisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: DecisionPointId, value: impl Into<String>) -> &mut Self {
        self.values.insert(id, value.into());
        self
    }

    pub fn get(&self, id: DecisionPointId) -> Option<&str> {
        self.values.get(&id).map(|v| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Which tier supplied a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionSource {
    Request,
    WorkspaceDefault,
    InferredStyle,
}

/// The outcome of resolving one set of required decision points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionResolution {
    /// Resolved value and the tier it came from, per point, in the order the
    /// points were required.
    pub resolved: IndexMap<DecisionPointId, (String, DecisionSource)>,
    /// Points no tier had a value for.
    pub unresolved: Vec<DecisionPointId>,
}

impl DecisionResolution {
    pub fn value(&self, id: DecisionPointId) -> Option<&str> {
        self.resolved.get(&id).map(|(value, _)| value.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Resolve each required point independently through the three tiers.
///
/// `inferred` may be empty (e.g. under a strict-decisions policy); that is
/// how a point ends up unresolved rather than silently defaulted.
pub fn resolve_decisions(
    required: &[DecisionPointId],
    request: &DecisionSet,
    workspace: &DecisionSet,
    inferred: &DecisionSet,
) -> DecisionResolution {
    let mut resolution = DecisionResolution::default();

    for &id in required {
        let value = request
            .get(id)
            .map(|v| (v, DecisionSource::Request))
            .or_else(|| workspace.get(id).map(|v| (v, DecisionSource::WorkspaceDefault)))
            .or_else(|| inferred.get(id).map(|v| (v, DecisionSource::InferredStyle)));

        match value {
            Some((value, source)) => {
                resolution.resolved.insert(id, (value.to_string(), source));
            }
            None => resolution.unresolved.push(id),
        }
    }

    resolution
}

#[cfg(test)]
#[path = "../tests/decisions_tests.rs"]
mod decisions_tests;
