use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Numeric project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl ProjectId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProjectId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-project issue number, the `42` in `#42`.
pub type IssueNumber = u64;

/// A project known to the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Slash separated hierarchical path, e.g. `acme/widgets`.
    pub path: String,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// An issue owned by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub project_id: ProjectId,
    pub number: IssueNumber,
    #[serde(default)]
    pub title: String,
}

/// Side cache mapping project ids to their display paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCache {
    paths: HashMap<ProjectId, String>,
}

impl ProjectCache {
    pub fn insert(&mut self, id: ProjectId, path: impl Into<String>) {
        self.paths.insert(id, path.into());
    }

    pub fn path(&self, id: ProjectId) -> Option<&str> {
        self.paths.get(&id).map(String::as_str)
    }
}

/// Ordered set of project ids plus the labels used to score and render them.
///
/// Iteration order is insertion order. Duplicate ids keep their first
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCollection {
    ids: Vec<ProjectId>,
    cache: ProjectCache,
}

impl ProjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a project. Returns false when the id was already present.
    pub fn push(&mut self, id: ProjectId, path: impl Into<String>) -> bool {
        if self.cache.path(id).is_some() {
            return false;
        }
        self.ids.push(id);
        self.cache.insert(id, path);
        true
    }

    pub fn ids(&self) -> &[ProjectId] {
        &self.ids
    }

    /// Display label for `id`, empty when the cache has no entry.
    pub fn label(&self, id: ProjectId) -> &str {
        self.cache.path(id).unwrap_or_default()
    }

    pub fn contains(&self, id: ProjectId) -> bool {
        self.cache.path(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> FromIterator<&'a Project> for ProjectCollection {
    fn from_iter<I: IntoIterator<Item = &'a Project>>(iter: I) -> Self {
        let mut collection = ProjectCollection::new();
        for project in iter {
            collection.push(project.id, project.path.clone());
        }
        collection
    }
}

impl<S: Into<String>> FromIterator<(u64, S)> for ProjectCollection {
    fn from_iter<I: IntoIterator<Item = (u64, S)>>(iter: I) -> Self {
        let mut collection = ProjectCollection::new();
        for (id, path) in iter {
            collection.push(ProjectId(id), path);
        }
        collection
    }
}

/// Returns true when every id in `ids` is distinct.
pub fn all_distinct(ids: &[ProjectId]) -> bool {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().all(|id| seen.insert(*id))
}
