//! Collaborator seams and an in-memory catalog implementing them.
//!
//! The rewriter and selector never talk to storage directly. They go through
//! the traits below, which a host implements over its own domain services.
//! [`Catalog`] is the implementation used by the CLI and by tests: projects and
//! issues loaded from a JSON document.

use crate::constants;
use crate::error::CatalogError;
use crate::types::{Issue, IssueNumber, Project, ProjectCollection, ProjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Looks up an issue by number within a project.
pub trait IssueLookup {
    fn find_issue(&self, project: &Project, number: IssueNumber) -> Option<Issue>;
}

/// Builds navigable URLs for resolved entities.
pub trait LinkBuilder {
    fn issue_url(&self, issue: &Issue) -> String;
    fn project_url(&self, project: &Project) -> String;
}

/// Resolves an id taken from a rendered list back to the full entity.
pub trait EntityResolver {
    type Entity;

    fn resolve(&self, id: ProjectId) -> Option<Self::Entity>;
}

/// Deferred supplier of the candidate collection.
///
/// Called again whenever a consumer has dropped its snapshot, so it must be
/// cheap to call repeatedly and must not have side effects.
pub trait CollectionSource {
    fn load(&self) -> Result<ProjectCollection, CatalogError>;
}

impl<T: IssueLookup + ?Sized> IssueLookup for &T {
    fn find_issue(&self, project: &Project, number: IssueNumber) -> Option<Issue> {
        (**self).find_issue(project, number)
    }
}

impl<T: LinkBuilder + ?Sized> LinkBuilder for &T {
    fn issue_url(&self, issue: &Issue) -> String {
        (**self).issue_url(issue)
    }

    fn project_url(&self, project: &Project) -> String {
        (**self).project_url(project)
    }
}

impl<T: EntityResolver + ?Sized> EntityResolver for &T {
    type Entity = T::Entity;

    fn resolve(&self, id: ProjectId) -> Option<Self::Entity> {
        (**self).resolve(id)
    }
}

impl<T: CollectionSource + ?Sized> CollectionSource for &T {
    fn load(&self) -> Result<ProjectCollection, CatalogError> {
        (**self).load()
    }
}

/// A [`CollectionSource`] backed by a closure. Created with [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

/// Wrap a closure as a [`CollectionSource`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn() -> Result<ProjectCollection, CatalogError>,
{
    FromFn(f)
}

impl<F> CollectionSource for FromFn<F>
where
    F: Fn() -> Result<ProjectCollection, CatalogError>,
{
    fn load(&self) -> Result<ProjectCollection, CatalogError> {
        (self.0)()
    }
}

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FromFn(..)")
    }
}

/// On-disk shape of a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// In-memory projects and issues.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    base_url: String,
    projects: Vec<Project>,
    by_id: HashMap<ProjectId, usize>,
    issues: HashMap<(ProjectId, IssueNumber), Issue>,
}

impl Catalog {
    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(doc.projects.len());
        for (idx, project) in doc.projects.iter().enumerate() {
            if by_id.insert(project.id, idx).is_some() {
                return Err(CatalogError::DuplicateProject { id: project.id.0 });
            }
        }

        let mut issues = HashMap::with_capacity(doc.issues.len());
        for issue in doc.issues {
            if !by_id.contains_key(&issue.project_id) {
                return Err(CatalogError::UnknownProject {
                    project_id: issue.project_id.0,
                    number: issue.number,
                });
            }
            issues.insert((issue.project_id, issue.number), issue);
        }

        Ok(Self {
            base_url: doc.base_url.trim_end_matches('/').to_string(),
            projects: doc.projects,
            by_id,
            issues,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(raw).map_err(CatalogError::parse)?;
        Self::from_document(doc)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        tracing::debug!(
            path = %path.display(),
            projects = catalog.projects.len(),
            issues = catalog.issues.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.by_id.get(&id).map(|&idx| &self.projects[idx])
    }

    pub fn project_by_path(&self, path: &str) -> Option<&Project> {
        let path = path.trim_matches('/');
        self.projects.iter().find(|p| p.path == path)
    }

    /// Projects whose path is `parent` itself or lies beneath it.
    pub fn projects_under(&self, parent: &str) -> ProjectCollection {
        let parent = parent.trim_matches('/');
        self.projects
            .iter()
            .filter(|p| {
                parent.is_empty()
                    || p.path == parent
                    || p.path
                        .strip_prefix(parent)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .collect()
    }
}

impl IssueLookup for Catalog {
    fn find_issue(&self, project: &Project, number: IssueNumber) -> Option<Issue> {
        self.issues.get(&(project.id, number)).cloned()
    }
}

impl LinkBuilder for Catalog {
    fn issue_url(&self, issue: &Issue) -> String {
        match self.project(issue.project_id) {
            Some(project) => format!(
                "{}/{}/{}/{}",
                self.base_url,
                project.path,
                constants::ISSUES_SEGMENT,
                issue.number
            ),
            None => format!(
                "{}/projects/{}/{}/{}",
                self.base_url,
                issue.project_id,
                constants::ISSUES_SEGMENT,
                issue.number
            ),
        }
    }

    fn project_url(&self, project: &Project) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            project.path,
            constants::PROJECT_FILES_SEGMENT
        )
    }
}

impl EntityResolver for Catalog {
    type Entity = Project;

    fn resolve(&self, id: ProjectId) -> Option<Project> {
        self.project(id).cloned()
    }
}

impl CollectionSource for Catalog {
    fn load(&self) -> Result<ProjectCollection, CatalogError> {
        Ok(self.projects.iter().collect())
    }
}
