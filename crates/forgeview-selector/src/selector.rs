use crate::scoring::{
    FilterOptions, MatchScorer, ScoredCandidate, SubsequenceScorer, filter_and_sort,
};
use forgeview_core::catalog::{CollectionSource, EntityResolver, LinkBuilder};
use forgeview_core::config::SelectorConfig;
use forgeview_core::error::SelectorError;
use forgeview_core::types::{Project, ProjectCollection, ProjectId};
use serde::Serialize;
use tracing::{debug, warn};

/// Why the entry list is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// The collection itself is empty.
    NoItems,
    /// The collection has items but none match the search text.
    NoMatches,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEntry {
    pub id: ProjectId,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub score: f64,
    /// Keyboard highlight; the default target of Enter.
    pub active: bool,
    /// The host's current item, styled differently.
    pub current: bool,
}

/// Everything a host needs to draw the selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub search: String,
    pub entries: Vec<RenderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
}

impl RenderModel {
    pub fn list_visible(&self) -> bool {
        self.placeholder.is_none()
    }

    pub fn placeholder_visible(&self) -> bool {
        self.placeholder.is_some()
    }

    pub fn active_entry(&self) -> Option<&RenderEntry> {
        self.entries.iter().find(|e| e.active)
    }

    /// Fill in each entry's `href` from `links`.
    pub fn with_links<U: LinkBuilder + ?Sized>(mut self, links: &U) -> Self {
        for entry in &mut self.entries {
            let project = Project::new(entry.id, entry.label.clone());
            entry.href = Some(links.project_url(&project));
        }
        self
    }
}

/// A searchable list of projects that reports activations to its host.
///
/// The collection is pulled lazily from `source` and kept as a snapshot until
/// [`detach`](Self::detach) or [`configure`](Self::configure). Everything the
/// host renders is derived from (snapshot, search text) by
/// [`render`](Self::render).
pub struct FilteredSelector<S, R, F, M = SubsequenceScorer> {
    source: S,
    resolver: R,
    on_select: F,
    scorer: M,
    options: FilterOptions,
    search: String,
    snapshot: Option<ProjectCollection>,
    current: Option<ProjectId>,
    active: usize,
}

impl<S, R, F> FilteredSelector<S, R, F>
where
    S: CollectionSource,
    R: EntityResolver,
    F: FnMut(R::Entity),
{
    pub fn new(source: S, resolver: R, on_select: F) -> Self {
        Self {
            source,
            resolver,
            on_select,
            scorer: SubsequenceScorer,
            options: FilterOptions::default(),
            search: String::new(),
            snapshot: None,
            current: None,
            active: 0,
        }
    }
}

impl<S, R, F, M> FilteredSelector<S, R, F, M>
where
    S: CollectionSource,
    R: EntityResolver,
    F: FnMut(R::Entity),
    M: MatchScorer,
{
    /// Swap the scoring function.
    pub fn with_scorer<M2: MatchScorer>(self, scorer: M2) -> FilteredSelector<S, R, F, M2> {
        FilteredSelector {
            source: self.source,
            resolver: self.resolver,
            on_select: self.on_select,
            scorer,
            options: self.options,
            search: self.search,
            snapshot: self.snapshot,
            current: self.current,
            active: self.active,
        }
    }

    pub fn with_config(mut self, config: &SelectorConfig) -> Self {
        self.options = FilterOptions::from(config);
        self
    }

    pub fn with_options(mut self, options: FilterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_current(mut self, current: impl Into<ProjectId>) -> Self {
        self.current = Some(current.into());
        self
    }

    pub fn set_current(&mut self, current: Option<ProjectId>) {
        self.current = current;
    }

    /// Replace the collection source. The next render loads from it.
    pub fn configure(&mut self, source: S) {
        self.source = source;
        self.snapshot = None;
        self.active = 0;
    }

    /// Drop the collection snapshot, e.g. at the end of a request.
    pub fn detach(&mut self) {
        self.snapshot = None;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search text and return the re-filtered view.
    pub fn on_search_changed(
        &mut self,
        text: impl Into<String>,
    ) -> Result<RenderModel, SelectorError> {
        self.search = text.into();
        self.active = 0;
        self.render()
    }

    /// Move the keyboard highlight by `delta` rows, clamped to the list.
    pub fn move_active(&mut self, delta: isize) -> Result<RenderModel, SelectorError> {
        let len = self.matches()?.len();
        if len > 0 {
            let last = (len - 1) as isize;
            self.active = (self.active as isize).saturating_add(delta).clamp(0, last) as usize;
        }
        self.render()
    }

    /// Resolve `id` and hand the entity to the selection callback.
    ///
    /// An id the resolver does not know means the host rendered from a stale
    /// snapshot, which is reported as [`SelectorError::UnknownEntity`].
    pub fn on_item_activated(&mut self, id: ProjectId) -> Result<(), SelectorError> {
        let Some(entity) = self.resolver.resolve(id) else {
            warn!(%id, "activated id did not resolve");
            return Err(SelectorError::UnknownEntity { id: id.get() });
        };
        debug!(%id, "selector item activated");
        (self.on_select)(entity);
        Ok(())
    }

    /// Activate the highlighted entry. Returns the activated id, or `None`
    /// when the list is empty.
    pub fn activate_active(&mut self) -> Result<Option<ProjectId>, SelectorError> {
        let matches = self.matches()?;
        let active = self.active.min(matches.len().saturating_sub(1));
        let Some(candidate) = matches.get(active) else {
            return Ok(None);
        };
        let id = candidate.id;
        self.on_item_activated(id)?;
        Ok(Some(id))
    }

    /// Project the current state into a render model.
    pub fn render(&mut self) -> Result<RenderModel, SelectorError> {
        let matches = self.matches()?;
        let empty = ProjectCollection::default();
        let snapshot = self.snapshot.as_ref().unwrap_or(&empty);
        let active = self.active.min(matches.len().saturating_sub(1));

        let entries: Vec<RenderEntry> = matches
            .iter()
            .enumerate()
            .map(|(idx, candidate)| RenderEntry {
                id: candidate.id,
                label: snapshot.label(candidate.id).to_string(),
                href: None,
                score: candidate.score,
                active: idx == active,
                current: self.current == Some(candidate.id),
            })
            .collect();

        let placeholder = if !entries.is_empty() {
            None
        } else if snapshot.is_empty() {
            Some(Placeholder::NoItems)
        } else {
            Some(Placeholder::NoMatches)
        };

        Ok(RenderModel {
            search: self.search.clone(),
            entries,
            placeholder,
        })
    }

    fn ensure_snapshot(&mut self) -> Result<(), SelectorError> {
        if self.snapshot.is_none() {
            let loaded = self.source.load()?;
            debug!(items = loaded.len(), "selector collection loaded");
            self.snapshot = Some(loaded);
        }
        Ok(())
    }

    fn matches(&mut self) -> Result<Vec<ScoredCandidate>, SelectorError> {
        self.ensure_snapshot()?;
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Ok(Vec::new());
        };
        Ok(filter_and_sort(
            snapshot,
            &self.search,
            &self.scorer,
            &self.options,
        ))
    }
}
