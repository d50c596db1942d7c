use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config value: {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error("duplicate project id: {id}")]
    DuplicateProject { id: u64 },

    #[error("issue #{number} refers to unknown project id {project_id}")]
    UnknownProject { project_id: u64, number: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Convenience constructor for parse errors; use with `.map_err(CatalogError::parse)`.
    pub fn parse<E: std::fmt::Display>(e: E) -> Self {
        Self::Parse(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SelectorError {
    /// An activated id was not part of any snapshot the resolver knows about.
    #[error("no entity with id {id}; the rendered list is stale")]
    UnknownEntity { id: u64 },

    #[error("failed to load collection: {0}")]
    Collection(#[from] CatalogError),
}
