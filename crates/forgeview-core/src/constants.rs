/// Marker character that introduces an issue reference (`#42`).
pub const DEFAULT_REFERENCE_MARKER: char = '#';

/// CSS class placed on rewritten issue links.
pub const DEFAULT_LINK_CLASS: &str = "issue";

/// Elements whose text content is never scanned for references.
pub const DEFAULT_SKIP_ELEMENTS: &[&str] = &["a", "code", "pre"];

/// Items scoring at or below this value are dropped from a filtered list.
pub const DEFAULT_MIN_SCORE: f64 = 0.0;

/// Default data directory name under home.
pub const DEFAULT_DATA_DIR: &str = ".forgeview";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = ".forgeview/config.toml";

/// Path suffix appended to a project path to reach its file browser.
pub const PROJECT_FILES_SEGMENT: &str = "~files";

/// Path segment between a project path and an issue number.
pub const ISSUES_SEGMENT: &str = "~issues";
