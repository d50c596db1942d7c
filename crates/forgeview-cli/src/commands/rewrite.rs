use anyhow::{Context, Result};
use forgeview_core::catalog::Catalog;
use forgeview_core::config::Config;
use forgeview_markdown::ReferenceRewriter;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub fn run(
    catalog_path: &Path,
    project_path: &str,
    input: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let catalog = Catalog::load(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let project = catalog
        .project_by_path(project_path)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Unknown project: {}", project_path))?;

    let content = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let rewriter = ReferenceRewriter::with_config(&catalog, &catalog, &config.references);
    let out = rewriter.rewrite(&content, &project);
    for issue in &out.references {
        info!(number = issue.number, title = %issue.title, "linked issue");
    }

    print!("{}", out.html);
    Ok(())
}
