use anyhow::{Context, Result};
use forgeview_core::catalog::{Catalog, LinkBuilder, from_fn};
use forgeview_core::config::Config;
use forgeview_core::types::{Project, ProjectCollection, ProjectId};
use forgeview_selector::{FilteredSelector, Placeholder, RenderModel};
use std::path::Path;

pub struct SelectArgs<'a> {
    pub query: &'a str,
    pub under: Option<&'a str>,
    pub current: Option<&'a str>,
    pub down: isize,
    pub enter: bool,
    pub activate: Option<u64>,
    pub json: bool,
}

pub fn run(catalog_path: &Path, args: &SelectArgs<'_>, config: &Config) -> Result<()> {
    let catalog = Catalog::load(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;

    let current = match args.current {
        Some(path) => Some(
            catalog
                .project_by_path(path)
                .map(|p| p.id)
                .ok_or_else(|| anyhow::anyhow!("Unknown project: {}", path))?,
        ),
        None => None,
    };

    let under = args.under;
    let source = from_fn(|| {
        Ok(match under {
            Some(parent) => catalog.projects_under(parent),
            None => catalog.projects().iter().collect::<ProjectCollection>(),
        })
    });

    let mut selected: Option<Project> = None;
    let model = {
        let mut selector = FilteredSelector::new(source, &catalog, |project: Project| {
            selected = Some(project);
        })
        .with_config(&config.selector);
        selector.set_current(current);

        selector.on_search_changed(args.query)?;
        let model = selector.move_active(args.down)?;
        if let Some(id) = args.activate {
            selector.on_item_activated(ProjectId(id))?;
        } else if args.enter {
            selector.activate_active()?;
        }
        model
    };

    if args.activate.is_some() || args.enter {
        match selected {
            Some(project) => println!("{}", catalog.project_url(&project)),
            None => anyhow::bail!("Nothing to activate: no project matches {:?}", args.query),
        }
        return Ok(());
    }

    let model = model.with_links(&catalog);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print_table(&model);
    }
    Ok(())
}

fn print_table(model: &RenderModel) {
    match model.placeholder {
        Some(Placeholder::NoItems) => {
            println!("No projects.");
            return;
        }
        Some(Placeholder::NoMatches) => {
            println!("No projects match {:?}.", model.search);
            return;
        }
        None => {}
    }

    println!("{:<2} {:<6} {:<40} {:<6}", "", "ID", "PATH", "SCORE");
    println!("{}", "-".repeat(56));
    for entry in &model.entries {
        let marker = match (entry.active, entry.current) {
            (true, true) => ">*",
            (true, false) => "> ",
            (false, true) => " *",
            (false, false) => "  ",
        };
        println!(
            "{:<2} {:<6} {:<40} {:<6.3}",
            marker,
            entry.id.get(),
            entry.label,
            entry.score
        );
    }
}
