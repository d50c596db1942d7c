use anyhow::Result;
use forgeview_core::catalog::Catalog;
use forgeview_core::config::Config;
use forgeview_core::error::Error;
use forgeview_core::types::Project;
use forgeview_selector::FilteredSelector;
use std::path::Path;

pub fn run(catalog_path: Option<&Path>, config: &Config) -> Result<()> {
    println!("Forgeview Doctor");
    println!("================");
    println!();

    println!("Reference marker ... {}", config.references.marker_char());
    println!("Link class ... {}", config.references.link_class);
    println!(
        "Skipped elements ... {}",
        config.references.skip_elements.join(", ")
    );
    println!("Selector min score ... {}", config.selector.min_score);
    if config.selector.max_entries == 0 {
        println!("Selector max entries ... unlimited");
    } else {
        println!("Selector max entries ... {}", config.selector.max_entries);
    }
    println!("Log level ... {}", config.logging.level);

    let Some(path) = catalog_path else {
        println!();
        println!("No catalog given; pass --catalog to validate one.");
        return Ok(());
    };

    print!("Catalog {} ... ", path.display());
    match check_catalog(path) {
        Ok(catalog) => {
            println!(
                "OK ({} projects, {} issues)",
                catalog.projects().len(),
                catalog.issue_count()
            );
            Ok(())
        }
        Err(e) => {
            println!("FAIL: {}", e);
            anyhow::bail!("catalog check failed")
        }
    }
}

/// Load the catalog and activate every entry the picker would list, so ids
/// the resolver cannot map back to a project are reported.
fn check_catalog(path: &Path) -> Result<Catalog, Error> {
    let catalog = Catalog::load(path)?;
    {
        let mut selector = FilteredSelector::new(&catalog, &catalog, |_: Project| {});
        for entry in selector.render()?.entries {
            selector.on_item_activated(entry.id)?;
        }
    }
    Ok(catalog)
}
