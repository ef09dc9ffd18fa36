use navdeck_engine::{Directory, DirectoryError};

/// First-run convenience: a fresh database gets a small demo directory so the
/// front-end has something to render. A non-empty store is left untouched.
pub fn seed_if_empty(directory: &mut Directory) -> Result<(), DirectoryError> {
    if !directory.list_categories()?.is_empty() {
        return Ok(());
    }

    let seed: &[(&str, &[(&str, &str)])] = &[
        (
            "Search",
            &[
                ("DuckDuckGo", "https://duckduckgo.com"),
                ("Wikipedia", "https://www.wikipedia.org"),
            ],
        ),
        (
            "News",
            &[
                ("BBC", "https://www.bbc.com"),
                ("Hacker News", "https://news.ycombinator.com"),
            ],
        ),
        (
            "Development",
            &[
                ("GitHub", "https://github.com"),
                ("Stack Overflow", "https://stackoverflow.com"),
                ("crates.io", "https://crates.io"),
            ],
        ),
        (
            "Video",
            &[("YouTube", "https://www.youtube.com")],
        ),
    ];

    for (category_name, sites) in seed {
        let category = directory.create_category(category_name)?;
        for (site_name, url) in *sites {
            directory.create_site(site_name, url, Some(category.id))?;
        }
    }
    tracing::info!("seeded demo directory");
    Ok(())
}
