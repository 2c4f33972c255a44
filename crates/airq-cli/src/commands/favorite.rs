//! Favorite command - the set of pinned cities.

use airq_store::LocalStore;
use anyhow::{Result, bail};
use serde_json::json;

use crate::cli::FavoriteAction;
use crate::config::Config;
use crate::format::{FormatOptions, format_favorites_text};
use crate::style;
use crate::util::write_output;

pub async fn cmd_favorite(
    store: &LocalStore,
    action: FavoriteAction,
    config: &Config,
    opts: &FormatOptions,
) -> Result<()> {
    let content = match action {
        FavoriteAction::Add { city } => {
            add_favorite(store, &city, config.max_favorites).await?;
            if opts.json {
                opts.as_json(&json!({ "city": city, "favorite": true }))?
            } else {
                style::format_success(&format!("{} added to favorites", city), opts.no_color)
                    + "\n"
            }
        }
        FavoriteAction::Remove { city } => {
            let removed = store.remove_favorite(&city).await?;
            if opts.json {
                opts.as_json(&json!({ "city": city, "removed": removed }))?
            } else if removed {
                style::format_success(&format!("{} removed from favorites", city), opts.no_color)
                    + "\n"
            } else {
                format!("{} was not a favorite\n", city)
            }
        }
        FavoriteAction::List => {
            let favorites = store.list_favorites().await?;
            if opts.json {
                opts.as_json(&favorites)?
            } else if favorites.is_empty() {
                "No favorite cities\n".to_string()
            } else {
                format_favorites_text(&favorites)
            }
        }
        FavoriteAction::Check { city } => {
            let favorite = store.is_favorite(&city).await?;
            if opts.json {
                opts.as_json(&json!({ "city": city, "favorite": favorite }))?
            } else if favorite {
                format!("{} is a favorite\n", city)
            } else {
                format!("{} is not a favorite\n", city)
            }
        }
    };

    write_output(None, &content)
}

/// Add `city` unless the favorites are already full. Re-adding an existing
/// favorite is always allowed.
async fn add_favorite(store: &LocalStore, city: &str, max_favorites: usize) -> Result<()> {
    if !store.is_favorite(city).await? {
        let count = store.list_favorites().await?.len();
        if count >= max_favorites {
            bail!(
                "Favorites are limited to {} cities. Remove one with 'airq fav rm <CITY>' first",
                max_favorites
            );
        }
    }

    store.add_favorite(city).await?;
    Ok(())
}
