//! Dining center and menu lookups.
//!
//! Menus are opaque documents keyed by a dining location's slug. The file
//! source reads them from `<dir>/centers.json` and `<dir>/<slug>.json`.
//! A menu document is either a flat list of items or the dining service's
//! location response, whose first menu is flattened across its displays and
//! categories.

use crate::{DiningCenter, Error, MenuItem, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MenuDocument {
    Items(Vec<MenuItem>),
    Locations(Vec<LocationMenus>),
}

#[derive(Debug, Deserialize)]
struct LocationMenus {
    menus: Vec<Menu>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Menu {
    menu_displays: Vec<MenuDisplay>,
}

#[derive(Debug, Deserialize)]
struct MenuDisplay {
    categories: Vec<MenuCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuCategory {
    menu_items: Vec<MenuItem>,
}

impl MenuDocument {
    /// Items of the first menu of the first location, in display order
    fn into_items(self) -> Vec<MenuItem> {
        match self {
            MenuDocument::Items(items) => items,
            MenuDocument::Locations(locations) => locations
                .into_iter()
                .next()
                .and_then(|location| location.menus.into_iter().next())
                .map(|menu| {
                    menu.menu_displays
                        .into_iter()
                        .flat_map(|display| display.categories)
                        .flat_map(|category| category.menu_items)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Source of dining centers and their menus
pub trait MenuSource {
    fn dining_centers(&self) -> Result<Vec<DiningCenter>>;

    fn fetch_menu(&self, slug: &str) -> Result<Vec<MenuItem>>;

    /// Look up one item on a menu by name (case-insensitive)
    fn find_item(&self, slug: &str, item_name: &str) -> Result<MenuItem> {
        let wanted = item_name.trim().to_lowercase();
        self.fetch_menu(slug)?
            .into_iter()
            .find(|item| item.name.to_lowercase() == wanted)
            .ok_or_else(|| {
                Error::RemoteFailure(format!("no item '{}' on the {} menu", item_name, slug))
            })
    }
}

/// Menus stored as JSON documents in a directory
#[derive(Clone, Debug)]
pub struct JsonMenuSource {
    dir: PathBuf,
}

impl JsonMenuSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::RemoteFailure(format!("fetching {:?}: {}", path, e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::ParseFailure(format!("{:?}: {}", path, e)))
    }
}

/// Slugs become file names, so only a conservative character set is allowed
fn validate_slug(slug: &str) -> Result<()> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::RemoteFailure(format!("invalid dining location '{}'", slug)))
    }
}

impl MenuSource for JsonMenuSource {
    fn dining_centers(&self) -> Result<Vec<DiningCenter>> {
        let centers: Vec<DiningCenter> = Self::read_document(&self.dir.join("centers.json"))?;
        tracing::debug!("Fetched {} dining centers", centers.len());
        Ok(centers)
    }

    fn fetch_menu(&self, slug: &str) -> Result<Vec<MenuItem>> {
        validate_slug(slug)?;
        let document: MenuDocument =
            Self::read_document(&self.dir.join(format!("{}.json", slug)))?;
        let items = document.into_items();
        tracing::debug!("Fetched {} menu items for {}", items.len(), slug);
        Ok(items)
    }
}
