//! In-memory registry of one build.
//!
//! Pages are appended in walk order. Sections and categories are registered
//! lazily the first time a page mentions them and keep that discovery
//! order. Once the scan is done the model is read-only; navigation adds its
//! synthetic pages through [`SiteModel::extend_pages`].

use crate::types::{Category, Page, Section};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Output path {path} is produced by both {first} and {second}")]
    OutputCollision {
        path: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteModel {
    pub sections: Vec<Section>,
    pub categories: Vec<Category>,
    pub pages: Vec<Page>,
}

impl SiteModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a content page, registering its section and category.
    pub fn add_page(&mut self, page: Page, section: &Section, category: &Category) {
        self.register_section(section);
        if !category.is_empty() {
            if !category.parent.is_empty() {
                // A nested category needs its parent as a navigation node.
                self.register_category(&Category {
                    title: crate::naming::display_title(&category.parent),
                    slug: category.parent.clone(),
                    parent: String::new(),
                    section: category.section.clone(),
                });
            }
            self.register_category(category);
        }
        self.pages.push(page);
    }

    /// Register a section unless it is empty or already known.
    pub fn register_section(&mut self, section: &Section) {
        if section.is_unsectioned() || self.sections.iter().any(|s| s.slug == section.slug) {
            return;
        }
        self.sections.push(section.clone());
    }

    /// Register a category unless it is empty or already known.
    pub fn register_category(&mut self, category: &Category) {
        if category.is_empty() {
            return;
        }
        let known = self.categories.iter().any(|c| {
            c.slug == category.slug && c.parent == category.parent && c.section == category.section
        });
        if !known {
            self.categories.push(category.clone());
        }
    }

    pub fn extend_pages(&mut self, pages: impl IntoIterator<Item = Page>) {
        self.pages.extend(pages);
    }

    /// Sections in the order navigation should present them.
    ///
    /// Sorted by numeric index; the sort is stable, so sections sharing an
    /// index keep their discovery order.
    pub fn navigation_order(&self) -> Vec<Section> {
        let mut sections = self.sections.clone();
        sections.sort_by_key(|s| s.index);
        sections
    }

    /// Categories that will never appear in navigation because no known
    /// section owns them.
    pub fn orphan_categories(&self) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| {
                c.section.is_empty() || !self.sections.iter().any(|s| s.slug == c.section)
            })
            .collect()
    }

    /// Sections whose slug also turned up under another index, paired with
    /// that index. `1_blog` and `2_blog` share one section; the first index
    /// found wins.
    pub fn index_conflicts(&self) -> Vec<(&Section, u32)> {
        let mut conflicts: Vec<(&Section, u32)> = Vec::new();
        for page in &self.pages {
            let Some(section) = self.sections.iter().find(|s| s.slug == page.section) else {
                continue;
            };
            let known = conflicts
                .iter()
                .any(|(s, index)| s.slug == section.slug && *index == page.nav_index);
            if page.nav_index != section.index && !known {
                conflicts.push((section, page.nav_index));
            }
        }
        conflicts
    }

    /// Fail if two outputs would be written to the same file.
    ///
    /// `others` are `(output_path, source)` pairs for files that are not
    /// pages: copied static files and redirects. Paths are relative to the
    /// output root.
    pub fn check_unique_outputs(&self, others: &[(String, String)]) -> Result<(), SiteError> {
        let pages = self
            .pages
            .iter()
            .map(|page| (page.output_path.as_str(), describe(page)));
        let others = others
            .iter()
            .map(|(path, source)| (path.as_str(), source.clone()));

        let mut seen: HashMap<&str, String> = HashMap::new();
        for (path, source) in pages.chain(others) {
            if let Some(first) = seen.get(path) {
                return Err(SiteError::OutputCollision {
                    path: path.to_string(),
                    first: first.clone(),
                    second: source,
                });
            }
            seen.insert(path, source);
        }
        Ok(())
    }
}

fn describe(page: &Page) -> String {
    if page.source.is_empty() {
        format!("generated page {:?}", page.title)
    } else {
        page.source.clone()
    }
}
