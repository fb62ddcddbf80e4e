//! crates/field_service_core/src/query.rs
//!
//! Search and pagination over a store snapshot, for list views.

use crate::domain::{Client, Incident, Intervention, Product, Report, User};

/// Text a list view's search box matches against.
pub trait Searchable {
    fn search_text(&self) -> String;
}

impl Searchable for Incident {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.client, self.produit, self.description)
    }
}

impl Searchable for Intervention {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.technicien, self.description, self.client_id)
    }
}

impl Searchable for Report {
    fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.client, self.intervenant, self.kind, self.description
        )
    }
}

impl Searchable for User {
    fn search_text(&self) -> String {
        format!("{} {} {} {}", self.prenom, self.nom, self.email, self.role)
    }
}

impl Searchable for Client {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.nom, self.email, self.adresse)
    }
}

impl Searchable for Product {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.nom, self.reference, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            per_page: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    /// Matches across all pages.
    pub total: usize,
    pub total_pages: usize,
}

impl ListQuery {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub fn apply<T: Searchable>(&self, items: Vec<T>) -> Page<T> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let matching: Vec<T> = match needle {
            Some(needle) => items
                .into_iter()
                .filter(|item| item.search_text().to_lowercase().contains(&needle))
                .collect(),
            None => items,
        };

        let per_page = self.per_page.max(1);
        let page = self.page.max(1);
        let total = matching.len();
        let total_pages = total.div_ceil(per_page);
        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Page {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }
}
