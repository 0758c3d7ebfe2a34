//! Client-side search and pagination for entity tables.

use serde::{Deserialize, Serialize};

use crate::models::{Course, Department, Section, SectionStatus};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

/// Something that can be matched by the search box.
pub trait Searchable {
    /// Text the search term is matched against (case-insensitively).
    fn search_text(&self) -> String;

    fn is_active(&self) -> bool {
        true
    }
}

impl Searchable for Department {
    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.code)
    }
}

impl Searchable for Course {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.code, self.course_type)
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Searchable for Section {
    fn search_text(&self) -> String {
        match &self.academic_session {
            Some(session) => format!("{} {}", self.name, session),
            None => self.name.clone(),
        }
    }

    fn is_active(&self) -> bool {
        self.status == SectionStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub active_only: bool,
    /// 1-based.
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            active_only: false,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Filter by search term and activity, then cut out the requested page.
/// A page past the end is empty but reports correct totals.
pub fn paginate<'a, T: Searchable>(items: &'a [T], query: &ListQuery) -> Page<&'a T> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let matching: Vec<&T> = items
        .iter()
        .filter(|item| !query.active_only || item.is_active())
        .filter(|item| match &needle {
            Some(needle) => item.search_text().to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .collect();

    let per_page = query.per_page.clamp(1, MAX_PER_PAGE);
    let page = query.page.max(1);
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
