//! Query parameters for collection list endpoints.
//!
//! The backend follows Strapi's bracketed query syntax, e.g.
//! `filters[status][$eq]=published&pagination[page]=2&sort=createdAt:desc`.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub populate: Option<String>,
    pub sort: Option<String>,
    pub filters: Vec<(String, String)>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn populate(mut self, populate: impl Into<String>) -> Self {
        self.populate = Some(populate.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Add an equality filter on `field`
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }

    /// Render as query pairs; reqwest takes care of percent-encoding.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref populate) = self.populate {
            query.push(("populate".to_string(), populate.clone()));
        }
        if let Some(ref sort) = self.sort {
            query.push(("sort".to_string(), sort.clone()));
        }
        for (field, value) in &self.filters {
            query.push((format!("filters[{}][$eq]", field), value.clone()));
        }
        if let Some(page) = self.page {
            query.push(("pagination[page]".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("pagination[pageSize]".to_string(), page_size.to_string()));
        }
        query
    }
}
