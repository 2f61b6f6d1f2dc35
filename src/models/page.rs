use serde::Serialize;

pub const PAGE_SIZE: i64 = 12;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Malformed page numbers resolve to the first page and out-of-range
    /// ones to the last.
    pub fn resolve(requested: Option<&str>, total: i64) -> Self {
        let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
        let page = requested
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(|p| p.clamp(1, total_pages))
            .unwrap_or(1);

        Self {
            page,
            total_pages,
            limit: PAGE_SIZE,
            offset: (page - 1) * PAGE_SIZE,
        }
    }

    pub fn wrap<T>(self, items: Vec<T>, total: i64) -> Page<T> {
        Page {
            items,
            page: self.page,
            total_pages: self.total_pages,
            total,
        }
    }
}
