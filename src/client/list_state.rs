use std::collections::HashSet;

use uuid::Uuid;

use super::{ClientResult, ListPage, PackagingApi, PackagingQuery};
use crate::{
    db::entities::types::PackagingStatus,
    response::Pagination,
    services::{
        validation::{DEFAULT_LIMIT, MAX_LIMIT},
        views::PackagingView,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusTab {
    #[default]
    All,
    Active,
    Inactive,
    Draft,
}

impl StatusTab {
    pub fn status(self) -> Option<PackagingStatus> {
        match self {
            StatusTab::All => None,
            StatusTab::Active => Some(PackagingStatus::Active),
            StatusTab::Inactive => Some(PackagingStatus::Inactive),
            StatusTab::Draft => Some(PackagingStatus::Draft),
        }
    }
}

/// Filter, search and paging state of the packaging list, plus which rows
/// the user has expanded. Expansion never reaches the server.
#[derive(Debug, Clone)]
pub struct PackagingListState {
    tab: StatusTab,
    search: String,
    page: u64,
    limit: u64,
    current: Option<ListPage<PackagingView>>,
    expanded: HashSet<Uuid>,
    stale: bool,
}

impl Default for PackagingListState {
    fn default() -> Self {
        Self {
            tab: StatusTab::default(),
            search: String::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
            current: None,
            expanded: HashSet::new(),
            stale: true,
        }
    }
}

impl PackagingListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> StatusTab {
        self.tab
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn needs_refresh(&self) -> bool {
        self.stale
    }

    pub fn set_tab(&mut self, tab: StatusTab) {
        if self.tab != tab {
            self.tab = tab;
            self.reset_paging();
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.search != search {
            self.search = search;
            self.reset_paging();
        }
    }

    pub fn clear_filters(&mut self) {
        self.tab = StatusTab::All;
        self.search.clear();
        self.reset_paging();
    }

    /// Pages below 1 are clamped to 1.
    pub fn set_page(&mut self, page: u64) {
        let page = page.max(1);
        if self.page != page {
            self.page = page;
            self.stale = true;
        }
    }

    /// Clamped to what the server accepts, 1 to [`MAX_LIMIT`].
    pub fn set_limit(&mut self, limit: u64) {
        let limit = limit.clamp(1, MAX_LIMIT);
        if self.limit != limit {
            self.limit = limit;
            self.reset_paging();
        }
    }

    /// Parameters for the next list request.
    pub fn query(&self) -> PackagingQuery {
        let search = self.search.trim();
        PackagingQuery {
            status: self.tab.status(),
            search: (!search.is_empty()).then(|| search.to_string()),
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn rows(&self) -> &[PackagingView] {
        self.current
            .as_ref()
            .map(|page| page.data.as_slice())
            .unwrap_or_default()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.current.as_ref().map(|page| page.pagination)
    }

    pub fn toggle_row(&mut self, id: Uuid) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded.contains(&id)
    }

    /// Fetches the page described by [`PackagingListState::query`]. On
    /// failure the previously shown page stays.
    pub async fn refresh<A: PackagingApi + ?Sized>(&mut self, api: &A) -> ClientResult<()> {
        let page = api.list_packaging(&self.query()).await?;
        self.current = Some(page);
        self.stale = false;
        Ok(())
    }

    fn reset_paging(&mut self) {
        self.page = 1;
        self.stale = true;
    }
}
