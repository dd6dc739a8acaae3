// src/domain/contract_list.rs

//! View-model behind the contract table.
//!
//! Everything here is a pure function of the contract snapshot and a
//! [`ViewState`]. The view state travels in the dashboard's query string, so
//! every link on the page is just "the current state with one change".

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::contract::{Contract, ContractStatus};

/// Rows shown per page.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ContractStatus),
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(s) => s.as_str(),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "all" {
            return Some(StatusFilter::All);
        }
        ContractStatus::parse(raw).map(StatusFilter::Only)
    }

    pub fn admits(self, status: ContractStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl From<StatusFilter> for String {
    fn from(f: StatusFilter) -> Self {
        f.as_str().to_string()
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        StatusFilter::parse(&raw).ok_or_else(|| format!("unknown status filter: {raw}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Contract attribute the table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    CampaignName,
    InfluencerName,
    InfluencerEmail,
    BrandName,
    Commission,
    #[default]
    StartDate,
    EndDate,
    Status,
    TotalSales,
    TotalCommission,
    LastPayout,
    MaxBudget,
}

impl SortField {
    pub const ALL: [SortField; 13] = [
        SortField::Id,
        SortField::CampaignName,
        SortField::InfluencerName,
        SortField::InfluencerEmail,
        SortField::BrandName,
        SortField::Commission,
        SortField::StartDate,
        SortField::EndDate,
        SortField::Status,
        SortField::TotalSales,
        SortField::TotalCommission,
        SortField::LastPayout,
        SortField::MaxBudget,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::CampaignName => "campaign_name",
            SortField::InfluencerName => "influencer_name",
            SortField::InfluencerEmail => "influencer_email",
            SortField::BrandName => "brand_name",
            SortField::Commission => "commission",
            SortField::StartDate => "start_date",
            SortField::EndDate => "end_date",
            SortField::Status => "status",
            SortField::TotalSales => "total_sales",
            SortField::TotalCommission => "total_commission",
            SortField::LastPayout => "last_payout",
            SortField::MaxBudget => "max_budget",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == raw)
    }

    /// Extracts the comparable value for this field.
    ///
    /// Missing dates become epoch zero and missing numbers become 0, so on an
    /// ascending sort "no value" ranks before every real value.
    pub fn key(self, c: &Contract) -> SortKey {
        match self {
            SortField::StartDate => SortKey::Instant(epoch_millis(Some(c.start_date))),
            SortField::EndDate => SortKey::Instant(epoch_millis(Some(c.end_date))),
            SortField::LastPayout => SortKey::Instant(epoch_millis(c.last_payout)),

            SortField::Commission => SortKey::Number(c.commission),
            SortField::TotalSales => SortKey::Number(c.total_sales.unwrap_or(0.0)),
            SortField::TotalCommission => SortKey::Number(c.total_commission.unwrap_or(0.0)),
            SortField::MaxBudget => SortKey::Number(c.max_budget.unwrap_or(0.0)),

            SortField::Id => SortKey::Text(c.id.clone()),
            SortField::CampaignName => SortKey::Text(c.campaign_name.clone()),
            SortField::InfluencerName => SortKey::Text(c.influencer_name.clone()),
            SortField::InfluencerEmail => SortKey::Text(c.influencer_email.clone()),
            SortField::BrandName => SortKey::Text(c.brand_name.clone().unwrap_or_default()),
            SortField::Status => SortKey::Text(c.status.as_str().to_string()),
        }
    }
}

fn epoch_millis(date: Option<chrono::NaiveDate>) -> i64 {
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Comparable value of one contract attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Instant(i64),
    Number(f64),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Instant(a), SortKey::Instant(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Text(a), SortKey::Text(b)) => collate(a, b),
            _ => Ordering::Equal,
        }
    }
}

/// Locale-like text ordering: letters compare case-insensitively first, and
/// on a tie the lowercase spelling goes first ("apple" < "Apple" < "banana").
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// UI state of one contract table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortField,
    pub dir: SortDirection,
    /// 1-based; not clamped here.
    pub page: usize,
    pub expanded: Option<String>,
    pub selected: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            sort: SortField::StartDate,
            dir: SortDirection::Desc,
            page: 1,
            expanded: None,
            selected: None,
        }
    }
}

impl ViewState {
    /// Reads the state from a query string. Unknown keys are ignored and
    /// unparsable values keep their defaults.
    pub fn from_query(query: &str) -> Self {
        let mut state = ViewState::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "q" => state.search = value.into_owned(),
                "status" => {
                    if let Some(f) = StatusFilter::parse(&value) {
                        state.status = f;
                    }
                }
                "sort" => {
                    if let Some(f) = SortField::parse(&value) {
                        state.sort = f;
                    }
                }
                "dir" => {
                    if let Some(d) = SortDirection::parse(&value) {
                        state.dir = d;
                    }
                }
                "page" => {
                    if let Ok(p) = value.trim().parse::<usize>() {
                        state.page = p;
                    }
                }
                "expanded" if !value.is_empty() => state.expanded = Some(value.into_owned()),
                "selected" if !value.is_empty() => state.selected = Some(value.into_owned()),
                _ => {}
            }
        }

        state
    }

    /// Inverse of [`ViewState::from_query`]; default values are left out.
    pub fn to_query(&self) -> String {
        let defaults = ViewState::default();
        let mut out = url::form_urlencoded::Serializer::new(String::new());

        if !self.search.is_empty() {
            out.append_pair("q", &self.search);
        }
        if self.status != defaults.status {
            out.append_pair("status", self.status.as_str());
        }
        if self.sort != defaults.sort {
            out.append_pair("sort", self.sort.as_str());
        }
        if self.dir != defaults.dir {
            out.append_pair("dir", self.dir.as_str());
        }
        if self.page != defaults.page {
            out.append_pair("page", &self.page.to_string());
        }
        if let Some(id) = &self.expanded {
            out.append_pair("expanded", id);
        }
        if let Some(id) = &self.selected {
            out.append_pair("selected", id);
        }

        out.finish()
    }

    /// Copy of the state with one change applied. Used to build links.
    pub fn with(&self, change: impl FnOnce(&mut ViewState)) -> ViewState {
        let mut next = self.clone();
        change(&mut next);
        next
    }

    /// Clicking a column header: the active column flips direction, any other
    /// column becomes active in ascending order.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort == field {
            self.dir = self.dir.flipped();
        } else {
            self.sort = field;
            self.dir = SortDirection::Asc;
        }
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = self.page.saturating_add(1).min(total_pages).max(1);
    }
}

/// Search/status predicate. Search is an unanchored, case-insensitive
/// substring match over campaign, influencer name and influencer email.
pub fn matches(contract: &Contract, status: StatusFilter, search: &str) -> bool {
    if !status.admits(contract.status) {
        return false;
    }
    if search.is_empty() {
        return true;
    }

    let needle = search.to_lowercase();
    [
        &contract.campaign_name,
        &contract.influencer_name,
        &contract.influencer_email,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_contracts<'a, I>(contracts: I, status: StatusFilter, search: &str) -> Vec<&'a Contract>
where
    I: IntoIterator<Item = &'a Contract>,
{
    contracts
        .into_iter()
        .filter(|c| matches(c, status, search))
        .collect()
}

pub fn sort_contracts(rows: &mut [&Contract], field: SortField, dir: SortDirection) {
    rows.sort_by(|a, b| {
        let ord = field.key(a).compare(&field.key(b));
        match dir {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Rows `[(page-1)*PAGE_SIZE, page*PAGE_SIZE)`. Pages outside `1..=total`
/// give an empty slice.
pub fn paginate<T>(rows: &[T], page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(PAGE_SIZE);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(PAGE_SIZE).min(rows.len());
    &rows[start..end]
}

/// Filtered and sorted rows, before pagination.
pub fn ordered_rows<'a>(contracts: &'a [Contract], state: &ViewState) -> Vec<&'a Contract> {
    let mut rows = filter_contracts(contracts, state.status, &state.search);
    sort_contracts(&mut rows, state.sort, state.dir);
    rows
}

/// What the table renders for one request.
#[derive(Debug, Clone)]
pub struct ContractPage<'a> {
    pub rows: Vec<&'a Contract>,
    pub filtered_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub expanded: Option<&'a Contract>,
    /// Resolved against the whole collection, not just the visible page.
    pub selected: Option<&'a Contract>,
}

impl ContractPage<'_> {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.is_some_and(|c| c.id == id)
    }
}

pub fn derive<'a>(contracts: &'a [Contract], state: &ViewState) -> ContractPage<'a> {
    let ordered = ordered_rows(contracts, state);
    let filtered_count = ordered.len();
    let find = |id: &Option<String>| {
        id.as_deref()
            .and_then(|id| contracts.iter().find(|c| c.id == id))
    };

    ContractPage {
        rows: paginate(&ordered, state.page).to_vec(),
        filtered_count,
        total_pages: total_pages(filtered_count),
        page: state.page,
        expanded: find(&state.expanded),
        selected: find(&state.selected),
    }
}
