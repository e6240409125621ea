use tracing::{info, warn};

use super::{api::EmployeeSource, ClientResult};
use crate::employees::{dto::EmployeePayload, repo_types::Employee};

pub const PAGE_SIZE: usize = 100;

/// User-entered predicates plus the current page (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Matches `name` (case-insensitive) or `id_user` as text.
    pub name_term: String,
    /// Matches `last_name` or `agency` (case-insensitive).
    pub other_term: String,
    /// Exact agency; empty means any.
    pub agency: String,
    /// Exact status (`SI`/`NO`); empty means any.
    pub status: String,
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            name_term: String::new(),
            other_term: String::new(),
            agency: String::new(),
            status: String::new(),
            page: 1,
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl FilterState {
    /// True when `employee` passes all four predicates.
    pub fn matches(&self, employee: &Employee) -> bool {
        let name_term = self.name_term.trim().to_lowercase();
        let other_term = self.other_term.trim().to_lowercase();

        let name_or_id = name_term.is_empty()
            || contains_ci(&employee.name, &name_term)
            || employee.id_user.to_string().contains(&name_term);
        let last_name_or_agency = other_term.is_empty()
            || contains_ci(&employee.last_name, &other_term)
            || contains_ci(&employee.agency, &other_term);
        let agency = self.agency.is_empty() || employee.agency == self.agency;
        let status = self.status.is_empty() || employee.status == self.status;

        name_or_id && last_name_or_agency && agency && status
    }
}

/// One page of the filtered roster.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterPage<'a> {
    pub items: Vec<&'a Employee>,
    pub total_filtered: usize,
    pub total_pages: usize,
    /// Page actually shown, after clamping.
    pub page: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Filters then slices `employees`, preserving their order. The requested
/// page is clamped to `1..=max(total_pages, 1)`.
pub fn visible<'a>(
    employees: &'a [Employee],
    filters: &FilterState,
    page_size: usize,
) -> RosterPage<'a> {
    let page_size = page_size.max(1);
    let filtered: Vec<&Employee> = employees.iter().filter(|e| filters.matches(e)).collect();

    let total_filtered = filtered.len();
    let total_pages = total_filtered.div_ceil(page_size);
    let page = filters.page.clamp(1, total_pages.max(1));

    let start = ((page - 1) * page_size).min(total_filtered);
    let end = (page * page_size).min(total_filtered);

    RosterPage {
        items: filtered[start..end].to_vec(),
        total_filtered,
        total_pages,
        page,
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}

/// Roster screen state: the fetched list, filters, and load status.
pub struct RosterViewModel<F> {
    source: F,
    employees: Vec<Employee>,
    filters: FilterState,
    page_size: usize,
    loading: bool,
    error: Option<String>,
}

impl<F: EmployeeSource> RosterViewModel<F> {
    pub fn new(source: F) -> Self {
        Self {
            source,
            employees: Vec::new(),
            filters: FilterState::default(),
            page_size: PAGE_SIZE,
            loading: false,
            error: None,
        }
    }

    /// Fetches the whole list once. A failure is kept in `error` until the
    /// next successful load; nothing is retried.
    pub async fn load(&mut self) -> bool {
        self.loading = true;
        let result = self.source.list_employees().await;
        self.loading = false;

        match result {
            Ok(employees) => {
                info!(count = employees.len(), "roster loaded");
                self.employees = employees;
                self.error = None;
                true
            }
            Err(e) => {
                warn!(error = %e, "roster load failed");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Submits a new employee, then reloads the list.
    pub async fn add_employee(&mut self, payload: &EmployeePayload) -> ClientResult<Employee> {
        let created = self.source.create_employee(payload).await?;
        info!(employee_id = created.id, "employee added");
        self.load().await;
        Ok(created)
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page(&self) -> RosterPage<'_> {
        visible(&self.employees, &self.filters, self.page_size)
    }

    pub fn set_name_term(&mut self, term: impl Into<String>) {
        self.filters.name_term = term.into();
        self.filters.page = 1;
    }

    pub fn set_other_term(&mut self, term: impl Into<String>) {
        self.filters.other_term = term.into();
        self.filters.page = 1;
    }

    pub fn set_agency(&mut self, agency: impl Into<String>) {
        self.filters.agency = agency.into();
        self.filters.page = 1;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.filters.status = status.into();
        self.filters.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
    }

    /// No-op on the last page.
    pub fn next_page(&mut self) {
        let current = self.page();
        if current.has_next {
            self.filters.page = current.page + 1;
        }
    }

    /// No-op on the first page.
    pub fn previous_page(&mut self) {
        let current = self.page();
        if current.has_previous {
            self.filters.page = current.page - 1;
        }
    }
}
