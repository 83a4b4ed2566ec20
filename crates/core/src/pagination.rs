//! Collection paging: query-parameter parsing and list metadata.

use crate::reply::ListMetadata;
use crate::request::InboundRequest;
use crate::schema::FieldError;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_PAGE_SIZE: u64 = 10;

/// Requested page window, parsed from `page` / `pageSize` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Parse from the request's query string. Missing parameters take the
    /// defaults (page 1, size 10); present parameters must be positive
    /// integers.
    pub fn from_request(request: &InboundRequest) -> Result<Self, Vec<FieldError>> {
        let mut issues = Vec::new();

        let page = parse_positive(request.query("page"), DEFAULT_PAGE)
            .map_err(|message| {
                issues.push(FieldError {
                    field: "page".to_string(),
                    message,
                })
            })
            .unwrap_or(DEFAULT_PAGE);

        let page_size = parse_positive(request.query("pageSize"), DEFAULT_PAGE_SIZE)
            .map_err(|message| {
                issues.push(FieldError {
                    field: "pageSize".to_string(),
                    message,
                })
            })
            .unwrap_or(DEFAULT_PAGE_SIZE);

        if issues.is_empty() {
            Ok(Self { page, page_size })
        } else {
            Err(issues)
        }
    }

    /// Saturating: absurdly large page numbers clamp to the end of the
    /// range instead of overflowing.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Metadata for a collection of `total` items under this window.
    pub fn metadata(&self, total: u64) -> ListMetadata {
        ListMetadata {
            total,
            current_page: self.page,
            total_pages: total.div_ceil(self.page_size),
            page_size: self.page_size,
        }
    }
}

fn parse_positive(raw: Option<&str>, default: u64) -> Result<u64, String> {
    match raw {
        None => Ok(default),
        Some(raw) => match raw.parse::<u64>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err("Must be a positive integer".to_string()),
        },
    }
}
