//! Offset pagination primitives for list endpoints.
//!
//! A [`PageRequest`] is a validated `skip`/`limit` window. Both bounds are
//! non-negative and always explicit: a `limit` of zero selects no rows rather
//! than meaning "unbounded". Adapters bind the values as statement parameters
//! and never interpolate them into query text.

/// Number of rows returned when the caller does not supply `limit`.
pub const DEFAULT_LIMIT: i64 = 100;

/// Query parameter carrying the number of rows to skip.
pub const SKIP_PARAM: &str = "skip";

/// Query parameter carrying the maximum number of rows to return.
pub const LIMIT_PARAM: &str = "limit";

/// Errors raised while validating pagination bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The parameter is not an integer.
    #[error("{param} must be an integer, got `{value}`")]
    NotAnInteger {
        /// Name of the offending parameter.
        param: &'static str,
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The parameter is an integer below zero.
    #[error("{param} must not be negative, got {value}")]
    Negative {
        /// Name of the offending parameter.
        param: &'static str,
        /// Parsed value supplied by the caller.
        value: i64,
    },
}

impl PageRequestError {
    /// Name of the parameter that failed validation.
    #[must_use]
    pub const fn param(&self) -> &'static str {
        match self {
            Self::NotAnInteger { param, .. } | Self::Negative { param, .. } => *param,
        }
    }
}

/// Validated offset window over an ordered result set.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let page = PageRequest::from_query(Some("10"), None).expect("valid bounds");
/// assert_eq!(page.skip(), 10);
/// assert_eq!(page.limit(), pagination::DEFAULT_LIMIT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    skip: i64,
    limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a window from already-parsed bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::Negative`] when either bound is below zero.
    pub const fn new(skip: i64, limit: i64) -> Result<Self, PageRequestError> {
        if skip < 0 {
            return Err(PageRequestError::Negative {
                param: SKIP_PARAM,
                value: skip,
            });
        }
        if limit < 0 {
            return Err(PageRequestError::Negative {
                param: LIMIT_PARAM,
                value: limit,
            });
        }
        Ok(Self { skip, limit })
    }

    /// Build a window from raw query-string values.
    ///
    /// Missing values fall back to `skip = 0` and `limit = DEFAULT_LIMIT`.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when a value is not an integer or is
    /// negative.
    pub fn from_query(skip: Option<&str>, limit: Option<&str>) -> Result<Self, PageRequestError> {
        let skip_value = parse_bound(SKIP_PARAM, skip, 0)?;
        let limit_value = parse_bound(LIMIT_PARAM, limit, DEFAULT_LIMIT)?;
        Self::new(skip_value, limit_value)
    }

    /// Number of leading rows to skip.
    #[must_use]
    pub const fn skip(&self) -> i64 {
        self.skip
    }

    /// Maximum number of rows to return.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Apply the window to an already ordered sequence.
    ///
    /// Used by in-process adapters that hold rows in memory.
    pub fn window<I>(&self, items: I) -> Vec<I::Item>
    where
        I: IntoIterator,
    {
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(limit).collect()
    }
}

fn parse_bound(
    param: &'static str,
    raw: Option<&str>,
    default: i64,
) -> Result<i64, PageRequestError> {
    let Some(text) = raw.map(str::trim) else {
        return Ok(default);
    };
    text.parse::<i64>()
        .map_err(|_| PageRequestError::NotAnInteger {
            param,
            value: text.to_owned(),
        })
}
