//! Watched targets and their expansion over the look-ahead window.

use crate::error::ValidationError;
use chrono::{Days, NaiveDate};
use reqwest::Url;

/// Placeholder replaced by each date of the look-ahead window.
pub const DATE_PLACEHOLDER: &str = "{date}";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A concrete resource fetched during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Stable name; snapshots are keyed by it.
    pub name: String,
    /// URL requested with a plain GET.
    pub url: String,
}

/// A configured target, possibly templated on the date.
///
/// Parsed from one `TARGET_URLS` entry, either `url` or `name=url`.
///
/// # Examples
///
/// ```rust
/// use padel_watch::sources::TargetSpec;
/// use chrono::NaiveDate;
///
/// let spec = TargetSpec::parse("sessions=https://example.com/slots?date={date}").unwrap();
/// let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
///
/// let targets = spec.expand(&[today]);
/// assert_eq!(targets[0].name, "sessions_2026-10-17");
/// assert_eq!(targets[0].url, "https://example.com/slots?date=2026-10-17");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    name: Option<String>,
    url: String,
}

impl TargetSpec {
    /// Parse a single `TARGET_URLS` entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL.
    pub fn parse(entry: &str) -> Result<Self, ValidationError> {
        let entry = entry.trim();
        let (name, url) = match entry.split_once('=') {
            Some((name, url)) if is_target_name(name) => (Some(name.to_string()), url.trim()),
            _ => (None, entry),
        };

        let sample = url.replace(DATE_PLACEHOLDER, "2000-01-01");
        let parsed = Url::parse(&sample).map_err(|e| {
            ValidationError::invalid_field("TARGET_URLS", format!("'{}': {}", url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::invalid_field(
                "TARGET_URLS",
                format!("'{}': only http and https are supported", url),
            ));
        }

        Ok(Self {
            name,
            url: url.to_string(),
        })
    }

    /// Parse a comma separated list of entries.
    ///
    /// # Errors
    ///
    /// Returns every invalid entry, every pair of entries that can expand to
    /// the same target name, or an error if the list is empty.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, ValidationError> {
        let mut specs: Vec<Self> = Vec::new();
        let mut errors = Vec::new();

        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match Self::parse(entry) {
                Ok(spec) => {
                    if let Some(earlier) = specs.iter().find(|s| s.collides_with(&spec)) {
                        errors.push(ValidationError::invalid_field(
                            "TARGET_URLS",
                            format!(
                                "'{}' and '{}' produce the same target name",
                                earlier.label(),
                                spec.label()
                            ),
                        ));
                    }
                    specs.push(spec);
                }
                Err(e) => errors.push(e),
            }
        }

        if let Some(err) = ValidationError::from_list(errors) {
            return Err(err);
        }
        if specs.is_empty() {
            return Err(ValidationError::invalid_field(
                "TARGET_URLS",
                "must list at least one URL",
            ));
        }
        Ok(specs)
    }

    /// Whether the URL contains the date placeholder.
    pub fn is_dated(&self) -> bool {
        self.url.contains(DATE_PLACEHOLDER)
    }

    /// Display name of the spec itself (the URL when unnamed).
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    /// Target name with the date placeholder left in for dated specs.
    fn name_template(&self) -> String {
        match &self.name {
            Some(name) if self.is_dated() => format!("{}_{}", name, DATE_PLACEHOLDER),
            _ => self.label().to_string(),
        }
    }

    /// Whether some expansion of `self` and some expansion of `other` share
    /// a target name, on any date.
    fn collides_with(&self, other: &Self) -> bool {
        let (ours, theirs) = (self.name_template(), other.name_template());
        match (self.is_dated(), other.is_dated()) {
            (true, false) => template_matches(&ours, &theirs),
            (false, true) => template_matches(&theirs, &ours),
            _ => ours == theirs,
        }
    }

    /// Concrete targets for the given dates.
    ///
    /// Undated specs yield exactly one target regardless of `dates`.
    pub fn expand(&self, dates: &[NaiveDate]) -> Vec<Target> {
        if !self.is_dated() {
            return vec![Target {
                name: self.label().to_string(),
                url: self.url.clone(),
            }];
        }

        dates
            .iter()
            .map(|date| {
                let day = date.format(DATE_FORMAT).to_string();
                let url = self.url.replace(DATE_PLACEHOLDER, &day);
                let name = match &self.name {
                    Some(name) => format!("{}_{}", name, day),
                    None => url.clone(),
                };
                Target { name, url }
            })
            .collect()
    }
}

/// Dates from `today` inclusive, `days` long.
pub fn window(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..u64::from(days))
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .collect()
}

/// Expand every spec over the window starting at `today`.
pub fn expand_all(specs: &[TargetSpec], today: NaiveDate, days: u32) -> Vec<Target> {
    let dates = window(today, days);
    specs.iter().flat_map(|spec| spec.expand(&dates)).collect()
}

/// Whether `candidate` is `template` with its placeholder replaced by some
/// date.
fn template_matches(template: &str, candidate: &str) -> bool {
    let Some((prefix, _)) = template.split_once(DATE_PLACEHOLDER) else {
        return template == candidate;
    };
    candidate
        .strip_prefix(prefix)
        .and_then(|rest| rest.get(..10))
        .and_then(|day| NaiveDate::parse_from_str(day, DATE_FORMAT).ok())
        .is_some_and(|date| {
            let day = date.format(DATE_FORMAT).to_string();
            template.replace(DATE_PLACEHOLDER, &day) == candidate
        })
}

fn is_target_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
