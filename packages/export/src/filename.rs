//! Download filenames: `{county}-{entityType}-{kind}-{YYYY-MM-DD}.{ext}`.

use chrono::NaiveDate;
use nc_resilience_county_models::EntityType;

use crate::ExportFormat;

/// Lowercases `name` and collapses every run of non-alphanumeric
/// characters into a single `-`, trimming dashes at either end.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Builds the download filename for an export.
///
/// `kind` names what is exported (e.g. `"impact-report"`, `"rankings"`).
#[must_use]
pub fn export_filename(
    county: &str,
    entity_type: EntityType,
    kind: &str,
    date: NaiveDate,
    format: ExportFormat,
) -> String {
    let county = match slugify(county) {
        s if s.is_empty() => "county".to_string(),
        s => s,
    };
    format!(
        "{county}-{entity_type}-{kind}-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}
