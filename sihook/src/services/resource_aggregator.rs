//! Summary flags derived from a dataset's resources

use serde_json::Value;
use std::collections::BTreeSet;
use tracing::info;

use crate::models::{LicenseOpenness, Resource};

/// Long-form format URIs reduced to their trailing code
const FORMAT_URI_PREFIXES: [&str; 6] = [
    "http://www.iana.org/assignments/media-types/",
    "https://www.iana.org/assignments/media-types/",
    "http://publications.europa.eu/resource/authority/file-type/",
    "https://publications.europa.eu/resource/authority/file-type/",
    "http://publications.europa.eu/mdr/resource/authority/file-type/",
    "https://publications.europa.eu/mdr/resource/authority/file-type/",
];

/// Strip known URI prefixes from resource formats, in place
///
/// `http://publications.europa.eu/resource/authority/file-type/CSV` and
/// `CSV` become search-equivalent. Absent or empty formats are untouched.
pub fn shorten_resource_formats(resources: &mut [Resource]) {
    for resource in resources.iter_mut() {
        let Some(format) = resource.format().filter(|f| !f.is_empty()) else {
            continue;
        };

        let mut shortened = format;
        for prefix in FORMAT_URI_PREFIXES {
            if let Some(rest) = shortened.strip_prefix(prefix) {
                shortened = rest;
            }
        }

        if shortened.len() != format.len() {
            let shortened = shortened.to_string();
            resource.set_format(shortened);
        }
    }
}

/// Unique license ids across all resources, sorted
pub fn aggregate_licenses(resources: &[Resource]) -> Vec<String> {
    resources
        .iter()
        .filter_map(Resource::license)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `(has_open, has_closed)` over resources with a known license
pub fn aggregate_openness(resources: &[Resource], openness: &LicenseOpenness) -> (bool, bool) {
    let mut has_open = false;
    let mut has_closed = false;

    for is_open in resources
        .iter()
        .filter_map(Resource::license)
        .filter_map(|license| openness.get(license))
    {
        has_open |= is_open;
        has_closed |= !is_open;
    }

    (has_open, has_closed)
}

/// `(has_access_url, has_formats)`
///
/// A plain `url` only counts as access URL when no distinct download URL
/// is given.
pub fn aggregate_quality_metrics(resources: &[Resource]) -> (bool, bool) {
    let has_access_url = resources.iter().any(|resource| {
        resource.access_url().is_some()
            || resource.url().is_some_and(|url| match resource.download_url() {
                None => true,
                Some(download_url) => download_url != url,
            })
    });
    let has_formats = resources.iter().any(Resource::has_format);

    (has_access_url, has_formats)
}

/// Whether any resource lists at least one access service
///
/// Malformed lists are logged and treated as empty.
pub fn aggregate_access_service(resources: &[Resource]) -> bool {
    resources.iter().any(|resource| match resource.access_services() {
        Some(Value::String(raw)) if !raw.is_empty() => {
            match serde_json::from_str::<Vec<Value>>(raw) {
                Ok(services) => !services.is_empty(),
                Err(e) => {
                    info!(value = %raw, error = %e, "Invalid access_services list in resource");
                    false
                }
            }
        }
        Some(Value::Array(services)) => !services.is_empty(),
        _ => false,
    })
}
