// Cross-site overlap: one identity captured on several sites the same day

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{Catalog, FileRecord};
use crate::error::{CapsweepError, Result};
use crate::parse::IdentityParser;

/// Files one site captured on one day.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteGroup {
    pub total_size_mb: f64,
    pub files: Vec<FileRecord>,
}

/// One day with captures from at least two sites.
#[derive(Debug, Clone, Serialize)]
pub struct DayOverlap {
    pub date: NaiveDate,
    pub keep_site: String,
    pub delete_sites: Vec<String>,
    pub sites: BTreeMap<String, SiteGroup>,
}

/// All overlap days for one identity plus the flattened deletion list.
#[derive(Debug, Clone, Serialize)]
pub struct SiteOverlap {
    pub identity: String,
    pub days: Vec<DayOverlap>,
    pub files_to_delete: Vec<String>,
    pub total_savings_mb: f64,
}

/// Find days where an identity was captured on more than one site and
/// suggest keeping the site with the most footage that day. Ties keep the
/// alphabetically first site so reruns agree.
pub fn compare_sites(
    catalog: &Catalog,
    parser: &IdentityParser,
    identity: &str,
) -> Result<SiteOverlap> {
    let bucket = catalog
        .bucket(identity)
        .ok_or_else(|| CapsweepError::IdentityNotFound(identity.to_string()))?;

    // date -> site -> that site's files for the day
    let mut by_day: BTreeMap<NaiveDate, BTreeMap<String, SiteGroup>> = BTreeMap::new();
    for file in &bucket.files {
        let Some(parsed) = parser.parse(&file.name) else {
            continue;
        };
        let group = by_day
            .entry(parsed.timestamp.date_naive())
            .or_default()
            .entry(parsed.site)
            .or_default();
        group.total_size_mb += file.size_mb;
        group.files.push(file.clone());
    }

    let mut days = Vec::new();
    let mut files_to_delete = Vec::new();
    let mut total_savings_mb = 0.0;

    for (date, sites) in by_day {
        if sites.len() < 2 {
            continue;
        }

        // Strict > over the sorted map keeps the first site on ties
        let mut keep_site = String::new();
        let mut keep_size = f64::MIN;
        for (site, group) in &sites {
            if group.total_size_mb > keep_size {
                keep_site = site.clone();
                keep_size = group.total_size_mb;
            }
        }

        let mut delete_sites = Vec::new();
        for (site, group) in &sites {
            if *site == keep_site {
                continue;
            }
            delete_sites.push(site.clone());
            for file in &group.files {
                files_to_delete.push(file.name.clone());
                total_savings_mb += file.size_mb;
            }
        }

        days.push(DayOverlap {
            date,
            keep_site,
            delete_sites,
            sites,
        });
    }

    Ok(SiteOverlap {
        identity: identity.to_string(),
        days,
        files_to_delete,
        total_savings_mb,
    })
}
