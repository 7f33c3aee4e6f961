//! npm registry, downloads and npms.io response types
//!
//! Raw documents mirror what the services return; the reshaped types are
//! what the client hands back to callers.

use std::collections::{BTreeMap, HashMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};


/// Full package document from the registry (`GET /{name}`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageDocument {
    /// Package name
    pub name: String,
    /// Package description
    pub description: Option<String>,
    /// README of the latest version
    pub readme: Option<String>,
    /// Maintainers with publish rights
    #[serde(default)]
    pub maintainers: Vec<Person>,
    /// Package author
    pub author: Option<Person>,
    /// Keywords
    #[serde(default)]
    pub keywords: Vec<String>,
    /// License, a SPDX string or a legacy object
    pub license: Option<Value>,
    /// Distribution tags
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: HashMap<String, String>,
    /// Publish times keyed by version, plus `created` and `modified`
    #[serde(default)]
    pub time: BTreeMap<String, Value>,
}

/// A person as the registry records it: a bare string or an object
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Person {
    /// `"Name <email> (url)"`
    Simple(String),
    /// Structured form
    Detailed {
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

/// Package summary returned by [`crate::RegistryClient::get_package`]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub name: String,
    pub description: Option<String>,
    pub readme: Option<String>,
    pub maintainers: Vec<Person>,
    pub author: Option<Person>,
    pub keywords: Vec<String>,
    pub license: Option<Value>,
    /// Publish time of every version (`created` and `modified` removed)
    pub time: BTreeMap<String, String>,
    /// When the package was first created
    pub created_time: Option<String>,
    /// Latest publish time per major version
    pub published_time: BTreeMap<String, String>,
    /// Version tagged `latest`
    pub latest: Option<String>,
}

impl From<PackageDocument> for PackageInfo {
    fn from(document: PackageDocument) -> Self {
        let mut time: BTreeMap<String, String> = document
            .time
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(date) => Some((key, date)),
                _ => None,
            })
            .collect();
        time.remove("modified");
        let created_time = time.remove("created");
        let published_time = published_time_by_major(&time);

        Self {
            name: document.name,
            description: document.description,
            readme: document.readme,
            maintainers: document.maintainers,
            author: document.author,
            keywords: document.keywords,
            license: document.license,
            time,
            created_time,
            published_time,
            latest: document.dist_tags.get("latest").cloned(),
        }
    }
}

/// Latest publish timestamp for every major version.
///
/// The major is the text before the first `.`; ISO-8601 timestamps compare
/// correctly as strings.
pub fn published_time_by_major(time: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut result: BTreeMap<String, String> = BTreeMap::new();
    for (version, date) in time {
        let major = version.split('.').next().unwrap_or(version);
        match result.get_mut(major) {
            Some(latest) if latest.as_str() >= date.as_str() => {}
            Some(latest) => *latest = date.clone(),
            None => {
                result.insert(major.to_string(), date.clone());
            }
        }
    }
    result
}

/// Registry user document (`GET /-/user/org.couchdb.user:{name}`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserProfile {
    /// User name
    pub name: String,
    /// Public email, when the user exposes one
    pub email: Option<String>,
    /// Remaining CouchDB fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the downloads range endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadsRange {
    pub start: Option<String>,
    pub end: Option<String>,
    pub package: Option<String>,
    /// Daily counts, oldest first
    #[serde(default)]
    pub downloads: Vec<DayDownloads>,
}

/// Download count for one day
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DayDownloads {
    /// Day as `YYYY-MM-DD`
    pub day: String,
    /// Number of downloads that day
    pub downloads: u64,
}

/// Names in the registry's daily update listing.
///
/// The document is either an array of entries or an object keyed by name;
/// entries without a string `name` are skipped.
pub fn update_names(document: &Value) -> Vec<String> {
    let entries: Box<dyn Iterator<Item = &Value>> = match document {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(items) => Box::new(items.values()),
        _ => Box::new(std::iter::empty()),
    };

    entries
        .filter_map(|entry| entry.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// CouchDB view response for `dependedUpon`
#[derive(Debug, Clone, Deserialize)]
pub struct DependedView {
    #[serde(default)]
    pub rows: Vec<DependedRow>,
}

/// One row of the `dependedUpon` view
#[derive(Debug, Clone, Deserialize)]
pub struct DependedRow {
    /// Group key; the first element is the package name
    pub key: Vec<Value>,
    /// Number of dependents
    pub value: u64,
}

/// How many packages depend on `name`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DependedCount {
    pub name: String,
    pub count: u64,
}

impl DependedView {
    /// Trimmed, non-blank names with their counts, in view order
    pub fn into_counts(self) -> Vec<DependedCount> {
        self.rows
            .into_iter()
            .filter_map(|row| {
                let name = row.key.first()?.as_str()?.trim();
                if name.is_empty() {
                    return None;
                }
                Some(DependedCount {
                    name: name.to_string(),
                    count: row.value,
                })
            })
            .collect()
    }
}

/// npms.io package response; only the score is used
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponse {
    pub score: Option<RawScore>,
}

/// Score block as npms.io returns it
#[derive(Debug, Clone, Deserialize)]
pub struct RawScore {
    #[serde(rename = "final")]
    pub final_score: f64,
    #[serde(default)]
    pub detail: BTreeMap<String, f64>,
}

/// Package score, every value rounded to three decimals
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Score {
    #[serde(rename = "final")]
    pub final_score: f64,
    /// `quality`, `popularity`, `maintenance`
    #[serde(flatten)]
    pub detail: BTreeMap<String, f64>,
}

const SCORE_PRECISION: i32 = 3;

impl From<RawScore> for Score {
    fn from(raw: RawScore) -> Self {
        Self {
            final_score: round_to(raw.final_score, SCORE_PRECISION),
            detail: raw
                .detail
                .into_iter()
                .map(|(key, value)| (key, round_to(value, SCORE_PRECISION)))
                .collect(),
        }
    }
}

fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests;
