use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::Session;

/// Snapshot search endpoint of the Wikimedia Enterprise API
const SNAPSHOTS_URL: &str = "https://api.enterprise.wikimedia.com/v2/snapshots";

#[derive(Serialize)]
struct SnapshotQuery<'a> {
    filters: Vec<FieldFilter<'a>>,
    fields: Vec<&'a str>,
}

#[derive(Serialize)]
struct FieldFilter<'a> {
    field: &'a str,
    value: &'a str,
}

/// One namespace's snapshot: the snapshot identifier and its ordered chunks
#[derive(Debug, Clone, Deserialize)]
pub struct NamespaceSnapshot {
    pub identifier: String,
    #[serde(default)]
    pub chunks: Vec<String>,
    pub namespace: Namespace,
}

/// Wikimedia namespace descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct Namespace {
    pub identifier: i64,
    pub name: String,
}

/// Fetch every namespace snapshot the service lists for a project.
/// The list is returned unfiltered and in service order; restricting it to
/// selected namespaces is the pipeline driver's job.
pub fn discover_namespaces(session: &Session, project: &str) -> Result<Vec<NamespaceSnapshot>> {
    discover_namespaces_at(session, SNAPSHOTS_URL, project)
}

pub(crate) fn discover_namespaces_at(
    session: &Session,
    url: &str,
    project: &str,
) -> Result<Vec<NamespaceSnapshot>> {
    let query = SnapshotQuery {
        filters: vec![FieldFilter {
            field: "is_part_of.identifier",
            value: project,
        }],
        fields: vec![
            "identifier",
            "chunks",
            "namespace",
            "namespace.name",
            "namespace.identifier",
        ],
    };

    let response = session.client().post(url).json(&query).send()?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        println!("{}", body);
        return Err(Error::Discovery { status, body });
    }

    Ok(response.json()?)
}
