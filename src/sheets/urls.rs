// src/sheets/urls.rs
use tracing::warn;
use url::{Url, form_urlencoded};

use crate::config::consts::{DEFAULT_GID, SHEETS_BASE};
use crate::config::options::SheetOptions;

fn encode(v: &str) -> String {
    form_urlencoded::byte_serialize(v.as_bytes()).collect()
}

/// "Query" export: honours the sheet's header row and is usually the freshest.
pub fn gviz_csv_url(file_id: &str, gid: &str) -> String {
    format!("{SHEETS_BASE}/{file_id}/gviz/tq?gid={}&headers=1&tqx=out:csv", encode(gid))
}

pub fn export_csv_url(file_id: &str, gid: &str) -> String {
    format!("{SHEETS_BASE}/{file_id}/export?format=csv&id={file_id}&gid={}", encode(gid))
}

/// Turn a `.../d/e/<pubId>/pubhtml?gid=N` link into its CSV twin.
///
/// Returns `None` (with a warning) when the link does not parse or has no
/// `/e/<pubId>` segment.
pub fn pub_csv_url(pubhtml_url: &str) -> Option<String> {
    let u = match Url::parse(pubhtml_url) {
        Ok(u) => u,
        Err(e) => {
            warn!(url = pubhtml_url, error = %e, "invalid pub URL");
            return None;
        }
    };

    let gid = u
        .query_pairs()
        .find(|(k, _)| k == "gid")
        .map(|(_, v)| v.into_owned())
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| s!(DEFAULT_GID));

    let parts: Vec<&str> = u.path().split('/').collect();
    let Some(e_idx) = parts.iter().position(|p| *p == "e") else {
        warn!(url = pubhtml_url, "pub URL has no /e/<id> segment");
        return None;
    };
    let id = parts.get(e_idx + 1).copied().unwrap_or("");
    let prefix = parts[..=e_idx].join("/");

    let host = u.host_str()?;
    let port = u.port().map(|p| format!(":{p}")).unwrap_or_default();

    Some(format!(
        "{}://{host}{port}{prefix}/{id}/pub?gid={}&single=true&output=csv",
        u.scheme(),
        encode(&gid)
    ))
}

/// Candidate sources in priority order: explicit URL, gviz, pub, export.
///
/// Slots that cannot be built from `opts` are `None` so the order stays visible
/// in logs.
pub fn candidate_sources(opts: &SheetOptions) -> Vec<Option<String>> {
    let gid = opts.gid.as_deref().unwrap_or(DEFAULT_GID);
    let id = opts.file_id.as_deref().filter(|id| !id.trim().is_empty());

    vec![
        opts.csv_url.clone().filter(|u| !u.trim().is_empty()),
        id.map(|id| gviz_csv_url(id, gid)),
        opts.pub_url.as_deref().and_then(pub_csv_url),
        id.map(|id| export_csv_url(id, gid)),
    ]
}
