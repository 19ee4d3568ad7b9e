//! Catalog fetch from `ISteamWebAPIUtil/GetSupportedAPIList`.
//!
//! Every invocation re-fetches; nothing is cached between runs.

use reqwest::blocking::Client;

use crate::args::Arguments;
use crate::catalog::{parse_catalog, Catalog};
use crate::dispatch::{ensure_success, send, ApiRequest, RequestContext};
use crate::error::Error;

pub const DISCOVERY_INTERFACE: &str = "ISteamWebAPIUtil";
pub const DISCOVERY_METHOD: &str = "GetSupportedAPIList";

/// URL of the discovery endpoint, including `key` (when present) and `format=json`.
pub fn discovery_url(ctx: &RequestContext) -> String {
    let mut query = Arguments::new();
    ctx.finish_arguments(&mut query);
    format!(
        "{}/{DISCOVERY_INTERFACE}/{DISCOVERY_METHOD}/v0001/?{}",
        ctx.base_url,
        query.to_query_string()
    )
}

/// Fetch and parse the API catalog.
///
/// The catalog differs with and without a credential: keyed requests also
/// list the publisher-only interfaces.
pub fn fetch_catalog(client: &Client, ctx: &RequestContext) -> Result<Catalog, Error> {
    let url = discovery_url(ctx);
    let (status, body) = send(client, ctx, ApiRequest::Get { url })?;
    let body = ensure_success(status, body)?;
    let catalog = parse_catalog(&body)?;
    tracing::debug!(
        interfaces = catalog.interfaces.len(),
        keyed = ctx.credential.is_some(),
        "fetched API catalog"
    );
    Ok(catalog)
}
