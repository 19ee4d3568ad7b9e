//! Arguments → HTTP request dispatch
//!
//! Takes a resolved method and its coerced arguments, constructs the request
//! (query string for GET, JSON body for POST), sends it, and renders the reply.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde_json::Value;

use crate::args::{ArgValue, Arguments};
use crate::builder::KEY_PARAM;
use crate::catalog::{Interface, Method};
use crate::error::Error;

/// Where requests go and what every request carries.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RequestContext {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Optional API key sent as `key`
    pub credential: Option<String>,
    /// Echo each request line to stderr before sending
    pub verbose: bool,
}

impl RequestContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential: None,
            verbose: false,
        }
    }

    pub fn credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Add the credential (if any) and `format=json` to a set of arguments.
    ///
    /// A global credential replaces a `key` the user passed as a parameter.
    pub fn finish_arguments(&self, arguments: &mut Arguments) {
        if let Some(key) = &self.credential {
            arguments.insert(KEY_PARAM, ArgValue::Text(key.clone()));
        }
        arguments.insert("format", ArgValue::from("json"));
    }
}

/// `<base>/<Interface>/<Method>/v<NNNN>/`
pub fn method_url(base_url: &str, interface_name: &str, method: &Method) -> String {
    format!(
        "{}/{}/{}/{}/",
        base_url.trim_end_matches('/'),
        interface_name,
        method.name,
        method.version_segment()
    )
}

/// A fully built request, before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    /// URL already carries the query string
    Get { url: String },
    /// JSON object sent as the body with `Content-Type: application/json`
    Post { url: String, body: Value },
}

impl ApiRequest {
    pub fn url(&self) -> &str {
        match self {
            Self::Get { url } | Self::Post { url, .. } => url,
        }
    }

    fn echo(&self) {
        match self {
            Self::Get { url } => eprintln!(" ! GET request for {url}"),
            Self::Post { url, body } => {
                eprintln!(" ! POST request for {url}, body:");
                eprintln!("{}", render_json(body));
            }
        }
    }

    fn into_builder(self, client: &Client) -> RequestBuilder {
        match self {
            Self::Get { url } => client.get(url),
            Self::Post { url, body } => client.post(url).json(&body),
        }
    }
}

/// Build the request for `method` with the user's arguments.
///
/// The credential and `format=json` are appended to the user's arguments.
/// POST methods get the arguments as a JSON body; every other verb gets them
/// as a query string.
pub fn build_request(
    ctx: &RequestContext,
    interface: &Interface,
    method: &Method,
    mut arguments: Arguments,
) -> ApiRequest {
    ctx.finish_arguments(&mut arguments);
    let mut url = method_url(&ctx.base_url, &interface.name, method);

    if method.is_post() {
        return ApiRequest::Post {
            url,
            body: arguments.to_json(),
        };
    }

    if !arguments.is_empty() {
        url.push('?');
        url.push_str(&arguments.to_query_string());
    }
    ApiRequest::Get { url }
}

/// Call `method` and return the rendered response.
///
/// With `raw` the body is returned exactly as received, whatever the status;
/// otherwise a non-2xx reply is an error and the body is decoded as JSON and
/// pretty-printed.
pub fn invoke(
    client: &Client,
    ctx: &RequestContext,
    interface: &Interface,
    method: &Method,
    arguments: Arguments,
    raw: bool,
) -> Result<String, Error> {
    let request = build_request(ctx, interface, method, arguments);
    tracing::debug!(
        interface = %interface.name,
        method = %method.name,
        version = method.version,
        post = method.is_post(),
        "invoking method"
    );

    let (status, text) = send(client, ctx, request)?;
    if raw {
        if !status.is_success() {
            tracing::warn!(%status, "printing non-success reply as-is");
        }
        return Ok(text);
    }
    let text = ensure_success(status, text)?;
    let value: Value = serde_json::from_str(&text).map_err(Error::InvalidResponse)?;
    Ok(render_json(&value))
}

/// Send a request and return the reply status and body.
pub(crate) fn send(
    client: &Client,
    ctx: &RequestContext,
    request: ApiRequest,
) -> Result<(StatusCode, String), Error> {
    if ctx.verbose {
        request.echo();
    }
    tracing::debug!(url = request.url(), "sending request");

    let resp = request
        .into_builder(client)
        .send()
        .map_err(Error::RequestFailed)?;
    let status = resp.status();
    let text = resp.text().map_err(Error::ResponseRead)?;
    tracing::debug!(%status, bytes = text.len(), "received response");
    Ok((status, text))
}

/// Pass the body through for a 2xx reply, otherwise fail with `HttpStatus`.
pub(crate) fn ensure_success(status: StatusCode, body: String) -> Result<String, Error> {
    if !status.is_success() {
        return Err(Error::HttpStatus { status, body });
    }
    Ok(body)
}

fn render_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Parameter;
    use serde_json::json;

    fn make_method(http_method: &str) -> Method {
        Method {
            name: "GetPlayerSummaries".to_string(),
            version: 2,
            http_method: http_method.to_string(),
            description: None,
            parameters: vec![Parameter {
                name: "steamids".to_string(),
                type_name: "string".to_string(),
                optional: false,
                description: None,
            }],
        }
    }

    fn make_interface() -> Interface {
        Interface {
            name: "ISteamUser".to_string(),
            methods: Vec::new(),
        }
    }

    fn steamids() -> Arguments {
        let mut args = Arguments::new();
        args.insert("steamids", ArgValue::from("123"));
        args
    }

    // -- build_request --

    #[test]
    fn method_url_pads_version() {
        let url = method_url(
            "https://api.steampowered.com/",
            "ISteamUser",
            &make_method("GET"),
        );
        assert_eq!(
            url,
            "https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/"
        );
    }

    #[test]
    fn build_request_get_appends_query_with_format() {
        let ctx = RequestContext::new("https://api.steampowered.com");
        let req = build_request(&ctx, &make_interface(), &make_method("GET"), steamids());
        assert_eq!(
            req,
            ApiRequest::Get {
                url: "https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/?steamids=123&format=json".to_string()
            }
        );
    }

    #[test]
    fn build_request_adds_credential_before_format() {
        let ctx = RequestContext::new("https://api.steampowered.com")
            .credential(Some("SECRET".to_string()));
        let req = build_request(&ctx, &make_interface(), &make_method("GET"), steamids());
        assert!(
            req.url().ends_with("?steamids=123&key=SECRET&format=json"),
            "got: {}",
            req.url()
        );
    }

    #[test]
    fn build_request_global_credential_overrides_key_parameter() {
        let ctx = RequestContext::new("https://x").credential(Some("GLOBAL".to_string()));
        let mut args = steamids();
        args.insert("key", ArgValue::from("LOCAL"));
        let req = build_request(&ctx, &make_interface(), &make_method("GET"), args);
        assert!(req.url().contains("key=GLOBAL"), "got: {}", req.url());
        assert!(!req.url().contains("LOCAL"), "got: {}", req.url());
    }

    #[test]
    fn build_request_post_sends_body_without_query() {
        let ctx = RequestContext::new("https://api.steampowered.com");
        let req = build_request(&ctx, &make_interface(), &make_method("POST"), steamids());
        assert_eq!(
            req,
            ApiRequest::Post {
                url: "https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/"
                    .to_string(),
                body: json!({"steamids": "123", "format": "json"}),
            }
        );
    }

    #[test]
    fn build_request_treats_unknown_verbs_as_get() {
        let ctx = RequestContext::new("https://x");
        let req = build_request(
            &ctx,
            &make_interface(),
            &make_method("PUT"),
            Arguments::new(),
        );
        assert_eq!(
            req,
            ApiRequest::Get {
                url: "https://x/ISteamUser/GetPlayerSummaries/v0002/?format=json".to_string()
            }
        );
    }

    // -- invoke integration tests --

    #[test]
    fn invoke_get_sends_query_params() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/ISteamUser/GetPlayerSummaries/v0002/")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("steamids".into(), "123".into()),
                mockito::Matcher::UrlEncoded("format".into(), "json".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response":{"players":[]}}"#)
            .create();

        let ctx = RequestContext::new(server.url());
        let out = invoke(
            &Client::new(),
            &ctx,
            &make_interface(),
            &make_method("GET"),
            steamids(),
            false,
        )
        .unwrap();

        assert_eq!(
            serde_json::from_str::<Value>(&out).unwrap(),
            json!({"response": {"players": []}})
        );
        assert!(out.contains('\n'), "expected pretty output, got: {out}");
        mock.assert();
    }

    #[test]
    fn invoke_post_sends_json_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/ISteamUser/GetPlayerSummaries/v0002/")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(
                json!({"steamids": "123", "key": "K", "format": "json"}),
            ))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create();

        let ctx = RequestContext::new(server.url()).credential(Some("K".to_string()));
        let out = invoke(
            &Client::new(),
            &ctx,
            &make_interface(),
            &make_method("POST"),
            steamids(),
            false,
        )
        .unwrap();

        assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), json!({"ok": true}));
        mock.assert();
    }

    #[test]
    fn invoke_raw_returns_body_verbatim() {
        let body = "{\"b\": 1,   \"a\":[2]}\n";
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/ISteamUser/GetPlayerSummaries/v0002/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(body)
            .create();

        let ctx = RequestContext::new(server.url());
        let out = invoke(
            &Client::new(),
            &ctx,
            &make_interface(),
            &make_method("GET"),
            steamids(),
            true,
        )
        .unwrap();

        assert_eq!(out, body);
    }

    #[test]
    fn invoke_raw_returns_error_body_verbatim() {
        let body = r#"{"error":"bad"}"#;
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/ISteamUser/GetPlayerSummaries/v0002/")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(body)
            .create();

        let ctx = RequestContext::new(server.url());
        let method = make_method("GET");
        let iface = make_interface();

        let raw = invoke(&Client::new(), &ctx, &iface, &method, steamids(), true).unwrap();
        assert_eq!(raw, body);

        let err =
            invoke(&Client::new(), &ctx, &iface, &method, steamids(), false).unwrap_err();
        assert!(
            matches!(err, Error::HttpStatus { status, .. } if status.as_u16() == 400),
            "got: {err:?}"
        );
    }

    #[test]
    fn invoke_raw_accepts_non_json() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/ISteamUser/GetPlayerSummaries/v0002/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<vdf/>")
            .create();

        let ctx = RequestContext::new(server.url());
        let method = make_method("GET");
        let iface = make_interface();

        let raw = invoke(&Client::new(), &ctx, &iface, &method, steamids(), true).unwrap();
        assert_eq!(raw, "<vdf/>");

        let err =
            invoke(&Client::new(), &ctx, &iface, &method, steamids(), false).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn invoke_returns_error_on_non_success_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/ISteamUser/GetPlayerSummaries/v0002/")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body("Forbidden")
            .create();

        let ctx = RequestContext::new(server.url());
        let err = invoke(
            &Client::new(),
            &ctx,
            &make_interface(),
            &make_method("GET"),
            steamids(),
            false,
        )
        .unwrap_err();

        let err_msg = err.to_string();
        assert!(err_msg.contains("403"), "got: {err_msg}");
        assert!(err_msg.contains("Forbidden"), "got: {err_msg}");
    }

    #[test]
    fn invoke_unreachable_host_is_request_failure() {
        let ctx = RequestContext::new("http://127.0.0.1:1");
        let err = invoke(
            &Client::new(),
            &ctx,
            &make_interface(),
            &make_method("GET"),
            steamids(),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, Error::RequestFailed(_)));
    }
}
