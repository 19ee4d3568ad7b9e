//! Call any Steam Web API method from the command line.
//!
//! Fetches the API's self-description (`GetSupportedAPIList`) into a typed
//! catalog, resolves an interface/method/version, builds a clap parser from
//! the method's declared parameters, and dispatches the HTTP request.
//!
//! # Usage
//!
//! ```no_run
//! use steamapi_clap::{build_argument_spec, fetch_catalog, invoke, resolve, RequestContext};
//! use reqwest::blocking::Client;
//!
//! let client = Client::new();
//! let ctx = RequestContext::new("https://api.steampowered.com");
//! let catalog = fetch_catalog(&client, &ctx).unwrap();
//!
//! let (interface, method) = resolve(&catalog, "ISteamNews", "GetNewsForApp", None).unwrap();
//! let bin_name = "steamcli call ISteamNews GetNewsForApp";
//! let spec = build_argument_spec(bin_name, method, false).unwrap();
//! let arguments = spec.parse(["--appid", "440", "--count", "3"]).unwrap();
//!
//! println!("{}", invoke(&client, &ctx, interface, method, arguments, false).unwrap());
//! ```

pub mod args;
pub mod builder;
pub mod catalog;
pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod listing;
pub mod resolve;

pub use args::{ArgValue, Arguments};
pub use builder::{
    build_argument_spec, build_cli, ArgumentSpec, CliConfig, DEFAULT_BASE_URL,
};
pub use catalog::{parse_catalog, Catalog, Interface, Method, ParamType, Parameter};
pub use discovery::fetch_catalog;
pub use dispatch::{build_request, invoke, method_url, ApiRequest, RequestContext};
pub use error::Error;
pub use listing::list;
pub use resolve::resolve;

// Re-export dependencies for downstream crates
pub use clap;
pub use reqwest;
