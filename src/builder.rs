//! clap command construction
//!
//! Builds the static root command (`commands` / `call`) and, per resolved
//! method, a dynamic argument parser with one `--<parameter>` option per
//! declared parameter.

use std::collections::HashSet;
use std::convert::Infallible;
use std::ffi::OsString;

use clap::builder::ValueParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::args::{ArgValue, Arguments};
use crate::catalog::{Method, ParamType};
use crate::error::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";

/// Parameter name filled by the global credential.
pub const KEY_PARAM: &str = "key";

/// Configuration for the root command.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CliConfig {
    /// Root command name (also used in per-method usage lines)
    pub name: String,
    /// Root command about/description
    pub about: String,
    /// Default base URL for the API
    pub default_base_url: String,
}

impl CliConfig {
    pub fn new(name: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
            default_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the CLI at a different API host.
    pub fn default_base_url(mut self, url: impl Into<String>) -> Self {
        self.default_base_url = url.into();
        self
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new("steamcli", "Call any Steam Web API method from the command line")
    }
}

/// Build the root command.
///
/// Structure: `<name> [--key K] [--verbose] [--raw] commands [interface] [method]`
/// and `<name> ... call <interface> <method> [--method-version N] [parameters...]`.
/// Global flags go before the subcommand; everything after `<method>` belongs
/// to the method's own parser.
pub fn build_cli(config: &CliConfig) -> Command {
    Command::new(config.name.clone())
        .about(config.about.clone())
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("key")
                .long("key")
                .short('k')
                .help(
                    "Publisher API key (results of `commands` differ with and without a key)",
                )
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Print outgoing requests before sending them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .short('r')
                .help("Print the response body as received")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .default_value(config.default_base_url.clone())
                .help("API base URL"),
        )
        .subcommand(
            Command::new("commands")
                .about(
                    "List API interfaces and methods \
                     (with parameters when an interface is given)",
                )
                .arg(Arg::new("interface").help("Only show this interface"))
                .arg(Arg::new("method").help("Only show this method")),
        )
        .subcommand(
            Command::new("call")
                .about("Call an API method")
                .arg(
                    Arg::new("interface")
                        .required(true)
                        .help("Interface name, e.g. ISteamUser"),
                )
                .arg(
                    Arg::new("method")
                        .required(true)
                        .help("Method name, e.g. GetPlayerSummaries"),
                )
                .arg(
                    Arg::new("method-version")
                        .long("method-version")
                        .value_parser(value_parser!(u32))
                        .help("Method version to call when several exist (default: latest)"),
                )
                .arg(
                    Arg::new("parameters")
                        .num_args(0..)
                        .trailing_var_arg(true)
                        .allow_hyphen_values(true)
                        .value_parser(value_parser!(OsString))
                        .help("Method parameters as --name value pairs"),
                ),
        )
}

impl ParamType {
    /// Coercion applied to a raw argument of this type.
    fn value_parser(self) -> ValueParser {
        match self {
            Self::Uint64 => value_parser!(u64).into(),
            Self::Int64 => value_parser!(i64).into(),
            Self::Uint32 => value_parser!(u32).into(),
            Self::Int32 => value_parser!(i32).into(),
            Self::Float => ValueParser::new(finite_float),
            Self::Bool => ValueParser::new(truthy),
            Self::String => ValueParser::string(),
            Self::RawBinary => ValueParser::os_string(),
        }
    }

    fn extract(self, matches: &ArgMatches, id: &str) -> Option<ArgValue> {
        match self {
            Self::Uint64 => matches.get_one::<u64>(id).map(|v| ArgValue::Unsigned(*v)),
            Self::Uint32 => matches
                .get_one::<u32>(id)
                .map(|v| ArgValue::Unsigned(u64::from(*v))),
            Self::Int64 => matches.get_one::<i64>(id).map(|v| ArgValue::Signed(*v)),
            Self::Int32 => matches
                .get_one::<i32>(id)
                .map(|v| ArgValue::Signed(i64::from(*v))),
            Self::Float => matches.get_one::<f64>(id).map(|v| ArgValue::Float(*v)),
            Self::Bool => matches.get_one::<bool>(id).map(|v| ArgValue::Bool(*v)),
            Self::String => matches
                .get_one::<String>(id)
                .map(|v| ArgValue::Text(v.clone())),
            Self::RawBinary => matches
                .get_one::<OsString>(id)
                .map(|v| ArgValue::Raw(v.clone().into_encoded_bytes())),
        }
    }
}

/// Float coercion; `nan` and `inf` have no JSON form, so they are rejected.
fn finite_float(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() {
        return Err(format!("`{s}` is not a finite number"));
    }
    Ok(value)
}

/// Boolean coercion: any non-empty string is true, so `--flag false` is true.
fn truthy(s: &str) -> Result<bool, Infallible> {
    Ok(!s.is_empty())
}

/// A method's argument parser plus the type of each declared parameter.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    command: Command,
    params: Vec<(String, ParamType)>,
}

impl ArgumentSpec {
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Parse method parameters (no program name) into coerced arguments.
    ///
    /// Optional parameters the user did not pass are left out entirely.
    pub fn parse<I, T>(&self, tokens: I) -> Result<Arguments, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(tokens)?;
        Ok(self.collect(&matches))
    }

    fn collect(&self, matches: &ArgMatches) -> Arguments {
        let mut arguments = Arguments::new();
        for (name, ty) in &self.params {
            if let Some(value) = ty.extract(matches, name) {
                arguments.insert(name.clone(), value);
            }
        }
        arguments
    }
}

/// Build the argument parser for one method.
///
/// `bin_name` is shown in usage/help (e.g. `steamcli call ISteamUser GetPlayerSummaries`).
/// When `credential_supplied` is set a declared `key` parameter becomes optional,
/// since the global credential fills it.
pub fn build_argument_spec(
    bin_name: &str,
    method: &Method,
    credential_supplied: bool,
) -> Result<ArgumentSpec, Error> {
    let mut cmd = Command::new(method.name.clone())
        .bin_name(bin_name.to_owned())
        .no_binary_name(true);

    if let Some(desc) = &method.description {
        cmd = cmd.about(desc.clone());
    }

    let mut seen = HashSet::new();
    let mut params = Vec::with_capacity(method.parameters.len());

    for param in &method.parameters {
        if !seen.insert(param.name.as_str()) {
            return Err(Error::DuplicateParameter {
                method: method.name.clone(),
                parameter: param.name.clone(),
            });
        }
        let ty = param.param_type(&method.name)?;

        if param.name == "help" {
            cmd = cmd.disable_help_flag(true);
        }

        let required =
            !param.optional && !(credential_supplied && param.name == KEY_PARAM);

        let mut arg = Arg::new(param.name.clone())
            .long(param.name.clone())
            .value_name(ty.as_str().to_uppercase())
            .required(required)
            .allow_negative_numbers(true)
            .value_parser(ty.value_parser())
            .action(ArgAction::Set);
        if let Some(desc) = &param.description {
            arg = arg.help(desc.clone());
        }

        cmd = cmd.arg(arg);
        params.push((param.name.clone(), ty));
    }

    Ok(ArgumentSpec {
        command: cmd,
        params,
    })
}
