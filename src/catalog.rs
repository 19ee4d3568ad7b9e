//! Discovery JSON → typed catalog records
//!
//! The `GetSupportedAPIList` reply is parsed once, at the discovery boundary,
//! into `Interface` / `Method` / `Parameter` values that the rest of the
//! pipeline consumes.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// The full set of interfaces returned by one discovery call.
#[derive(Debug, Clone, Default, Deserialize)]
#[non_exhaustive]
pub struct Catalog {
    pub interfaces: Vec<Interface>,
}

/// A named group of methods (e.g. `ISteamUser`).
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

/// One callable API operation. `(name, version)` is unique within an interface.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Method {
    pub name: String,
    pub version: u32,
    /// HTTP verb as declared by the API (`GET`, `POST`)
    #[serde(rename = "httpmethod")]
    pub http_method: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// A single named input of a method.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct Parameter {
    pub name: String,
    /// Wire type name as declared by the API (`uint32`, `string`, ...)
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// The closed set of wire types the API declares for parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Uint64,
    Int64,
    Uint32,
    Int32,
    Float,
    Bool,
    String,
    RawBinary,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uint64 => "uint64",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::RawBinary => "rawbinary",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a type name is not part of the closed type map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl FromStr for ParamType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "uint64" => Self::Uint64,
            "int64" => Self::Int64,
            "uint32" => Self::Uint32,
            "int32" => Self::Int32,
            "float" => Self::Float,
            "bool" => Self::Bool,
            "string" => Self::String,
            "rawbinary" => Self::RawBinary,
            other => return Err(UnknownType(other.to_string())),
        })
    }
}

impl Method {
    /// POST methods take a JSON body; every other verb is sent as a GET.
    pub fn is_post(&self) -> bool {
        self.http_method.eq_ignore_ascii_case("POST")
    }

    /// Path segment for this method's version, e.g. `v0002`.
    pub fn version_segment(&self) -> String {
        format!("v{:04}", self.version)
    }
}

impl Parameter {
    /// Look up the declared type in the closed type map.
    pub fn param_type(&self, method: &str) -> Result<ParamType, Error> {
        self.type_name
            .parse()
            .map_err(|UnknownType(type_name)| Error::UnknownParameterType {
                method: method.to_string(),
                parameter: self.name.clone(),
                type_name,
            })
    }
}

impl Catalog {
    pub fn new(interfaces: Vec<Interface>) -> Self {
        Self { interfaces }
    }

    pub fn interface_names(&self) -> Vec<String> {
        self.interfaces.iter().map(|i| i.name.clone()).collect()
    }
}

#[derive(Deserialize)]
struct DiscoveryReply {
    apilist: Catalog,
}

/// Parse a `GetSupportedAPIList` JSON body (`{"apilist": {"interfaces": [...]}}`).
pub fn parse_catalog(body: &str) -> Result<Catalog, Error> {
    let reply: DiscoveryReply = serde_json::from_str(body).map_err(Error::InvalidCatalog)?;
    Ok(reply.apilist)
}
