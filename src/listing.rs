//! Text listing of the catalog for the `commands` subcommand.

use std::fmt::Write;

use crate::catalog::{Catalog, Method, Parameter};

pub const REQUIRED_LEGEND: &str = "* = required argument";

/// Render the catalog, optionally filtered to one interface and/or method.
///
/// Parameters are only listed when an interface filter is given, since the
/// full catalog would be thousands of lines.
pub fn list(
    catalog: &Catalog,
    interface_filter: Option<&str>,
    method_filter: Option<&str>,
) -> String {
    let mut out = String::new();
    let show_params = interface_filter.is_some();

    for interface in &catalog.interfaces {
        if interface_filter.is_some_and(|f| f != interface.name) {
            continue;
        }
        let _ = writeln!(out, "> {}:", interface.name);

        for method in &interface.methods {
            if method_filter.is_some_and(|f| f != method.name) {
                continue;
            }
            write_method(&mut out, method);
            if show_params {
                for param in &method.parameters {
                    write_parameter(&mut out, param);
                }
            }
        }
    }

    if show_params {
        let _ = writeln!(out, "{REQUIRED_LEGEND}");
    }
    out
}

fn write_method(out: &mut String, method: &Method) {
    let _ = write!(
        out,
        "    {} v{} [{}]",
        method.name, method.version, method.http_method
    );
    match &method.description {
        Some(desc) => {
            let _ = writeln!(out, ": {desc}");
        }
        None => out.push('\n'),
    }
}

fn write_parameter(out: &mut String, param: &Parameter) {
    let mark = if param.optional { ' ' } else { '*' };
    let _ = write!(out, "        {mark} {} {}", param.type_name, param.name);
    match &param.description {
        Some(desc) => {
            let _ = writeln!(out, ": {desc}");
        }
        None => out.push('\n'),
    }
}
