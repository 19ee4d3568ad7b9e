//! Interface / method / version lookup over a `Catalog`.

use crate::catalog::{Catalog, Interface, Method};
use crate::error::Error;

/// Find `interface_name` / `method_name` in the catalog.
///
/// Names match exactly (case-sensitive). Without an explicit `version` the
/// highest version among same-named methods is selected.
pub fn resolve<'a>(
    catalog: &'a Catalog,
    interface_name: &str,
    method_name: &str,
    version: Option<u32>,
) -> Result<(&'a Interface, &'a Method), Error> {
    let interface = catalog
        .interfaces
        .iter()
        .find(|i| i.name == interface_name)
        .ok_or_else(|| Error::InterfaceNotFound {
            name: interface_name.to_string(),
            valid: catalog.interface_names(),
        })?;

    let candidates: Vec<&Method> = interface
        .methods
        .iter()
        .filter(|m| m.name == method_name)
        .collect();

    let Some(latest) = candidates.iter().map(|m| m.version).max() else {
        return Err(Error::MethodNotFound {
            interface: interface.name.clone(),
            name: method_name.to_string(),
            valid: method_names(interface),
        });
    };

    let wanted = version.unwrap_or(latest);
    let mut matching = candidates.iter().copied().filter(|m| m.version == wanted);

    let method = matching.next().ok_or_else(|| {
        let mut available: Vec<u32> = candidates.iter().map(|m| m.version).collect();
        available.sort_unstable();
        available.dedup();
        Error::VersionNotFound {
            interface: interface.name.clone(),
            method: method_name.to_string(),
            version: wanted,
            available,
        }
    })?;

    if matching.next().is_some() {
        return Err(Error::DuplicateMethod {
            interface: interface.name.clone(),
            method: method_name.to_string(),
            version: wanted,
        });
    }

    tracing::debug!(
        interface = %interface.name,
        method = %method.name,
        version = method.version,
        explicit = version.is_some(),
        "resolved method"
    );

    Ok((interface, method))
}

/// Distinct method names of an interface, in catalog order.
fn method_names(interface: &Interface) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(interface.methods.len());
    for method in &interface.methods {
        if !names.contains(&method.name) {
            names.push(method.name.clone());
        }
    }
    names
}
