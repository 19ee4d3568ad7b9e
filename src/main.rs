use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use reqwest::blocking::Client;
use steamapi_clap::{
    build_argument_spec, build_cli, fetch_catalog, invoke, list, resolve, CliConfig, Error,
    RequestContext, DEFAULT_BASE_URL,
};

fn main() -> ExitCode {
    let config = CliConfig::default();
    let matches = build_cli(&config).get_matches();

    let filter = if matches.get_flag("verbose") {
        "steamapi_clap=debug,steamcli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&config, &matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Error>() {
                // clap renders help (exit 0) and usage errors (exit 2) itself
                Some(Error::InvalidArguments(e)) => e.exit(),
                Some(e) if e.is_not_found() => eprintln!("{e}"),
                _ => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig, matches: &ArgMatches) -> Result<()> {
    let base_url = matches
        .get_one::<String>("base-url")
        .map_or(DEFAULT_BASE_URL, String::as_str);
    let ctx = RequestContext::new(base_url)
        .credential(matches.get_one::<String>("key").cloned())
        .verbose(matches.get_flag("verbose"));

    let client = Client::builder()
        .user_agent(concat!("steamcli/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    match matches.subcommand() {
        Some(("commands", sub)) => list_commands(&client, &ctx, sub),
        Some(("call", sub)) => {
            call_command(&client, &ctx, config, sub, matches.get_flag("raw"))
        }
        _ => bail!("no subcommand given"),
    }
}

fn list_commands(client: &Client, ctx: &RequestContext, sub: &ArgMatches) -> Result<()> {
    let catalog = fetch_catalog(client, ctx)?;
    let interface = sub.get_one::<String>("interface").map(String::as_str);
    let method = sub.get_one::<String>("method").map(String::as_str);
    print!("{}", list(&catalog, interface, method));
    Ok(())
}

fn call_command(
    client: &Client,
    ctx: &RequestContext,
    config: &CliConfig,
    sub: &ArgMatches,
    raw: bool,
) -> Result<()> {
    let interface_name = sub
        .get_one::<String>("interface")
        .context("missing interface name")?;
    let method_name = sub
        .get_one::<String>("method")
        .context("missing method name")?;
    let version = sub.get_one::<u32>("method-version").copied();
    let parameters: Vec<OsString> = sub
        .get_many::<OsString>("parameters")
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();

    let catalog = fetch_catalog(client, ctx)?;
    let (interface, method) = resolve(&catalog, interface_name, method_name, version)?;

    let bin_name = format!("{} call {} {}", config.name, interface.name, method.name);
    let spec = build_argument_spec(&bin_name, method, ctx.credential.is_some())?;
    let arguments = spec.parse(parameters)?;
    tracing::debug!(count = arguments.len(), "parsed method arguments");

    let rendered = invoke(client, ctx, interface, method, arguments, raw)?;
    println!("{rendered}");
    Ok(())
}
