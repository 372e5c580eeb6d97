use anyhow::{anyhow, Context, Result};
use clap::{crate_authors, crate_description, Arg, ArgMatches, Command};
use protocol_registry::{
    protocol::ResolvedProtocol, ProtocolDefinition, ProtocolProvider,
    ProtocolRegistry,
};
use std::{ffi::OsStr, io, process};
use tracing::{debug, error, Level};
use tracing_subscriber::fmt::time::Uptime;

static PROGRAM_NAME: &str = "Protocol Registry";
static PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args = parse_command_line();
    init_logging(args.is_present("verbose"));
    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            error!("CRITICAL: {:?}", err);
            process::exit(1);
        }
    }
}

fn parse_command_line() -> ArgMatches {
    let json = Arg::new("json")
        .long("json")
        .help("Print the output as JSON.");

    Command::new(PROGRAM_NAME)
        .author(crate_authors!(", "))
        .version(PROGRAM_VERSION)
        .about(crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Log debug messages."),
        )
        .subcommands([
            Command::new("list")
                .about("List every supported protocol, in declaration order.")
                .arg(json.clone()),
            Command::new("show")
                .about("Show the connection parameters of a protocol.")
                .args(&[
                    Arg::new("protocol")
                        .required(true)
                        .value_name("PROTOCOL")
                        .help("Protocol identifier, e.g. `tcp+tls`."),
                    Arg::new("port")
                        .long("port")
                        .takes_value(true)
                        .value_name("PORT")
                        .validator_os(arg_is_port)
                        .help("Port to use instead of the protocol's default port."),
                    json,
                ]),
            Command::new("check")
                .about("Exit successfully if the protocol is supported.")
                .arg(
                    Arg::new("protocol")
                        .required(true)
                        .value_name("PROTOCOL")
                        .help("Protocol identifier, e.g. `tcp+tls`."),
                ),
        ])
        .get_matches()
}

fn arg_is_port(x: &OsStr) -> Result<(), String> {
    match x.to_string_lossy().parse::<u16>() {
        Ok(port) if port != 0 => Ok(()),
        _ => Err("must be a number between 1 and 65535".to_owned()),
    }
}

fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_timer(Uptime::default())
        .with_thread_ids(true)
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .init();
}

/// Run the requested subcommand. Returns whether the process should exit successfully.
fn run(args: &ArgMatches) -> Result<bool> {
    debug!("{} {} starting...", PROGRAM_NAME, PROGRAM_VERSION);

    let registry = ProtocolRegistry::builtin();
    match args.subcommand() {
        Some(("list", args)) => {
            list(registry, args.is_present("json"))?;

            Ok(true)
        }
        Some(("show", args)) => {
            let protocol = required_value(args, "protocol")?;
            let port = args
                .value_of("port")
                .map(|x| x.parse::<u16>())
                .transpose()
                .context("while parsing --port")?;
            let resolved = registry.resolve(protocol, port).with_context(|| {
                format!("while resolving protocol {:?}", protocol)
            })?;
            show(&resolved, args.is_present("json"))?;

            Ok(true)
        }
        Some(("check", args)) => {
            let protocol = required_value(args, "protocol")?;
            let is_supported = registry.is_supported(protocol);
            println!(
                "{}",
                if is_supported {
                    "supported"
                } else {
                    "unsupported"
                }
            );

            Ok(is_supported)
        }
        Some((name, _)) => Err(anyhow!("unknown subcommand: {}", name)),
        None => Err(anyhow!("no subcommand given")),
    }
}

fn required_value<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.value_of(name)
        .ok_or_else(|| anyhow!("missing argument: {}", name))
}

fn list<P>(provider: &P, json: bool) -> Result<()>
where
    P: ProtocolProvider,
{
    let protocols = provider.supported_protocols();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(protocols)
                .context("while serializing the protocol list")?
        );
    } else {
        println!(
            "{:<10} {:>5}  {:<9} {:<5} {}",
            "PROTOCOL", "PORT", "TRANSPORT", "TLS", "ENCODING"
        );
        for protocol in protocols {
            println!("{}", table_row(protocol));
        }
    }

    Ok(())
}

fn show(resolved: &ResolvedProtocol, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(resolved).with_context(|| {
                format!(
                    "while serializing protocol {}",
                    resolved.definition.identifier()
                )
            })?
        );
    } else {
        let definition = resolved.definition;
        println!("protocol:     {}", definition.identifier());
        println!("port:         {}", resolved.port);
        println!("default port: {}", definition.default_port());
        println!("transport:    {}", definition.transport());
        println!("tls:          {}", yes_no(definition.requires_tls()));
        println!("encoding:     {}", definition.encoding());
    }

    Ok(())
}

fn table_row(protocol: &ProtocolDefinition) -> String {
    format!(
        "{:<10} {:>5}  {:<9} {:<5} {}",
        protocol.identifier(),
        protocol.default_port(),
        protocol.transport().to_string(),
        yes_no(protocol.requires_tls()),
        protocol.encoding()
    )
}

fn yes_no(x: bool) -> &'static str {
    if x {
        "yes"
    } else {
        "no"
    }
}
