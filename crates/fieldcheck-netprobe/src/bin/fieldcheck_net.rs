//! Command-line front-end for the network probes.
//!
//! Each subcommand runs one probe against the host tools and maps the result
//! to the process exit status, so shell-based test scripts can use it too.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fieldcheck_netprobe::{connect, get_gateway, get_known, parse_known, pingtest, SystemRunner};

#[derive(Parser, Debug)]
#[command(name = "fieldcheck-net", about = "Network probes for integration tests")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a single ICMP echo request from an interface.
    Ping {
        #[arg(long, short = 'I')]
        interface: String,
        ip: String,
    },
    /// Print the default gateway of an interface.
    Gateway {
        #[arg(long, short = 'I')]
        interface: String,
    },
    /// List known NetworkManager profiles.
    Known,
    /// Connect to a Wi-Fi network, reusing a saved profile when one exists.
    Connect {
        #[arg(long)]
        ssid: String,
        #[arg(long)]
        password: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let runner = SystemRunner;

    match cli.command {
        Command::Ping { interface, ip } => {
            if pingtest(&runner, &ip, &interface) {
                println!("{ip} reachable via {interface}");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{ip} unreachable via {interface}");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Gateway { interface } => {
            let mut failures: Vec<String> = Vec::new();
            match get_gateway(&runner, &interface, &mut failures) {
                Some(gw) => {
                    println!("{gw}");
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    for failure in failures {
                        eprintln!("{failure}");
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Known => {
            let output = get_known(&runner)?.into_result("nmcli")?;
            for net in parse_known(&output.stdout) {
                println!(
                    "{}\t{}\t{}\t{}",
                    net.name,
                    net.uuid,
                    if net.active { "active" } else { "inactive" },
                    net.kind
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Connect { ssid, password } => {
            let outcome = connect(&runner, &ssid, &password)?;
            println!("{outcome:?}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
