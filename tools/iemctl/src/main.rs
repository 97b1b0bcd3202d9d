//! iemctl - IEM protocol operator tool
//!
//! Runs single query/command exchanges against an IEM on a serial line and
//! offers a few offline helpers (catalog listing, frame encoding).

mod config;
mod logging;
mod utils;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use iem_protocol::{catalog, CommandKind, Message, ParamRule, ProtocolClient, CATALOG};
use tracing::debug;

use crate::config::{IemctlConfig, Overrides};
use crate::utils::{byte_arg, hex_bytes, highlight_frame};

#[derive(Parser)]
#[command(name = "iemctl")]
#[command(about = "IEM serial protocol tool")]
#[command(version)]
struct Cli {
    /// Config file (.toml, .yaml); defaults to ./iemctl.toml and ./iemctl.yaml
    #[arg(short, long, global = true, env = "IEMCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Serial device, e.g. /dev/ttyUSB0 or COM3
    #[arg(short, long, global = true)]
    device: Option<String>,

    #[arg(short, long, global = true)]
    baud: Option<u32>,

    /// Per-read timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log TX/RX frames
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one request/response exchange
    Query {
        #[arg(value_parser = byte_arg)]
        selector: u8,
        #[arg(value_parser = byte_arg)]
        subselector: u8,
    },

    /// Send one actuation command
    Command {
        #[arg(value_parser = byte_arg)]
        selector: u8,
        #[arg(value_parser = byte_arg)]
        subselector: u8,
        #[arg(value_parser = byte_arg)]
        params: Vec<u8>,
        /// Block this long after sending so the device can act
        #[arg(long)]
        settle_ms: Option<u64>,
    },

    /// List every known (selector, subselector) identity
    Catalog {
        /// Only this selector
        #[arg(long, value_parser = byte_arg)]
        selector: Option<u8>,
    },

    /// List serial ports visible to the OS
    Ports,

    /// Checksum and frame field bytes without touching the line
    Frame {
        #[arg(required = true, value_parser = byte_arg)]
        fields: Vec<u8>,
    },

    /// Print the effective configuration as YAML
    Config,
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "ERROR".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        device: cli.device,
        baud_rate: cli.baud,
        timeout_ms: cli.timeout_ms,
        verbose: cli.verbose,
    };
    let config = config::load(cli.config.as_deref(), &overrides)?;

    logging::init(&config.logging.level, !cli.no_color)?;
    debug!("Config: {:?}", config);

    match cli.command {
        Commands::Query {
            selector,
            subselector,
        } => handle_query(&config, selector, subselector),
        Commands::Command {
            selector,
            subselector,
            params,
            settle_ms,
        } => handle_command(&config, selector, subselector, &params, settle_ms),
        Commands::Catalog { selector } => {
            handle_catalog(selector);
            Ok(())
        },
        Commands::Ports => handle_ports(),
        Commands::Frame { fields } => {
            handle_frame(&fields);
            Ok(())
        },
        Commands::Config => {
            let yaml = serde_yaml::to_string(&config).context("Failed to render config")?;
            print!("{yaml}");
            Ok(())
        },
    }
}

fn handle_query(config: &IemctlConfig, selector: u8, subselector: u8) -> Result<()> {
    let descriptor = catalog::lookup(selector, subselector)?;
    let mut client = ProtocolClient::open(&config.serial)?;

    let response = client
        .query(selector, subselector)
        .with_context(|| format!("{} on {}", descriptor.name, config.serial.device))?;

    println!(
        "{} {} ({}B)",
        "✓".green(),
        descriptor.name.bold(),
        response.len()
    );
    println!("  {}", highlight_frame(&response));
    Ok(())
}

fn handle_command(
    config: &IemctlConfig,
    selector: u8,
    subselector: u8,
    params: &[u8],
    settle_ms: Option<u64>,
) -> Result<()> {
    let descriptor = catalog::lookup(selector, subselector)?;
    let mut client = ProtocolClient::open(&config.serial)?;

    client
        .command(selector, subselector, params)
        .with_context(|| format!("{} on {}", descriptor.name, config.serial.device))?;

    println!(
        "{} {} sent [{}]",
        "✓".green(),
        descriptor.name.bold(),
        hex_bytes(params)
    );

    if let Some(ms) = settle_ms {
        debug!("Settling {}ms", ms);
        std::thread::sleep(Duration::from_millis(ms));
    }
    Ok(())
}

fn handle_catalog(selector: Option<u8>) {
    let entries: Vec<_> = match selector {
        Some(sel) => catalog::for_selector(sel).collect(),
        None => CATALOG.iter().collect(),
    };

    if entries.is_empty() {
        println!("{}", "No matching entries".yellow());
        return;
    }

    println!(
        "{:<32} {:>4} {:>4}  {}",
        "NAME".bold(),
        "SEL".bold(),
        "SUB".bold(),
        "SHAPE".bold()
    );
    for d in entries {
        let shape = match d.kind {
            CommandKind::Query { response_len } => format!("query, {response_len}B response"),
            CommandKind::Actuation { params } if params.is_empty() => "command".to_string(),
            CommandKind::Actuation { params } => format!(
                "command({})",
                params.iter().map(describe_rule).collect::<Vec<_>>().join(", ")
            ),
        };
        println!(
            "{:<32} 0x{:02X} 0x{:02X}  {}",
            d.name, d.selector, d.subselector, shape
        );
    }
}

fn describe_rule(rule: &ParamRule) -> String {
    match *rule {
        ParamRule::Range { name, min, max } => format!("{name} {min}..={max}"),
        ParamRule::OneOf { name, values } => format!("{name} in {values:?}"),
        ParamRule::Mask { name, allowed } => format!("{name} mask 0x{allowed:02X}"),
    }
}

fn handle_ports() -> Result<()> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        return Ok(());
    }

    for port in ports {
        let kind = match port.port_type {
            serialport::SerialPortType::UsbPort(info) => format!(
                "USB {:04x}:{:04x}{}",
                info.vid,
                info.pid,
                info.product.map(|p| format!(" {p}")).unwrap_or_default()
            ),
            serialport::SerialPortType::PciPort => "PCI".to_string(),
            serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
            serialport::SerialPortType::Unknown => "unknown".to_string(),
        };
        println!("{}  {}", port.port_name.green(), kind.dimmed());
    }
    Ok(())
}

fn handle_frame(fields: &[u8]) {
    let message = Message::new(fields);
    println!("fields: {}", hex_bytes(message.fields()));
    println!("crc:    {:04X}", message.crc());
    println!("frame:  {}", highlight_frame(&message.encode()));
}
