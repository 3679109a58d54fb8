//! provgen CLI
//!
//! Usage:
//!   provgen --template <FILE> --csv <FILE> [--output-dir <DIR>]
//!   provgen --template <FILE> --json <FILE>
//!   provgen --template <FILE> --single --mac <MAC> --user-id <ID> \
//!       --password <PW> --server <HOST>
//!
//! Renders one config per device record and writes it to
//! `<output-dir>/<normalized-mac>.xml`.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use provgen::record::{self, DataRecord};
use provgen::{transport_code, DefaultTable, Engine};

#[derive(Parser)]
#[command(name = "provgen")]
#[command(about = "Generate device provisioning configs from a template")]
struct Cli {
    /// Template file
    #[arg(short, long)]
    template: PathBuf,

    /// CSV file with one device record per row
    #[arg(long, conflicts_with_all = ["json", "single"])]
    csv: Option<PathBuf>,

    /// JSON file with device records
    #[arg(long, conflicts_with = "single")]
    json: Option<PathBuf>,

    /// Output directory for rendered configs
    #[arg(short, long, default_value = "configs")]
    output_dir: PathBuf,

    /// Default table file (TOML) overriding the built-in fallbacks
    #[arg(short, long)]
    defaults: Option<PathBuf>,

    /// Fail devices whose primary account fields are unset
    #[arg(long)]
    strict: bool,

    /// Render a single device from command-line fields
    #[arg(long)]
    single: bool,

    /// Device MAC address (single mode)
    #[arg(long, required_if_eq("single", "true"))]
    mac: Option<String>,

    /// Primary account SIP user id (single mode)
    #[arg(long, required_if_eq("single", "true"))]
    user_id: Option<String>,

    /// Primary account SIP password (single mode)
    #[arg(long, required_if_eq("single", "true"))]
    password: Option<String>,

    /// Primary account SIP server address (single mode)
    #[arg(long, required_if_eq("single", "true"))]
    server: Option<String>,

    /// Primary account SIP transport (single mode): udp, tcp, tls, or 'dns srv'
    #[arg(long, default_value = "udp")]
    transport: String,
}

fn main() {
    let cli = Cli::parse();

    let template = match fs::read_to_string(&cli.template) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading template '{}': {}", cli.template.display(), e);
            process::exit(1);
        }
    };

    let defaults = match &cli.defaults {
        Some(path) => match DefaultTable::from_file(path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Error loading default table '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => DefaultTable::default(),
    };

    let mut engine = Engine::new().with_defaults(defaults);
    if cli.strict {
        engine = engine.with_required(vec![
            "account.1.user_id".to_string(),
            "account.1.password".to_string(),
            "account.1.server_address".to_string(),
        ]);
    }

    let devices: Vec<(String, DataRecord)> = if cli.single {
        if transport_code(&cli.transport).is_none() {
            eprintln!(
                "Error: unknown transport '{}' (expected udp, tcp, tls, or 'dns srv')",
                cli.transport
            );
            process::exit(2);
        }
        vec![single_device(&cli)]
    } else if let Some(path) = &cli.csv {
        match record::read_csv(path) {
            Ok(records) => with_macs(records),
            Err(e) => {
                eprintln!("Error reading '{}': {}", path.display(), e);
                process::exit(1);
            }
        }
    } else if let Some(path) = &cli.json {
        match record::read_json(path) {
            Ok(records) => with_macs(records),
            Err(e) => {
                eprintln!("Error reading '{}': {}", path.display(), e);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Error: provide --csv, --json, or --single with device fields");
        process::exit(2);
    };

    if let Err(e) = fs::create_dir_all(&cli.output_dir) {
        eprintln!(
            "Error creating output directory '{}': {}",
            cli.output_dir.display(),
            e
        );
        process::exit(1);
    }

    println!("Processing {} device(s)...", devices.len());

    let mut failures = 0;
    for (mac, mut device) in devices {
        record::apply_primary_defaults(&mut device);

        match engine.render(&template, &device) {
            Ok(rendered) => {
                if !rendered.unresolved.is_empty() {
                    eprintln!(
                        "{}: unresolved placeholders: {}",
                        mac,
                        rendered.unresolved.join(", ")
                    );
                }
                let path = cli.output_dir.join(format!("{}.xml", normalize_mac(&mac)));
                match fs::write(&path, &rendered.text) {
                    Ok(()) => println!("Wrote {}", path.display()),
                    Err(e) => {
                        eprintln!("{}: error writing '{}': {}", mac, path.display(), e);
                        failures += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("{}: {}", mac, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        process::exit(1);
    }
}

/// Pair each record with its MAC address, synthesizing one for records that
/// carry neither `mac_address` nor `mac`
fn with_macs(records: Vec<DataRecord>) -> Vec<(String, DataRecord)> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| (device_mac(&record, index), record))
        .collect()
}

fn device_mac(record: &DataRecord, index: usize) -> String {
    record
        .get("mac_address")
        .filter(|v| !v.is_empty())
        .or_else(|| record.get("mac").filter(|v| !v.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:012}", index))
}

/// Config files are named after the MAC with separators stripped, lowercased
fn normalize_mac(mac: &str) -> String {
    mac.chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

/// Synthesize a record from the single-device command-line fields
fn single_device(cli: &Cli) -> (String, DataRecord) {
    // clap enforces these in single mode
    let mac = cli.mac.clone().unwrap_or_default();
    let user_id = cli.user_id.as_deref().unwrap_or_default();
    let password = cli.password.as_deref().unwrap_or_default();
    let server = cli.server.as_deref().unwrap_or_default();

    let mut device = DataRecord::from_pairs([
        ("account.1.user_id", user_id),
        ("account.1.password", password),
        ("account.1.server_address", server),
        ("account.1.display_name", user_id),
        ("account.1.auth_id", user_id),
        ("account.1.outbound_proxy_primary", ""),
        ("account.1.outbound_proxy_secondary", ""),
    ]);
    device.set("account.1.sip_transport", &cli.transport);

    (mac, device)
}
