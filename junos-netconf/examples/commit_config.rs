//! Junos NETCONF example
//!
//! Connects to a Junos device over NETCONF, prints the session id, runs a CLI
//! command and optionally commits a configuration file.
//!
//! # Prerequisites
//!
//! - Junos device with `set system services netconf ssh` configured
//! - Valid credentials with appropriate permissions
//!
//! # Usage
//!
//! ```bash
//! cargo run --example commit_config -- --host 192.168.1.1 --user admin --password secret
//! ```
//!
//! Commit a file (format picked from its first token):
//! ```bash
//! cargo run --example commit_config -- --host r1 --user admin --key ~/.ssh/id_ed25519 \
//!     --file hostname.set --load-type merge
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use junos_netconf::{HostKeyVerification, SessionBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("=== junos-netconf commit example ===\n");
    println!("Connecting to {}:{}...", args.host, args.port);

    let mut builder = SessionBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .timeout(Duration::from_secs(args.timeout))
        .response_timeout(Duration::from_secs(args.response_timeout));

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    if args.insecure {
        builder = builder.host_key_verification(HostKeyVerification::Disabled);
    }

    let mut session = builder.connect().await?;
    println!(
        "Connected! session-id: {}\n",
        session.session_id().unwrap_or("unknown")
    );

    println!("Executing: {}", args.command);
    let output = session.run_cli_command(&args.command).await?;
    println!("{}\n", output.trim());

    if let Some(file) = &args.file {
        println!("Committing {} ({})...", file.display(), args.load_type);
        match session.commit_file(file, args.load_type.as_str()).await {
            Ok(()) => println!("Commit complete"),
            Err(e) => {
                eprintln!("Commit failed: {}", e);
                if let Some(reply) = e.reply() {
                    eprintln!("Device reply:\n{}", reply);
                }
            }
        }
        println!();
    }

    println!("Closing session...");
    session.close().await?;
    println!("Done!");

    Ok(())
}

/// Simple argument parser
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
    response_timeout: u64,
    command: String,
    file: Option<PathBuf>,
    load_type: String,
    insecure: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 830u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut timeout = 30u64;
        let mut response_timeout = 200u64;
        let mut command = "show version".to_string();
        let mut file = None;
        let mut load_type = "merge".to_string();
        let mut insecure = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(830);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--response-timeout" | "-r" => {
                    i += 1;
                    if i < args.len() {
                        response_timeout = args[i].parse().unwrap_or(200);
                    }
                }
                "--command" | "-c" => {
                    i += 1;
                    if i < args.len() {
                        command = args[i].clone();
                    }
                }
                "--file" | "-f" => {
                    i += 1;
                    if i < args.len() {
                        file = Some(PathBuf::from(&args[i]));
                    }
                }
                "--load-type" | "-l" => {
                    i += 1;
                    if i < args.len() {
                        load_type = args[i].clone();
                    }
                }
                "--insecure" => {
                    insecure = true;
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {}
            }
            i += 1;
        }

        Self {
            host,
            port,
            user,
            password,
            key,
            timeout,
            response_timeout,
            command,
            file,
            load_type,
            insecure,
        }
    }

    fn print_help() {
        println!(
            r#"junos-netconf commit example

Opens a NETCONF session, runs a CLI command and optionally commits a file.

USAGE:
    cargo run --example commit_config -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>              Target host [default: localhost]
    -p, --port <PORT>              NETCONF port [default: 830]
    -u, --user <USER>              Username [default: $USER]
    -P, --password <PASS>          Password for authentication
    -k, --key <PATH>               Path to SSH private key
    -t, --timeout <SECS>           SSH connect timeout [default: 30]
    -r, --response-timeout <SECS>  Per-reply deadline [default: 200]
    -c, --command <CMD>            CLI command to run [default: show version]
    -f, --file <PATH>              Configuration file to commit
    -l, --load-type <TYPE>         merge or replace [default: merge]
        --insecure                 Skip host key verification
        --help                     Print help
"#
        );
    }
}
