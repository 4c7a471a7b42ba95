use anyhow::Result;
use clap::Parser;
use dnslookup::config::{CliOverrides, Config};
use dnslookup::logging::init_logging;
use dnslookup::{DnsRecord, LookupError, Resolver};
use tracing::debug;

#[derive(Parser)]
#[command(name = "dnslookup")]
#[command(about = "Single-shot DNS lookup over UDP")]
#[command(version)]
struct Cli {
    /// Domain name to look up
    domain: String,

    /// DNS server to query
    #[arg(short, long)]
    server: Option<String>,

    /// DNS server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Receive timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Record type to query (A, AAAA, CNAME or a number)
    #[arg(long = "type", value_name = "TYPE")]
    record_type: Option<String>,

    /// UDP receive buffer size in bytes
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<String>,

    /// Print records as JSON
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to this file
    #[arg(long, value_name = "PATH")]
    save_config: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            server: self.server.clone(),
            port: self.port,
            timeout_secs: self.timeout,
            buffer_size: self.buffer_size,
            record_type: self.record_type.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {:#}", e);
            return Ok(());
        }
    };

    let _log_guard = init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!("Version {}", env!("CARGO_PKG_VERSION"));
    config.display();

    // Lookup failures are reported on stdout and do not change the exit code
    if let Err(e) = run(&cli, &config).await {
        match e.downcast_ref::<LookupError>() {
            Some(err) if err.is_decode_error() => debug!("Response rejected: {:?}", err),
            _ => debug!("Lookup failed: {:?}", e),
        }
        println!("Error: {:#}", e);
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_file) => Config::load_from_file(config_file)?,
        None => Config::try_load_default()?,
    };
    config.apply_cli_overrides(&cli.overrides());
    Ok(config)
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    config.validate()?;

    if let Some(path) = &cli.save_config {
        config.save_to_file(path)?;
    }

    let record_type = config.record_type()?;

    let resolver = Resolver::from_config(config)?;
    let records = resolver.lookup(&cli.domain, record_type).await?;

    if cli.json {
        print_json(&records)?;
    } else {
        print_records(&records);
    }
    Ok(())
}

fn print_records(records: &[DnsRecord]) {
    if records.is_empty() {
        println!("No records found");
        return;
    }
    for record in records {
        println!("{}", record);
    }
}

fn print_json(records: &[DnsRecord]) -> Result<()> {
    let summaries: Vec<_> = records.iter().map(DnsRecord::summary).collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}
