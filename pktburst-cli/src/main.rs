use pktburst_cli::{BurstRequest, Cli, Commands, SendArgs};
use pktburst_core::{Error, Interface, MacAddr, RawSink, Result};
use pktburst_packet::{crc32_lut, render_lut_bits};
use pktburst_transmit::{BurstExecutor, BurstTransmitter, MemorySink, TransmissionResult};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Source address used for `--dry-run` when no interface is given
const DRY_RUN_ADDRESS: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Interfaces => list_interfaces(),
        Commands::Send(args) => send(args).await,
        Commands::CrcTable { output } => write_crc_table(output.as_deref()),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn list_interfaces() -> Result<()> {
    for interface in Interface::list_all()? {
        let ipv4 = interface
            .ipv4
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {}  {:<15}  {}{}",
            interface.name,
            interface.mac_address,
            ipv4,
            if interface.is_up { "up" } else { "down" },
            if interface.is_loopback { " loopback" } else { "" }
        );
    }
    Ok(())
}

async fn send(args: SendArgs) -> Result<()> {
    let request = BurstRequest::from_args(&args)?;

    if args.dry_run {
        let address = match &args.interface {
            Some(name) => Interface::by_name(name)?.mac_address,
            None => DRY_RUN_ADDRESS,
        };
        let result = run_burst(&request, MemorySink::discarding(address), args.duration).await?;
        println!("dry run: {}", summary(&result));
        return result.into_result().map(|_| ());
    }

    let name = args
        .interface
        .as_deref()
        .ok_or_else(|| Error::Interface("no interface given".to_string()))?;
    let interface = Interface::by_name(name)?;
    if !interface.is_up {
        warn!(interface = %interface.name, "Interface is down");
    }

    let sink = interface.open_sink()?;
    let result = run_burst(&request, sink, args.duration).await?;
    println!("{}: {}", interface.name, summary(&result));
    result.into_result().map(|_| ())
}

async fn run_burst<S>(
    request: &BurstRequest,
    sink: S,
    duration: Option<f64>,
) -> Result<TransmissionResult>
where
    S: RawSink + 'static,
{
    let plan = request.build_plan(sink.own_address())?;
    info!(
        frames = plan.frames().len(),
        pass_bytes = plan.pass_bytes(),
        repeat = %plan.repeat_count(),
        cached = plan.uses_cache(),
        "Built transmission plan"
    );

    let transmitter = BurstTransmitter::new(request.config);
    let mut handle = BurstExecutor::new("send").spawn(transmitter, plan, sink)?;

    let cancel = handle.cancel_token();
    let deadline = duration
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64);
    let watcher = tokio::spawn(async move {
        let timeout = async {
            match deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Interrupted, stopping burst"),
            _ = timeout => info!("Duration elapsed, stopping burst"),
        }
        cancel.cancel();
    });

    let result = handle.wait().await;
    watcher.abort();
    result
}

fn summary(result: &TransmissionResult) -> String {
    let mut line = format!(
        "{} frames, {} bytes in {:.3}s ({:.0} fps, {:.2} Mbit/s)",
        result.frames_sent,
        result.bytes_sent,
        result.elapsed.as_secs_f64(),
        result.frames_per_second(),
        result.bits_per_second() / 1_000_000.0
    );
    if result.cancelled {
        line.push_str(", cancelled");
    }
    line
}

fn write_crc_table(output: Option<&Path>) -> Result<()> {
    let rendered = render_lut_bits(&crc32_lut());
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!(path = %path.display(), "Wrote CRC-32 lookup table");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
