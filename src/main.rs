use clap::{Parser, ValueEnum};
use gga_position::{
    BlockingGpsApi, GpsConfig, InterfaceType, LogLevel, OutputFormat, StderrLogger,
    TransportErrorPolicy,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Print GPS positions decoded from NMEA GGA sentences
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device of the receiver
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Read sentences from standard input
    #[arg(long, conflicts_with_all = ["port", "replay"])]
    stdin: bool,

    /// Replay sentences from a recorded log file
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Sentence tag to decode
    #[arg(long)]
    tag: Option<String>,

    /// Number of readings to take (default: run until stopped)
    #[arg(short = 'n', long)]
    readings: Option<u32>,

    /// Delay between readings in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Stop on transport failures instead of retrying
    #[arg(long)]
    fail_on_transport_error: bool,

    /// Diagnostic verbosity
    #[arg(short, long, value_enum)]
    log_level: Option<LevelArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
    None,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

impl From<LevelArg> for LogLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::None => LogLevel::None,
            LevelArg::Error => LogLevel::Error,
            LevelArg::Warn => LogLevel::Warn,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Trace => LogLevel::Trace,
        }
    }
}

impl Cli {
    /// Configuration file (or defaults) with command line overrides applied
    fn load_config(&self) -> Result<GpsConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => GpsConfig::load_from_file(path)?,
            None => GpsConfig::default(),
        };

        if let Some(port) = &self.port {
            config.transport.interface = InterfaceType::Serial;
            config.transport.port_name = port.clone();
        }
        if let Some(baud) = self.baud {
            config.transport.baud_rate = baud;
        }
        if self.stdin {
            config.transport.interface = InterfaceType::Stdin;
        }
        if let Some(path) = &self.replay {
            config.transport.interface = InterfaceType::Replay;
            config.transport.replay_path = Some(path.clone());
        }
        if let Some(tag) = &self.tag {
            config.position_tag = tag.clone();
        }
        if self.readings.is_some() {
            config.readings = self.readings;
        }
        if let Some(interval) = self.interval_ms {
            config.poll_interval_ms = interval;
        }
        if let Some(format) = self.format {
            config.output_format = format.into();
        }
        if self.fail_on_transport_error {
            config.transport_error_policy = TransportErrorPolicy::Propagate;
        }
        if let Some(level) = self.log_level {
            config.log_level = level.into();
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(config: &GpsConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut api = BlockingGpsApi::from_config(config)?;
    let interval = Duration::from_millis(config.poll_interval_ms);
    let text_output = config.output_format == OutputFormat::Text;

    let taken = api.run(config.readings, interval, |output| {
        println!("{}", output);
        if text_output {
            println!();
        }
    })?;

    let state = api.get_system_state();
    info!(
        "Finished after {} readings ({} attempts, {} rejected, {} lines discarded)",
        taken,
        state.decoder.attempts,
        state.decoder.rejected(),
        state.discarded_lines
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = StderrLogger::init(config.log_level) {
        eprintln!("Failed to install logger: {}", e);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
