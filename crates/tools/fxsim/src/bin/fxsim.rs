//! fxsim - replay device profiles and frame-rate traces through the landing page

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::PageConfig;
use clap::{Args, Parser, Subcommand};
use devices::{BatteryStatus, DeviceProfile, DeviceSignals, EffectiveConnectionType};
use fxsim::{simulate, Report, Scenario};
use logic::{Governor, Visibility};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fxsim")]
#[command(about = "Simulate the landing page effect governor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Page configuration (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a device and print its starting tier
    Profile {
        #[command(flatten)]
        device: DeviceArgs,
    },
    /// Run a session over a frame-rate trace
    Run {
        #[command(flatten)]
        device: DeviceArgs,

        /// Frames per second for each simulated second, comma separated
        #[arg(long, value_delimiter = ',', default_value = "60")]
        fps: Vec<u32>,

        /// Simulated seconds
        #[arg(long, default_value = "10")]
        duration: u32,

        /// Second at which the battery drains to 10%
        #[arg(long)]
        battery_drop_at: Option<u32>,

        /// Second at which the contact form is submitted
        #[arg(long)]
        submit_at: Option<u32>,

        /// Hide the page from this second
        #[arg(long)]
        hide_from: Option<u32>,

        /// Show the page again at this second
        #[arg(long, requires = "hide_from")]
        hide_until: Option<u32>,

        /// Seed for effect placement
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct DeviceArgs {
    /// Viewport width in CSS pixels
    #[arg(long, default_value = "1920")]
    width: u32,

    /// Viewport height in CSS pixels
    #[arg(long, default_value = "1080")]
    height: u32,

    /// navigator.deviceMemory in GB
    #[arg(long)]
    memory: Option<f32>,

    /// Effective connection type (slow-2g, 2g, 3g, 4g)
    #[arg(long)]
    connection: Option<EffectiveConnectionType>,

    /// User agent string
    #[arg(long)]
    user_agent: Option<String>,

    /// Battery level between 0 and 1
    #[arg(long)]
    battery: Option<f32>,

    /// Battery is charging
    #[arg(long, requires = "battery")]
    charging: bool,

    /// prefers-reduced-motion: reduce
    #[arg(long)]
    reduced_motion: bool,
}

impl DeviceArgs {
    fn signals(&self) -> Result<DeviceSignals> {
        let mut signals = DeviceSignals::desktop()
            .with_viewport(self.width, self.height)
            .with_reduced_motion(self.reduced_motion);
        signals.device_memory_gb = self.memory;
        signals.connection = self.connection;
        signals.user_agent = self.user_agent.clone();
        if let Some(level) = self.battery {
            let battery = BatteryStatus::try_new(level, self.charging)
                .context("Invalid --battery value")?;
            signals.battery = Some(battery);
        }
        Ok(signals)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = cli.log_level.parse().unwrap_or(tracing::Level::WARN);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.to_string().to_lowercase().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => PageConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PageConfig::default(),
    };

    match cli.command {
        Commands::Profile { device } => {
            let signals = device.signals()?;
            let profile = DeviceProfile::classify(&signals, &config.detection);
            let evaluation = Governor::standard().evaluate(&profile);
            if cli.json {
                let output = serde_json::json!({
                    "profile": profile,
                    "evaluation": evaluation,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Profile: {:?}", profile);
                println!(
                    "Tier: {} (rule: {})",
                    evaluation.tier,
                    evaluation.rule.as_deref().unwrap_or("none")
                );
                print_visibility(evaluation.visibility.iter());
            }
        }
        Commands::Run {
            device,
            fps,
            duration,
            battery_drop_at,
            submit_at,
            hide_from,
            hide_until,
            seed,
        } => {
            if seed.is_some() {
                config.seed = seed;
            }
            let mut scenario = Scenario::new(device.signals()?)
                .with_fps(fps)
                .with_duration(duration);
            scenario.battery_drop_at = battery_drop_at;
            scenario.submit_at = submit_at;
            scenario.hidden = hide_from.map(|from| (from, hide_until.unwrap_or(u32::MAX)));

            let report = simulate(&scenario, config);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
    }

    Ok(())
}

fn print_visibility(entries: impl Iterator<Item = (logic::EffectKind, Visibility)>) {
    for (kind, visibility) in entries {
        match visibility {
            Visibility::Shown { count } => println!("  {:<16} shown ({})", kind.name(), count),
            Visibility::Hidden(reason) => println!("  {:<16} hidden ({:?})", kind.name(), reason),
        }
    }
}

fn print_report(report: &Report) {
    println!(
        "Tier: {} -> {} (rule: {})",
        report.initial_tier,
        report.final_tier,
        report.rule.as_deref().unwrap_or("none")
    );
    println!("Timeline:");
    for change in &report.timeline {
        println!(
            "  {:>9.1}ms  {:<9} {:?}",
            change.at.as_millis(),
            change.tier.name(),
            change.cause
        );
    }
    if report.watchdog_tripped {
        println!("Watchdog tripped");
    }
    println!("Frames: {}  windows: {}", report.frames, report.fps_samples.len());
    println!("Effects:");
    print_visibility(report.visibility.iter());
    println!("Live nodes:");
    for (kind, count) in &report.live_nodes {
        println!("  {:<16} {}", kind.name(), count);
    }
    println!(
        "Nodes created: {}  pending timers: {}",
        report.nodes_created, report.pending_timers
    );
}
