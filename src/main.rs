use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use geofence::config::FileConfig;
use geofence::geometry::{degrees_to_meters, min_distance_to_boundary};
use geofence::{GraceMargin, LatLng, Membership, ZoneKind, ZoneSet};

/// Exit status when a checked point is served by no selected zone.
/// Distinct from clap's usage-error status (2).
const NOT_SERVED_EXIT: u8 = 1;

/// Check delivery coordinates against configured service-area polygons
///
/// Examples:
///   # Is this address inside the home delivery zone?
///   geofence --settings zones.json check --lat 4.72 --lng -74.05 --zone home
///
///   # Strict check without boundary tolerance
///   geofence check --lat 4.72 --lng -74.05 --margin 0
///
///   # Evaluate a file of points and write a JSON report
///   geofence batch --input points.json --output report.json
#[derive(Parser, Debug)]
#[command(name = "geofence")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches geofence.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON settings document containing the zone polygons
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Grace margin in meters around zone boundaries (default 300)
    #[arg(short = 'm', long, global = true)]
    margin: Option<f64>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a single coordinate
    Check {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Zone to check: home (b2c) or institutional (b2b); all zones if omitted
        #[arg(short = 'z', long)]
        zone: Option<ZoneKind>,
    },
    /// Check every coordinate in a JSON array of {lat, lng} objects
    Batch {
        #[arg(short = 'i', long)]
        input: PathBuf,

        #[arg(short = 'z', long)]
        zone: Option<ZoneKind>,

        /// Write a JSON report of every result
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// List configured zones
    Zones,
}

/// Settings after merging CLI flags, config file and defaults
#[derive(Debug, PartialEq)]
struct RunConfig {
    margin: GraceMargin,
    settings: PathBuf,
    default_zone: Option<ZoneKind>,
    verbose: bool,
}

impl RunConfig {
    /// CLI flags win over the config file, which wins over defaults
    fn resolve(args: &Args, file_config: Option<&FileConfig>) -> Result<Self> {
        let margin = match args.margin {
            Some(m) => GraceMargin::new(m).context("Invalid --margin")?,
            None => file_config.map(|c| c.grace_margin()).unwrap_or_default(),
        };
        let settings = args
            .settings
            .clone()
            .or_else(|| file_config.and_then(|c| c.settings.clone()));
        let Some(settings) = settings else {
            bail!("No zone settings given: pass --settings or set `settings` in geofence.toml");
        };

        Ok(Self {
            margin,
            settings,
            default_zone: file_config.and_then(|c| c.zone),
            verbose: args.verbose || file_config.map(|c| c.verbose).unwrap_or(false),
        })
    }
}

/// One zone's answer for a checked point
#[derive(Debug, PartialEq)]
struct CheckLine {
    kind: ZoneKind,
    membership: Membership,
    /// Approximate distance to the boundary, absent for strict hits
    distance_m: Option<f64>,
}

#[derive(Debug, Serialize)]
struct BatchRow {
    lat: f64,
    lng: f64,
    zones: BTreeMap<ZoneKind, Membership>,
}

#[derive(Debug, Default)]
struct BatchReport {
    rows: Vec<BatchRow>,
    served: usize,
    rejected: usize,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let file_config = if let Some(ref config_path) = args.config {
        Some(FileConfig::load_from(config_path)?)
    } else {
        FileConfig::load()
    };
    let config = RunConfig::resolve(&args, file_config.as_ref())?;
    init_logging(config.verbose);

    if config.verbose {
        println!("Configuration:");
        println!("  Settings: {}", config.settings.display());
        println!("  Grace margin: {}", config.margin);
        if let Some(zone) = config.default_zone {
            println!("  Default zone: {}", zone);
        }
        println!();
    }

    let zones = ZoneSet::load(&config.settings)?;
    if zones.is_empty() {
        bail!("No zone polygons found in {:?}", config.settings);
    }

    match args.command {
        Command::Check { lat, lng, zone } => {
            let lines = check_point(
                &zones,
                LatLng::new(lat, lng),
                zone.or(config.default_zone),
                config.margin,
            )?;
            print_check(LatLng::new(lat, lng), &lines);
            Ok(ExitCode::from(check_status(&lines)))
        }
        Command::Batch {
            input,
            zone,
            output,
        } => {
            let start = Instant::now();
            let points = read_points(&input)?;
            let pb = ProgressBar::new(points.len() as u64);
            pb.set_style(
                ProgressStyle::with_template("{bar:40.green} {pos}/{len} points {msg}")?
                    .progress_chars("=> "),
            );

            let report =
                evaluate_batch(&zones, points, zone.or(config.default_zone), config.margin, &pb)?;
            pb.finish_with_message(format!("[{:.1}s]", start.elapsed().as_secs_f32()));
            print_batch_summary(&report);

            if let Some(path) = output {
                write_report(&report, &path)?;
                println!("Report written to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Zones => {
            list_zones(&zones);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn selected_zones(zones: &ZoneSet, zone: Option<ZoneKind>) -> Result<Vec<ZoneKind>> {
    match zone {
        Some(kind) => {
            if zones.zone(kind).is_none() {
                bail!("Zone '{}' is not configured", kind);
            }
            Ok(vec![kind])
        }
        None => Ok(zones.iter().map(|(kind, _)| kind).collect()),
    }
}

fn check_point(
    zones: &ZoneSet,
    point: LatLng,
    zone: Option<ZoneKind>,
    margin: GraceMargin,
) -> Result<Vec<CheckLine>> {
    let point = LatLng::validated(point.lat, point.lng).context("Invalid coordinate")?;

    selected_zones(zones, zone)?
        .into_iter()
        .map(|kind| {
            let membership = zones.check(kind, point, margin)?;
            let distance_m = match membership {
                Membership::Inside => None,
                Membership::WithinMargin | Membership::Outside => zones
                    .zone(kind)
                    .and_then(|p| min_distance_to_boundary(point, &p.vertices))
                    .map(degrees_to_meters),
            };
            Ok(CheckLine {
                kind,
                membership,
                distance_m,
            })
        })
        .collect()
}

fn check_status(lines: &[CheckLine]) -> u8 {
    if lines.iter().any(|l| l.membership.is_served()) {
        0
    } else {
        NOT_SERVED_EXIT
    }
}

fn print_check(point: LatLng, lines: &[CheckLine]) {
    for line in lines {
        let detail = match (line.membership, line.distance_m) {
            (Membership::Inside, _) => "inside".to_string(),
            (membership, distance) => {
                let label = if membership.is_served() {
                    "within margin"
                } else {
                    "outside"
                };
                format!(
                    "{} (~{:.0}m from boundary)",
                    label,
                    distance.unwrap_or(f64::INFINITY)
                )
            }
        };
        println!(
            "{:<14} ({:.5}, {:.5}): {}",
            line.kind, point.lat, point.lng, detail
        );
    }
}

fn read_points(input: &Path) -> Result<Vec<LatLng>> {
    let contents = std::fs::read_to_string(input)
        .context(format!("Failed to read input file: {:?}", input))?;
    serde_json::from_str(&contents).context("Input must be a JSON array of {lat, lng}")
}

fn evaluate_batch(
    zones: &ZoneSet,
    points: Vec<LatLng>,
    zone: Option<ZoneKind>,
    margin: GraceMargin,
    pb: &ProgressBar,
) -> Result<BatchReport> {
    let kinds = selected_zones(zones, zone)?;
    let mut report = BatchReport {
        rows: Vec::with_capacity(points.len()),
        ..Default::default()
    };

    for point in points {
        pb.inc(1);
        let point = match point.validate() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Skipping point: {}", e);
                report.rejected += 1;
                continue;
            }
        };

        let mut results = BTreeMap::new();
        for &kind in &kinds {
            results.insert(kind, zones.check(kind, point, margin)?);
        }
        if results.values().any(|m| m.is_served()) {
            report.served += 1;
        }
        report.rows.push(BatchRow {
            lat: point.lat,
            lng: point.lng,
            zones: results,
        });
    }

    Ok(report)
}

fn print_batch_summary(report: &BatchReport) {
    println!();
    println!("Points evaluated: {}", report.rows.len());
    println!("  Served:   {}", report.served);
    println!("  Outside:  {}", report.rows.len() - report.served);
    if report.rejected > 0 {
        println!("  Rejected: {} (invalid coordinates)", report.rejected);
    }
}

fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&report.rows).context("Failed to serialize report")?;
    std::fs::write(path, json).context(format!("Failed to write report: {:?}", path))
}

fn list_zones(zones: &ZoneSet) {
    println!("Configured zones:");
    for (kind, polygon) in zones.iter() {
        let status = if polygon.is_valid() { "" } else { " (invalid: < 3 vertices)" };
        match polygon.bounds() {
            Some(b) => println!(
                "  {:<14} {:>3} vertices  lat {:.4}..{:.4}  lng {:.4}..{:.4}{}",
                kind,
                polygon.len(),
                b.south,
                b.north,
                b.west,
                b.east,
                status
            ),
            None => println!("  {:<14}   0 vertices{}", kind, status),
        }
    }
}
