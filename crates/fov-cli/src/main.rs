use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use fov_core::xr::Fovf;
use fov_core::{
    AnglePair, BaselineFov, FovState, Setting, SettingsStore, millidegrees_to_degrees,
    scale_to_thousandths, thousandths_to_scale,
};
use fov_store::{LayerConfig, SettingsDb, paths};

#[derive(Parser)]
#[command(name = "fovctl", about = "Inspect and edit the field-of-view layer settings")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every setting with its interpreted value
    Show {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print one raw setting
    Get {
        /// angle_up, angle_down, fov_up or fov_down
        setting: Setting,
    },

    /// Write one raw setting
    Set {
        setting: Setting,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// Write the vertical scale factors
    Scale {
        /// Upward scale, e.g. 0.9
        #[arg(long)]
        up: Option<f64>,

        /// Downward scale, e.g. 0.9
        #[arg(long)]
        down: Option<f64>,
    },

    /// Remove settings so the defaults (or the next capture) apply
    Unset {
        #[arg(required = true)]
        settings: Vec<Setting>,
    },

    /// Apply the stored settings to a hypothetical runtime report
    Preview {
        /// Recommended image rect height reported by the runtime
        #[arg(long)]
        height: u32,

        /// Recommended image rect width reported by the runtime
        #[arg(long)]
        width: Option<u32>,

        /// Upward half-angle reported by the runtime, radians
        #[arg(long, requires = "angle_down", allow_negative_numbers = true)]
        angle_up: Option<f64>,

        /// Downward half-angle reported by the runtime, radians (usually negative)
        #[arg(long, requires = "angle_up", allow_negative_numbers = true)]
        angle_down: Option<f64>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct SettingReport {
    setting: Setting,
    value: Option<i64>,
    effective: i64,
    interpreted: f64,
    unit: &'static str,
}

#[derive(Serialize)]
struct PreviewReport {
    state: FovState,
    width: Option<u32>,
    height: u32,
    corrected_height: u32,
    reported: Fovf,
    corrected: Fovf,
}

impl SettingReport {
    fn new(setting: Setting, value: Option<i64>) -> Self {
        let effective = value.unwrap_or_else(|| setting.default_value());
        let (interpreted, unit) = if setting.is_angle() {
            (millidegrees_to_degrees(effective), "degrees")
        } else {
            (thousandths_to_scale(effective), "scale")
        };
        Self {
            setting,
            value,
            effective,
            interpreted,
            unit,
        }
    }
}

fn data_dir() -> PathBuf {
    paths::resolve_base_dir(None)
}

fn open_settings() -> Result<SettingsDb> {
    let base = data_dir();
    std::fs::create_dir_all(&base)
        .with_context(|| format!("failed to create {}", base.display()))?;
    let config = LayerConfig::load(&paths::config_path(&base)).context("failed to load layer config")?;
    let db = SettingsDb::open(&paths::settings_path(&base))
        .context("failed to open settings database")?;
    Ok(db.with_namespace(&config.namespace))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Show { json } => cmd_show(*json),
        Commands::Get { setting } => cmd_get(*setting),
        Commands::Set { setting, value } => cmd_set(*setting, *value),
        Commands::Scale { up, down } => cmd_scale(*up, *down),
        Commands::Unset { settings } => cmd_unset(settings),
        Commands::Preview {
            height,
            width,
            angle_up,
            angle_down,
            json,
        } => cmd_preview(*height, *width, angle_up.zip(*angle_down), *json),
    }
}

fn cmd_show(json: bool) -> Result<()> {
    let db = open_settings()?;
    let reports: Vec<SettingReport> = db
        .list()
        .context("failed to read settings")?
        .into_iter()
        .map(|(setting, value)| SettingReport::new(setting, value))
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&reports).context("failed to serialize settings")?;
        println!("{out}");
        return Ok(());
    }

    println!("namespace:  {}", db.namespace());
    for report in &reports {
        let raw = match report.value {
            Some(value) => value.to_string(),
            None => "unset".to_string(),
        };
        println!(
            "{:<11} {:>8}  ({} {})",
            format!("{}:", report.setting),
            raw,
            report.interpreted,
            report.unit
        );
    }
    Ok(())
}

fn cmd_get(setting: Setting) -> Result<()> {
    let db = open_settings()?;
    match db.get_value(setting).context("failed to read setting")? {
        Some(value) => println!("{value}"),
        None => println!("unset (default {})", setting.default_value()),
    }
    Ok(())
}

fn cmd_set(setting: Setting, value: i64) -> Result<()> {
    let db = open_settings()?;
    db.set_value(setting, value)
        .with_context(|| format!("failed to write {setting}"))?;
    println!("{setting} = {value}");
    Ok(())
}

fn cmd_scale(up: Option<f64>, down: Option<f64>) -> Result<()> {
    if up.is_none() && down.is_none() {
        bail!("nothing to do: pass --up and/or --down");
    }

    let db = open_settings()?;
    for (setting, scale) in [(Setting::FovUp, up), (Setting::FovDown, down)] {
        let Some(scale) = scale else { continue };
        if !scale.is_finite() || scale <= 0.0 {
            bail!("{setting} scale must be a positive number, got {scale}");
        }
        let value = scale_to_thousandths(scale);
        db.set_value(setting, value)
            .with_context(|| format!("failed to write {setting}"))?;
        println!("{setting} = {value}");
    }
    Ok(())
}

fn cmd_unset(settings: &[Setting]) -> Result<()> {
    let db = open_settings()?;
    for setting in settings {
        let removed = db
            .remove(*setting)
            .with_context(|| format!("failed to remove {setting}"))?;
        if removed {
            println!("removed {setting}");
        } else {
            println!("{setting} was not set");
        }
    }
    Ok(())
}

fn cmd_preview(
    height: u32,
    width: Option<u32>,
    angles: Option<(f64, f64)>,
    json: bool,
) -> Result<()> {
    let db = open_settings()?;

    let mut state = FovState::new();
    state.load_scale(&db);
    let reported = match angles {
        // A live session would capture these before correcting.
        Some((up, down)) => {
            state = FovState::with_values(
                BaselineFov::symmetric(AnglePair::new(up.abs(), down.abs())),
                state.scale(),
            );
            (up, down)
        }
        None => {
            state.load_baseline(&db);
            let pair = state.baseline().view(0).unwrap_or_default();
            (pair.up, -pair.down)
        }
    };

    let reported = Fovf {
        angle_up: reported.0 as f32,
        angle_down: reported.1 as f32,
        ..Fovf::default()
    };
    let mut fov = reported;
    state.correct_fov(&mut fov);
    let corrected_height = state.rect_height(0, height);

    if json {
        let report = PreviewReport {
            state,
            width,
            height,
            corrected_height,
            reported,
            corrected: fov,
        };
        let out = serde_json::to_string_pretty(&report).context("failed to serialize preview")?;
        println!("{out}");
        return Ok(());
    }

    let scale = state.scale();
    println!("scale:      up {} down {}", scale.up, scale.down);
    if let Some(width) = width {
        println!("width:      {width}");
    }
    println!("height:     {height} -> {corrected_height}");
    println!(
        "angle_up:   {:.4} -> {:.4} rad",
        f64::from(reported.angle_up),
        f64::from(fov.angle_up)
    );
    println!(
        "angle_down: {:.4} -> {:.4} rad",
        f64::from(reported.angle_down),
        f64::from(fov.angle_down)
    );

    if db.get(Setting::AngleUp).is_none() && angles.is_none() {
        tracing::info!("no captured angles yet, using defaults");
    }
    Ok(())
}
