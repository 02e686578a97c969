//! skyline_live: interactive entry point.
//!
//! ```text
//! skyline_live <mask.png> [--config FILE] [--seed N]
//! ```

use std::path::PathBuf;

use log::error;
use skyline_live::app::{run, AppConfig};
use skyline_sim::{SceneConfig, SceneError};

struct Args {
    mask:   String,
    config: Option<String>,
    seed:   Option<u64>,
}

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Skyline: a city that listens to your hand           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse simulation  (use --features leap for hardware)");
    println!();

    let args = match parse_args(std::env::args().skip(1).collect()) {
        Some(a) => a,
        None => {
            eprintln!("usage: skyline_live <mask.png> [--config FILE] [--seed N]");
            std::process::exit(2);
        }
    };

    let cfg = match app_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    println!("  Click or press R to reset, Q to quit.");
    println!();

    if let Err(e) = run(cfg) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn app_config(args: &Args) -> Result<AppConfig, SceneError> {
    let mut scene = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        scene = scene.with_seed(seed);
    }
    Ok(AppConfig { mask_path: PathBuf::from(&args.mask), scene })
}

fn parse_args(raw: Vec<String>) -> Option<Args> {
    let mut mask = None;
    let mut config = None;
    let mut seed = None;

    let mut it = raw.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => config = Some(it.next()?),
            "--seed" => seed = Some(it.next()?.parse().ok()?),
            _ if mask.is_none() => mask = Some(arg),
            _ => return None,
        }
    }
    Some(Args { mask: mask?, config, seed })
}
