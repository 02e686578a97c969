//! skyline_snapshot: render a scripted hand sweep headlessly to a PNG.
//!
//! ```text
//! skyline_snapshot <mask.png> <out.png> [--frames N] [--seed N] [--config FILE]
//! ```
//!
//! The virtual hand rises on the left, drifts across the centre, then sinks
//! below the centre line so the last frame shows a partly darkened city.

use std::process;

use glam::Vec2;
use log::{error, info};
use skyline_sim::{FrameBuffer, HandFrame, Scene, SceneConfig, SceneError, SkylineMask};

const CAMERA: Vec2 = Vec2::new(640.0, 480.0);

struct Args {
    mask: String,
    out: String,
    frames: u64,
    seed: Option<u64>,
    config: Option<String>,
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1).collect()) {
        Some(a) => a,
        None => {
            eprintln!("usage: skyline_snapshot <mask.png> <out.png> [--frames N] [--seed N] [--config FILE]");
            process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SceneError> {
    let mut cfg = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg = cfg.with_seed(seed);
    }

    let mask = SkylineMask::load(&args.mask)?;
    let mut scene = Scene::new(mask, cfg);
    let mut fb = FrameBuffer::new(scene.width(), scene.height());

    for i in 0..args.frames {
        let tip = scripted_fingertip(i as f32 / args.frames.max(1) as f32);
        let hands = HandFrame::single(CAMERA, tip);
        let pointer = tip / CAMERA * Vec2::new(scene.width() as f32, scene.height() as f32);
        scene.frame(&mut fb, Some(&hands), pointer);
    }

    fb.to_rgba_image().save(&args.out)?;
    info!(
        "wrote {} after {} frames: density {:.3}, {} clouds, {} lit windows",
        args.out,
        args.frames,
        scene.density(),
        scene.state().clouds.len(),
        scene.state().windows.lit_count()
    );
    Ok(())
}

/// Fingertip position along the script, `t` in [0, 1).
fn scripted_fingertip(t: f32) -> Vec2 {
    let (x, y) = if t < 1.0 / 3.0 {
        (0.25, 0.3)
    } else if t < 2.0 / 3.0 {
        (0.5 + (t - 1.0 / 3.0) * 1.2, 0.5)
    } else {
        (0.7, 0.85)
    };
    Vec2::new(x, y) * CAMERA
}

fn parse_args(raw: Vec<String>) -> Option<Args> {
    let mut positional = Vec::new();
    let mut frames = 120;
    let mut seed = None;
    let mut config = None;

    let mut it = raw.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--frames" => frames = it.next()?.parse().ok()?,
            "--seed" => seed = Some(it.next()?.parse().ok()?),
            "--config" => config = Some(it.next()?),
            _ => positional.push(arg),
        }
    }
    if positional.len() != 2 {
        return None;
    }
    let out = positional.pop()?;
    let mask = positional.pop()?;
    Some(Args { mask, out, frames, seed, config })
}
