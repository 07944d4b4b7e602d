//! # Visualize Demo
//!
//! Headless simulation loop that draws orbiting bodies every tick into an
//! in-memory sink and logs the pool statistics.
//!
//! ```text
//! cargo run --bin visualize_demo -- --ticks 240 --cache --config demo.ron
//! RUST_LOG=debug cargo run --bin visualize_demo
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use visualize::{Color3, ConfigOverride, FixedStepClock, RecordingSink, Vec3};
use visualize_core::math::{Pose, pose_look_at};

/// Visualize demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "visualize_demo",
    about = "Draw orbiting bodies through the pooled debug drawer"
)]
struct Args {
    /// Number of simulation ticks to run.
    #[arg(long, default_value = "120")]
    ticks: u32,

    /// Simulation rate in ticks per second.
    #[arg(long, default_value = "60")]
    hz: u32,

    /// Number of orbiting bodies.
    #[arg(long, default_value = "6")]
    bodies: usize,

    /// Reuse drawables between ticks instead of recreating them.
    #[arg(long)]
    cache: bool,

    /// Render vectors as cylinders instead of cones.
    #[arg(long)]
    vector_line: bool,

    /// RON file with default setting overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log pool statistics every N ticks.
    #[arg(long, default_value = "30")]
    report_every: u32,
}

struct Body {
    radius: f32,
    speed: f32,
    phase: f32,
    color: Color3,
}

impl Body {
    fn position(&self, time: f32) -> Vec3 {
        let angle = self.phase + self.speed * time;
        Vec3::new(self.radius * angle.cos(), 0.0, self.radius * angle.sin())
    }

    fn velocity(&self, time: f32) -> Vec3 {
        let angle = self.phase + self.speed * time;
        Vec3::new(-angle.sin(), 0.0, angle.cos()) * (self.radius * self.speed)
    }
}

const PALETTE: [Color3; 6] = [
    Color3::RED,
    Color3::GREEN,
    Color3::BLUE,
    Color3::YELLOW,
    Color3::CYAN,
    Color3::MAGENTA,
];

fn spawn_bodies(count: usize) -> Vec<Body> {
    (0..count)
        .map(|i| {
            let t = i as f32 / count.max(1) as f32;
            Body {
                radius: 2.0 + 1.5 * i as f32,
                speed: 1.0 / (1.0 + i as f32 * 0.5),
                phase: t * std::f32::consts::TAU,
                color: PALETTE[i % PALETTE.len()],
            }
        })
        .collect()
}

fn load_overrides(args: &Args) -> Result<ConfigOverride, Box<dyn std::error::Error>> {
    let mut overlay = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            log::info!("Loaded config overrides from {}", path.display());
            ConfigOverride::from_ron_str(&text)?
        }
        None => ConfigOverride::new(),
    };
    if args.cache {
        overlay.merge(&ConfigOverride::new().with_cache_adornments(true));
    }
    if args.vector_line {
        overlay.merge(&ConfigOverride::new().with_vector_line(true));
    }
    Ok(overlay)
}

fn draw_tick(bodies: &[Body], time: f32) -> Result<(), visualize::DrawError> {
    visualize::frame(&Pose::identity(), Some(Color3::WHITE))?;

    let mut previous: Option<Vec3> = None;
    for body in bodies {
        let position = body.position(time);
        visualize::point(position, Some(body.color))?;
        visualize::vector(position, body.velocity(time), Some(body.color))?;
        if let Some(previous) = previous {
            visualize::line(previous, position, None)?;
        }
        previous = Some(position);
    }

    if let Some(last) = bodies.last() {
        let eye = Vec3::new(0.0, 5.0, 0.0);
        visualize::frame(&pose_look_at(eye, last.position(time)), None)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    visualize::configure(&load_overrides(&args)?);

    let sink = RecordingSink::new();
    let mut clock = FixedStepClock::new(args.hz);
    let step = clock.step();
    let visualizer = visualize::init(sink.clone(), &mut clock)?;

    let bodies = spawn_bodies(args.bodies);
    log::info!(
        "Running {} ticks at {} Hz with {} bodies",
        args.ticks,
        args.hz,
        bodies.len()
    );

    let mut elapsed = Duration::ZERO;
    for tick in 1..=args.ticks {
        draw_tick(&bodies, elapsed.as_secs_f32())?;
        clock.advance(step);
        elapsed += step;

        if args.report_every > 0 && tick % args.report_every == 0 {
            let stats = visualizer.stats();
            log::info!(
                "tick {:>5}: vectors {}/{} points {}/{} lines {}/{} live {}",
                tick,
                stats.vectors.used,
                stats.vectors.unused,
                stats.points.used,
                stats.points.unused,
                stats.lines.used,
                stats.lines.unused,
                sink.live_count()
            );
        }
    }

    log::info!(
        "Done: created {} destroyed {} live {}",
        sink.created_count(),
        sink.destroyed_count(),
        sink.live_count()
    );
    Ok(())
}
