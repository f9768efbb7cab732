//! replay — drives the visualizer engine on a stepped clock and exports
//! every frame to CSV.
//!
//! Without `--states` a synthetic bus line is replayed.  With `--states` the
//! saved-state JSONL files of a finished simulation are served from memory,
//! answering requests the way the simulation server does.
//!
//! ```text
//! RUST_LOG=debug replay --speed 20 --output out/
//! replay --states sim/saved_simulations --polylines sim/polylines.json --simulation sim/simulation.json
//! ```

mod scenario;
mod source;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use mmv_animation::Frame;
use mmv_control::{FrameObserver, Request, Visualizer, VisualizerConfig};
use mmv_core::{SimulationStatus, Timestamp};
use mmv_model::{AllPolylines, Simulation, load_polylines_json, load_simulation_json, load_states_dir};
use mmv_output::{FrameCsvWriter, FrameOutputObserver, FrameWriter};

use scenario::Scenario;
use source::ReplaySource;

// ── Constants ─────────────────────────────────────────────────────────────────

const REPLAY_SIMULATION_ID: &str = "replay";

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "replay", about = "Replay a saved multimodal simulation through the visualizer engine")]
struct Args {
    /// Directory of saved-state JSONL files; omit for the synthetic scenario.
    #[arg(long)]
    states: Option<PathBuf>,

    /// Polylines JSON (`version`, `polylinesByVehicleId`).
    #[arg(long, requires = "states")]
    polylines: Option<PathBuf>,

    /// Simulation descriptor JSON; derived from the states when omitted.
    #[arg(long, requires = "states")]
    simulation: Option<PathBuf>,

    /// Visualizer configuration JSON; missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for the CSV files.
    #[arg(short, long, default_value = "replay_output")]
    output: PathBuf,

    /// Playback speed; negative plays backwards.
    #[arg(short, long, default_value_t = 10.0, allow_hyphen_values = true)]
    speed: f64,

    /// Start at this simulation time instead of the start.
    #[arg(long)]
    seek: Option<Timestamp>,

    /// Real milliseconds between two frames.
    #[arg(long, default_value_t = 50)]
    frame_ms: u64,

    /// Stop after this many frames even if the end was not reached.
    #[arg(long, default_value_t = 20_000)]
    max_frames: u64,

    /// Export one frame out of N.
    #[arg(long, default_value_t = 1)]
    every: u64,
}

// ── Observer wrapper to count frames and requests ────────────────────────────

struct CountingObserver<W: FrameWriter> {
    inner:              FrameOutputObserver<W>,
    frames:             usize,
    states_requests:    usize,
    polylines_requests: usize,
    last_time:          Option<Timestamp>,
}

impl<W: FrameWriter> CountingObserver<W> {
    fn new(inner: FrameOutputObserver<W>) -> Self {
        Self { inner, frames: 0, states_requests: 0, polylines_requests: 0, last_time: None }
    }
}

impl<W: FrameWriter> FrameObserver for CountingObserver<W> {
    fn on_frame(&mut self, now: Duration, frame: &Frame) {
        self.frames += 1;
        self.inner.on_frame(now, frame);
    }

    fn on_request(&mut self, now: Duration, request: &Request) {
        match request {
            Request::States(_) => self.states_requests += 1,
            Request::Polylines(_) => self.polylines_requests += 1,
        }
        self.inner.on_request(now, request);
    }

    fn on_end(&mut self, last_time: Option<Timestamp>) {
        self.last_time = last_time;
        self.inner.on_end(last_time);
    }
}

// ── Setup helpers ─────────────────────────────────────────────────────────────

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(false)).init();
}

fn load_config(path: Option<&Path>) -> Result<VisualizerConfig> {
    let Some(path) = path else {
        return Ok(VisualizerConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let config: VisualizerConfig =
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// Load a saved simulation from disk.
fn load_saved(args: &Args, states_dir: &Path) -> Result<Scenario> {
    let states = load_states_dir(states_dir).with_context(|| format!("loading states from {}", states_dir.display()))?;
    if states.is_empty() {
        bail!("no saved states in {}", states_dir.display());
    }

    let polylines = match &args.polylines {
        Some(path) => load_polylines_json(path).with_context(|| format!("loading {}", path.display()))?,
        None => AllPolylines::default(),
    };

    let simulation = match &args.simulation {
        Some(path) => load_simulation_json(path).with_context(|| format!("loading {}", path.display()))?,
        None => {
            let start = states.iter().map(|s| s.timestamp).fold(f64::INFINITY, f64::min);
            let end = states.iter().map(|s| s.end_timestamp()).fold(f64::NEG_INFINITY, f64::max);
            let mut simulation = Simulation::new(REPLAY_SIMULATION_ID, SimulationStatus::Completed);
            simulation.name = states_dir.display().to_string();
            simulation.simulation_start_time = Some(start);
            simulation.simulation_end_time = Some(end);
            simulation.last_update_order = states.iter().map(|s| s.end_order()).max();
            simulation.polylines_version = polylines.version;
            simulation
        }
    };

    Ok(Scenario { simulation, states, polylines })
}

/// `true` once playback sits on the edge it is moving towards with data.
fn reached_end(vis: &Visualizer, speed: f64) -> bool {
    let controller = vis.controller();
    match (controller.wanted_time(), controller.bounds()) {
        (Some(t), Some(bounds)) if !vis.is_loading() => {
            if speed > 0.0 { t >= bounds.max } else { t <= bounds.start }
        }
        _ => false,
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    println!("=== replay — multimodal visualizer engine ===");

    // 1. Configuration.
    let config = load_config(args.config.as_deref())?;
    let frame_step = Duration::from_millis(args.frame_ms.max(1));

    // 2. Data: saved simulation or synthetic scenario.
    let scenario = match &args.states {
        Some(dir) => load_saved(&args, dir)?,
        None => scenario::build()?,
    };
    let Scenario { simulation, states, polylines } = scenario;
    println!(
        "Simulation {:?}: {} saved states, {} vehicles with polylines",
        simulation.name,
        states.len(),
        polylines.by_vehicle.len()
    );

    // 3. Data source answering like the server.
    let mut source = ReplaySource::new(simulation.id.clone(), states, polylines);

    // 4. Output.
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;
    let writer = FrameCsvWriter::new(&args.output)?;
    let mut observer = CountingObserver::new(FrameOutputObserver::every(writer, args.every));

    // 5. Visualizer.
    let mut vis = Visualizer::new(config)?;
    let mut now = Duration::ZERO;
    vis.update_simulation(simulation, now)?;
    vis.controller_mut().set_speed(args.speed)?;
    if let Some(time) = args.seek {
        vis.controller_mut().set_visualization_time(time)?;
    }

    // 6. Frame loop on a stepped clock.
    let wall_start = Instant::now();
    let mut frames = 0;
    while frames < args.max_frames {
        vis.frame_observed(now, &mut source, &mut observer);
        source.deliver(&mut vis);
        frames += 1;

        if reached_end(&vis, args.speed) {
            // One more frame so the final time is exported.
            vis.frame_observed(now, &mut source, &mut observer);
            break;
        }
        now += frame_step;
    }
    let wall_time = wall_start.elapsed();

    // 7. Finish.
    vis.end(&mut observer);
    if let Some(err) = observer.inner.take_error() {
        return Err(err).context("writing frames");
    }

    info!(
        frames = observer.frames,
        states_requests = source.states_requests,
        polylines_requests = source.polylines_requests,
        cached_states = vis.cache().len(),
        "replay finished"
    );

    println!();
    println!("Frames produced:     {}", observer.frames);
    println!("Simulated real time: {:.1} s", now.as_secs_f64());
    println!("Final time:          {}", observer.last_time.map_or("-".to_owned(), |t| t.to_string()));
    println!(
        "Requests:            {} states, {} polylines",
        observer.states_requests, observer.polylines_requests
    );
    println!("Wall time:           {:.3} s", wall_time.as_secs_f64());
    println!("Output:              {}", args.output.display());

    Ok(())
}
