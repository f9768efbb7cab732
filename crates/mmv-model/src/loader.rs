//! JSONL state loader.
//!
//! # File format
//!
//! One saved state per file.  The first line is the environment snapshot;
//! every following line is one update recorded after it:
//!
//! ```text
//! {"timestamp":0,"order":0,"passengers":[...],"vehicles":[...],"statistic":{}}
//! {"type":"createVehicle","timestamp":3,"order":1,"data":{...}}
//! {"type":"updateVehicleStatus","timestamp":5,"order":2,"data":{"id":"bus-1","status":"enroute"}}
//! ```
//!
//! Blank lines are ignored.  A directory of saved states holds one
//! `*.jsonl` file per state; file names are not interpreted, states are
//! sorted by `(timestamp, order)` after loading.

use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::entity::{Passenger, Vehicle};
use crate::polyline::AllPolylines;
use crate::simulation::Simulation;
use crate::state::SimulationState;
use crate::update::{Statistic, Update};
use crate::{ModelError, ModelResult};

// ── Wire records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EnvironmentRecord {
    timestamp:  f64,
    order:      u64,
    #[serde(default)]
    passengers: Vec<Passenger>,
    #[serde(default)]
    vehicles:   Vec<Vehicle>,
    #[serde(default)]
    statistic:  Statistic,
}

fn parse_line<'a, T: Deserialize<'a>>(line: &'a str, line_no: usize) -> ModelResult<T> {
    serde_json::from_str(line).map_err(|source| ModelError::Json { line: line_no, source })
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse one saved state from any buffered reader.
///
/// # Errors
///
/// [`ModelError::EmptyStateFile`] when no environment line is present,
/// [`ModelError::Json`] (with the 1-based line number) on malformed lines.
pub fn read_state_jsonl<R: BufRead>(reader: R) -> ModelResult<SimulationState> {
    let mut state: Option<SimulationState> = None;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match state.as_mut() {
            None => {
                let env: EnvironmentRecord = parse_line(line, i + 1)?;
                let mut s = SimulationState::new(env.timestamp, env.order);
                s.passengers = env.passengers.into_iter().map(|p| (p.id.clone(), p)).collect();
                s.vehicles = env.vehicles.into_iter().map(|v| (v.id.clone(), v)).collect();
                s.statistic = env.statistic;
                state = Some(s);
            }
            Some(s) => {
                let update: Update = parse_line(line, i + 1)?;
                s.updates.push(update);
            }
        }
    }

    state.ok_or_else(|| ModelError::EmptyStateFile("<reader>".to_owned()))
}

/// Load one saved state file.
pub fn load_state_file(path: &Path) -> ModelResult<SimulationState> {
    let file = std::fs::File::open(path)?;
    read_state_jsonl(BufReader::new(file)).map_err(|e| match e {
        ModelError::EmptyStateFile(_) => ModelError::EmptyStateFile(path.display().to_string()),
        other => other,
    })
}

/// Load every `*.jsonl` state in `dir`, sorted by `(timestamp, order)`.
pub fn load_states_dir(dir: &Path) -> ModelResult<Vec<SimulationState>> {
    let mut states = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "jsonl") {
            states.push(load_state_file(&path)?);
        }
    }
    states.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp).then(a.order.cmp(&b.order)));
    Ok(states)
}

/// Load a polylines file (`{"version": n, "polylinesByVehicleId": {...}}`).
pub fn load_polylines_json(path: &Path) -> ModelResult<AllPolylines> {
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::Json { line: 0, source })
}

/// Load a simulation descriptor.
pub fn load_simulation_json(path: &Path) -> ModelResult<Simulation> {
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::Json { line: 0, source })
}
