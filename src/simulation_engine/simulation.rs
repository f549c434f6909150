// simulation.rs
use crate::communication::messages::{UpdateOutcome, UpdatePayload};
use crate::config::SimulatorConfig;
use crate::models::route::Waypoint;
use crate::simulation_engine::client::UpdateClient;

use log::info;
use std::future::Future;
use std::io::Write;
use std::time::Duration;
use tokio::time::sleep;

pub const COMPLETION_BANNER: &str = "Destination reached.";

/// How long an interrupted run waits for the request in flight.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// What happened at one waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub index: usize,
    pub waypoint: Waypoint,
    pub outcome: UpdateOutcome,
}

impl StepRecord {
    /// Console line printed for this step.
    pub fn status_line(&self) -> String {
        match &self.outcome {
            UpdateOutcome::Triggered(signal) => {
                format!("{} | Signal triggered: {}", self.waypoint, signal)
            }
            UpdateOutcome::Cruising => format!("{} | Cruising", self.waypoint),
            UpdateOutcome::Failed(code) => format!("Failed to update: {}", code),
            UpdateOutcome::Error(e) => format!("Error connecting to backend: {}", e),
        }
    }
}

/// Per-waypoint outcomes of a finished run, in route order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationReport {
    pub steps: Vec<StepRecord>,
}

impl SimulationReport {
    pub fn requests_sent(&self) -> usize {
        self.steps.len()
    }

    pub fn triggered_signals(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match &step.outcome {
                UpdateOutcome::Triggered(signal) => Some(signal.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| !s.outcome.is_success()).count()
    }
}

/// Drives one vehicle along its route, one update per waypoint.
pub struct Simulator {
    config: SimulatorConfig,
    client: UpdateClient,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let client = UpdateClient::new(&config.endpoint, config.timeout());
        Self { config, client }
    }

    /// Sends the update for a single waypoint. The blocking request runs on
    /// Tokio's blocking pool and is awaited before returning.
    pub async fn step(&self, index: usize, waypoint: Waypoint) -> StepRecord {
        let payload = UpdatePayload::new(&self.config.vehicle_id, &waypoint);
        let client = self.client.clone();
        let outcome = tokio::task::spawn_blocking(move || client.send_update(&payload))
            .await
            .unwrap_or_else(|e| UpdateOutcome::Error(format!("update task failed: {}", e)));
        StepRecord {
            index,
            waypoint,
            outcome,
        }
    }

    /// Main simulation loop, printing to stdout.
    pub async fn run(&self) -> SimulationReport {
        self.run_with_output(&mut std::io::stdout()).await
    }

    /// Main simulation loop. Every waypoint is sent exactly once, in order;
    /// no outcome stops the loop. Sleeps the configured interval between
    /// waypoints (not after the last one). Console lines go to `out`.
    pub async fn run_with_output<W: Write>(&self, out: &mut W) -> SimulationReport {
        let route = &self.config.route;
        for line in self.start_banner() {
            writeln!(out, "{}", line).ok();
        }
        info!(
            "Posting updates to {} every {:.2}s (timeout {:.1}s)",
            self.client.endpoint(),
            self.config.interval_seconds,
            self.config.timeout_seconds
        );

        let mut report = SimulationReport::default();
        let interval = self.config.interval();
        for (index, waypoint) in route.iter().enumerate() {
            let record = self.step(index, *waypoint).await;
            writeln!(out, "{}", record.status_line()).ok();
            report.steps.push(record);

            if index + 1 < route.len() {
                sleep(interval).await;
            }
        }

        writeln!(out, "{}", COMPLETION_BANNER).ok();
        out.flush().ok();
        info!(
            "Sent {} updates, {} failed, signals triggered: {:?}",
            report.requests_sent(),
            report.failures(),
            report.triggered_signals()
        );
        report
    }

    /// Runs the loop on its own Tokio runtime until the route is done or
    /// `shutdown` resolves. Returns `None` when interrupted; in that case the
    /// request in flight is abandoned instead of waited for.
    pub fn run_blocking<F>(&self, shutdown: F) -> std::io::Result<Option<SimulationReport>>
    where
        F: Future<Output = ()>,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let report = runtime.block_on(async {
            tokio::select! {
                report = self.run() => Some(report),
                _ = shutdown => None,
            }
        });
        if report.is_none() {
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
        }
        Ok(report)
    }

    fn start_banner(&self) -> [String; 2] {
        [
            format!("Starting simulation for vehicle {}...", self.config.vehicle_id),
            format!(
                "Route: {} ({} waypoints)",
                self.config.route.name,
                self.config.route.len()
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines() {
        let waypoint = Waypoint::new(16.5062, 80.648);
        let line = |outcome| {
            StepRecord {
                index: 0,
                waypoint,
                outcome,
            }
            .status_line()
        };
        assert_eq!(
            line(UpdateOutcome::Triggered("SIG-BENZ".to_string())),
            "[16.5062, 80.6480] | Signal triggered: SIG-BENZ"
        );
        assert_eq!(line(UpdateOutcome::Cruising), "[16.5062, 80.6480] | Cruising");
        assert_eq!(line(UpdateOutcome::Failed(500)), "Failed to update: 500");
        assert_eq!(
            line(UpdateOutcome::Error("connection refused".to_string())),
            "Error connecting to backend: connection refused"
        );
    }

    #[test]
    fn report_counts() {
        let waypoint = Waypoint::new(16.5, 80.6);
        let report = SimulationReport {
            steps: vec![
                StepRecord { index: 0, waypoint, outcome: UpdateOutcome::Cruising },
                StepRecord { index: 1, waypoint, outcome: UpdateOutcome::Triggered("SIG-NTR".into()) },
                StepRecord { index: 2, waypoint, outcome: UpdateOutcome::Failed(503) },
            ],
        };
        assert_eq!(report.requests_sent(), 3);
        assert_eq!(report.failures(), 1);
        assert_eq!(report.triggered_signals(), vec!["SIG-NTR"]);
    }
}
