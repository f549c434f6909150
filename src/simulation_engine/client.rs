// client.rs
//
// Blocking HTTP client for location updates. Every exchange is folded into an
// UpdateOutcome so the simulation loop never has to deal with errors itself.

use crate::communication::messages::{parse_success_body, UpdateOutcome, UpdatePayload};
use log::{debug, warn};
use std::time::Duration;
use ureq::Agent;

#[derive(Clone)]
pub struct UpdateClient {
    agent: Agent,
    endpoint: String,
    timeout: Duration,
}

impl UpdateClient {
    /// `timeout` bounds the whole exchange, from connect to the end of the body.
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .proxy(None)
            .build();
        Self {
            agent: Agent::new_with_config(config),
            endpoint: endpoint.trim().to_string(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one update and classifies the reply. Blocks the calling thread.
    pub fn send_update(&self, payload: &UpdatePayload) -> UpdateOutcome {
        debug!(
            "POST {} id={} lat={} lng={}",
            self.endpoint, payload.id, payload.lat, payload.lng
        );
        let mut response = match self.agent.post(&self.endpoint).send_json(payload) {
            Ok(response) => response,
            Err(e) => return self.transport_error(e),
        };

        // Only 200 carries a signal verdict; 201/204 and friends are failures.
        let status = response.status();
        if status != ureq::http::StatusCode::OK {
            warn!("Backend answered {} for vehicle {}", status, payload.id);
            return UpdateOutcome::Failed(status.as_u16());
        }

        match response.body_mut().read_to_string() {
            Ok(body) => parse_success_body(&body),
            Err(e) => self.transport_error(e),
        }
    }

    fn transport_error(&self, error: ureq::Error) -> UpdateOutcome {
        let timed_out = match &error {
            ureq::Error::Timeout(_) => true,
            ureq::Error::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        };
        let description = if timed_out {
            format!("request timed out after {:.1}s", self.timeout.as_secs_f64())
        } else {
            error.to_string()
        };
        warn!("Update to {} failed: {}", self.endpoint, description);
        UpdateOutcome::Error(description)
    }
}
