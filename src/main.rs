use vehicle_route_sim::config::SimulatorConfig;
use vehicle_route_sim::simulation_engine::simulation::Simulator;

fn main() {
    env_logger::init();

    let config = match SimulatorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Ok(json) = serde_json::to_string(&config) {
        log::debug!("Effective config: {}", json);
    }

    let simulator = Simulator::new(config);
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    match simulator.run_blocking(ctrl_c) {
        Ok(Some(_)) => {}
        Ok(None) => println!("Simulation interrupted."),
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            std::process::exit(1);
        }
    }
}
