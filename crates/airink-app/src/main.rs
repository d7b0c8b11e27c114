//! Main application entry point (native).

fn main() {
    env_logger::init();
    log::info!("Starting AirInk");

    airink_app::App::run();
}
