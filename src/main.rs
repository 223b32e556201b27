use log::{error, info};

use landing::config;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging; the page still works without it
    let _ = console_log::init_with_level(config::log_level());

    info!("Starting landing page");
    if let Err(err) = landing::web::run() {
        error!("landing page setup failed: {}", err);
    }
}
