#[macro_use]
extern crate rocket;

use log::{error, info};
use rocket::fairing::AdHoc;
use std::env;
use std::process;

use duel_snake::config::Config;
use duel_snake::engine::RoundEngine;
use duel_snake::server::GameServer;
use duel_snake::session_log::SessionLogger;

mod handler;

#[launch]
async fn rocket() -> _ {
    // Rocket looks at `ROCKET_PORT`; honour the more common `PORT` as well.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Duel Snake server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let logger = SessionLogger::new(config.session_log.enabled, &config.session_log.path).await;

    let engine = match RoundEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Invalid game configuration: {}", e);
            process::exit(1);
        }
    };

    rocket::build()
        .manage(GameServer::new(engine, logger))
        .attach(AdHoc::on_liftoff("Tick Scheduler", |rocket| {
            Box::pin(async move {
                if let Some(server) = rocket.state::<GameServer>() {
                    server.spawn_scheduler();
                }
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::state,
                handler::intent,
                handler::start,
                handler::pause,
                handler::restart
            ],
        )
}
