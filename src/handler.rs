// HTTP handler bindings for the local game server
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the GameServer's methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting the GameServer instance from Rocket's managed state
// - Delegating to GameServer methods
// - Serializing responses

use log::warn;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use duel_snake::engine::Snapshot;
use duel_snake::server::{GameServer, IntentRequest};

/// GET / endpoint
/// Returns server metadata
#[get("/")]
pub fn index(server: &rocket::State<GameServer>) -> Json<Value> {
    Json(server.info())
}

/// GET /state endpoint
/// Read-only snapshot for the renderer
#[get("/state")]
pub fn state(server: &rocket::State<GameServer>) -> Json<Snapshot> {
    Json(server.snapshot())
}

/// POST /intent endpoint
/// Records a player's requested direction for the next tick
/// Accepts a direction name or a `{ "dx", "dy" }` unit vector
#[post("/intent", format = "json", data = "<request>")]
pub fn intent(server: &rocket::State<GameServer>, request: Json<IntentRequest>) -> Status {
    match server.set_intent(request.into_inner()) {
        Ok(()) => Status::Ok,
        Err(e) => {
            warn!("Rejected intent: {}", e);
            Status::BadRequest
        }
    }
}

/// POST /start endpoint
#[post("/start")]
pub fn start(server: &rocket::State<GameServer>) -> Json<Snapshot> {
    Json(server.start())
}

/// POST /pause endpoint
/// Toggles pause; ignored while the game is stopped
#[post("/pause")]
pub fn pause(server: &rocket::State<GameServer>) -> Json<Snapshot> {
    Json(server.toggle_pause())
}

/// POST /restart endpoint
/// Clears the scores and installs a fresh round
#[post("/restart")]
pub fn restart(server: &rocket::State<GameServer>) -> Json<Snapshot> {
    Json(server.restart())
}
