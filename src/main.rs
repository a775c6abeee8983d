use actix_web::{web, App, HttpServer};
use log::info;

use tictactoe_web_app::routes::configure_routes;
use tictactoe_web_app::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting tic-tac-toe server at http://127.0.0.1:8080");

    // Create shared application state
    let app_state = web::Data::new(AppState::new());

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(configure_routes)
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
