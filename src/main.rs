use std::net::SocketAddr;

use log::{error, info};
use tracing_subscriber::EnvFilter;

use money_manager::{config::Config, db::Db, router};

#[tokio::main]
async fn main() {
    let config = Config::load();

    tracing_subscriber::fmt()
        .with_thread_ids(true)
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    info!("started with {:?}", config);

    let db = match &config.db_path {
        Some(path) => Db::open(path),
        None => {
            info!("no database path given, transactions are kept in memory");
            Db::new()
        }
    };
    let db = match db {
        Ok(db) => db,
        Err(e) => {
            error!("could not open the database: {}", e);
            std::process::exit(1);
        }
    };

    let app = router(db);
    let addr = config.socket_addr();

    let server = match axum::Server::try_bind(&addr) {
        Ok(builder) => builder,
        Err(e) => {
            error!("could not bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("listening on {}", addr);

    if let Err(e) = server
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
