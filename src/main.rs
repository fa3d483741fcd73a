use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::info;

use house_price_api::{routes, Pipeline, ServiceConfig};
use model::Artifacts;

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env().context("reading configuration")?;

    info!(
        "loading model from {} and scaler from {}",
        config.model_path.display(),
        config.scaler_path.display()
    );
    let artifacts = Artifacts::load(&config.model_path, &config.scaler_path)
        .context("loading model artifacts")?;
    let pipeline = Pipeline::from_artifacts(artifacts).context("incompatible model artifacts")?;
    info!("serving {}", pipeline.describe());

    let pipeline = web::Data::new(pipeline);
    let max_body_bytes = config.max_body_bytes;

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .wrap(Logger::default())
            .app_data(pipeline.clone())
            .configure(routes::configure(max_body_bytes))
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers.get());
    }

    let (host, port) = config.bind_addr();
    let server = server
        .bind((host, port))
        .with_context(|| format!("binding {host}:{port}"))?;
    info!("listening at {host}:{port}");

    server.run().await.context("running http server")
}
