use std::sync::Arc;

use actix_easy_multipart::MultipartFormConfig;
use colored::Colorize;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api;
use crate::infrastructure::{config::build_config, telemetry, ServiceProvider};

pub fn run() {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async_run());
}

pub async fn async_run() {
    let config = match build_config() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build config".red(), e);
        }
    };
    if let Err(e) = telemetry::init_telemetry() {
        return eprintln!("{}: {}", "Cannot build logger".red(), e);
    };

    let service_provider = match ServiceProvider::build(config) {
        Ok(x) => Arc::new(x),
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build Service Provider".red(), e);
        }
    };

    let handles = service_provider
        .clone()
        .background_services()
        .into_iter()
        .map(|x| {
            tokio::spawn(async move {
                let task = x.clone();
                task.run().await
            })
        })
        .collect::<Vec<JoinHandle<()>>>();

    tokio::select! {
        _ = initialize_web_host(service_provider) => {

        }
        _ = tokio::signal::ctrl_c() => {
            info!("Stoping Services (ctrl-c handling).");
            for handle in handles {
                handle.abort()
            }
            std::process::exit(0);
        }
    }
}

pub async fn initialize_web_host(sp: Arc<ServiceProvider>) {
    let host = sp.config.host.clone();
    let bind = (host.bind_address.clone(), host.port);
    match actix_web::HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method()
            .max_age(86400);

        actix_web::App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(cors)
            .app_data(MultipartFormConfig::default().total_limit(host.upload_form_limit))
            .app_data(actix_web::web::Data::from(sp.clone()))
            .service(api::content_transfer::upload_chunk)
            .service(api::content_transfer::chunk_status)
            .service(api::content_transfer::finalize_upload)
            .service(api::content_transfer::upload_status)
            .service(api::content_transfer::cancel_upload)
            .service(api::publication::publish)
            .service(api::publication::publication_status)
    })
    .bind(bind)
    {
        Ok(server) => {
            if let Err(e) = server.run().await {
                tracing::error!("Web host exited: {e}");
            }
        }
        Err(e) => tracing::error!("Cannot bind web host: {e}"),
    }
}
