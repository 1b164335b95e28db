use mediconsult_lib::{commands, config, init_tracing, CoreState};

#[tokio::main]
async fn main() {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let state = CoreState::new();
    if let Err(e) = state.start().await {
        tracing::error!("Failed to start consultation store: {e}");
        std::process::exit(1);
    }

    match commands::consultations::list_consultations(&state) {
        Ok(tabs) => match serde_json::to_string_pretty(&tabs) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("Failed to render consultations: {e}"),
        },
        Err(e) => tracing::error!("Failed to list consultations: {e}"),
    }

    state.shutdown().await;
}
