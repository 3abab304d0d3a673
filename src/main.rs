use pahiy::config::{ClientConfig, load_environment};

#[cfg(not(target_arch = "wasm32"))]
fn init_logging(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging(level: tracing::Level) {
    let _ = dioxus::logger::init(level);
}

fn main() {
    load_environment();
    let level = ClientConfig::from_env()
        .map(|config| config.log_level)
        .unwrap_or(tracing::Level::INFO);
    init_logging(level);
    tracing::info!("starting pahiy");
    dioxus::launch(pahiy::ui::App);
}
