//! Notes Mobile Application
//!
//! Android shell entrypoint for the Dioxus mobile app.

#[cfg(target_os = "android")]
mod app;
#[cfg(any(target_os = "android", test))]
mod auth;
#[cfg(any(target_os = "android", test))]
mod config;
#[cfg(any(target_os = "android", test))]
mod data;
#[cfg(any(target_os = "android", test))]
mod device;
#[cfg(any(target_os = "android", test))]
mod paths;
#[cfg(any(target_os = "android", test))]
mod secret_store;
#[cfg(any(target_os = "android", test))]
mod sensors;
#[cfg(target_os = "android")]
mod ui;
#[cfg(target_os = "android")]
mod views;

#[cfg(target_os = "android")]
fn main() {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notes=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Notes mobile shell...");
    dioxus::LaunchBuilder::mobile().launch(app::App);
}

#[cfg(not(target_os = "android"))]
fn main() {
    println!(
        "notes-mobile is intended for Android targets. Try: cargo build -p notes-mobile --target aarch64-linux-android"
    );
}
