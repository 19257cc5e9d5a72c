//! Host-side helper: `cargo run` builds the WASM deck into `static/pkg`,
//! then serves `static/` locally and lists the page variants.

#[cfg(not(target_arch = "wasm32"))]
use std::process::{Command, Stdio};
#[cfg(not(target_arch = "wasm32"))]
use std::{env, thread, time::Duration};

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::EnvFilter;

/// Alternate entry pages shipped in `static/`.
#[cfg(not(target_arch = "wasm32"))]
const PAGES: [(&str, &str); 3] = [
    ("deck", "index.html"),
    ("mobile", "mobile.html"),
    ("demo", "demo.html"),
];

// Only meaningful on non-wasm targets.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = env::var("DECK_PORT").unwrap_or_else(|_| "8000".to_owned());

    tracing::info!("building WASM pkg");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            tracing::error!("wasm-pack finished with errors");
            std::process::exit(1);
        }
        Err(_) => {
            tracing::warn!("wasm-pack not found in PATH, serving whatever is already in static/pkg");
        }
    }

    let server = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(e) => {
            tracing::error!("failed to start http server: {e}");
            std::process::exit(1);
        }
    };

    for (name, page) in PAGES {
        tracing::info!("{name:>6}: http://127.0.0.1:{port}/{page}");
    }

    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                tracing::error!("http server exited: {status}");
                std::process::exit(1);
            }
            Ok(None) => thread::sleep(Duration::from_secs(5)),
            Err(e) => {
                tracing::error!("lost track of http server: {e}");
                std::process::exit(1);
            }
        }
    }
}
