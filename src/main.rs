//! Host-side dev helper: `cargo run` builds the wasm bundle into
//! `static/pkg` and serves `static/` on http://127.0.0.1:8000.

use std::process::{Command, ExitCode};

const PORT: &str = "8000";

fn main() -> ExitCode {
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors.");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH; serving whatever is already in static/pkg.");
        }
    }

    println!("Serving static/ at http://127.0.0.1:{PORT} (Ctrl+C to stop)");
    match Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .status()
    {
        Ok(st) if st.success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("failed to start http server: {e}");
            ExitCode::FAILURE
        }
    }
}
