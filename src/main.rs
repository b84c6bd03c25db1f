//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg` and
//! serves `static/` locally.

use std::process::{Command, Stdio};
use std::{env, thread, time::Duration};

use anyhow::{bail, Context, Result};

const PORT: &str = "8000";

fn main() -> Result<()> {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return Ok(());
    }

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => bail!(
            "wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/)."
        ),
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.")
        }
    }

    println!("Launching local server at http://127.0.0.1:{PORT} …");
    let mut server = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to start http server")?;

    // Keep process alive while the server runs
    loop {
        if let Some(status) = server.try_wait().context("failed to poll http server")? {
            bail!("http server exited with {status}");
        }
        thread::sleep(Duration::from_secs(1));
    }
}
