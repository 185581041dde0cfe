use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use classdeskd::api::HttpApi;
use classdeskd::ipc;
use classdeskd::session::SessionStore;

/// Teacher dashboard sidecar: line-delimited JSON requests on stdin, one
/// JSON response per line on stdout. The school REST API is reached over
/// HTTP; the UI shell owns rendering and sign-in.
#[derive(Parser, Debug)]
#[command(name = "classdeskd", version)]
struct Args {
    /// Base URL of the school REST API.
    #[arg(long, env = "CLASSDESK_API_BASE_URL", default_value = "http://localhost:5000")]
    api_base_url: String,

    /// Path to the persisted session profile (teacherId/userId/token),
    /// written by the shell at sign-in.
    #[arg(long, env = "CLASSDESK_PROFILE")]
    profile: PathBuf,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    http_timeout_secs: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout is the IPC channel; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let api = HttpApi::new(&args.api_base_url, Duration::from_secs(args.http_timeout_secs))?;
    let mut state = ipc::AppState::new(SessionStore::new(args.profile), Arc::new(api));

    // One request at a time off the stdio loop; HTTP calls are awaited on a
    // current-thread runtime rather than handed to worker threads.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id; best-effort error line.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = rt.block_on(ipc::handle_request(&mut state, req));
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    Ok(())
}
