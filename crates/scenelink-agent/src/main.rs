//! # scenelink-agent
//!
//! SceneLink bridge binary. Owns the host thread, connects the transport
//! session to the configured peer and pumps commands between them.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use scenelink_core::Outbound;
use scenelink_dispatch::{Dispatcher, run_pump, send_project_closed};
use scenelink_host::{DeferredQueue, HostContext, Project, run_host_loop};
use scenelink_logging::{ForwardLayer, init_subscriber_with_forwarding};
use scenelink_settings::SceneLinkSettings;
use scenelink_transport::{Session, SessionConfig};

/// SceneLink bridge agent.
#[derive(Parser, Debug)]
#[command(name = "scenelink", about = "SceneLink remote-control bridge")]
struct Cli {
    /// Peer endpoint (overrides settings if specified).
    #[arg(long)]
    endpoint: Option<String>,

    /// Settings file (defaults to `~/.scenelink/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log filter (overrides settings if specified).
    #[arg(long)]
    log_level: Option<String>,

    /// Forward log records to the peer as `log.entry` events.
    #[arg(long)]
    forward_logs: bool,

    /// Project name reported to the peer.
    #[arg(long)]
    project_name: Option<String>,

    /// Start with an empty scene instead of the demo level.
    #[arg(long)]
    empty: bool,
}

impl Cli {
    fn load_settings(&self) -> Result<SceneLinkSettings> {
        let mut settings = match &self.settings {
            Some(path) => scenelink_settings::load_settings_from_path(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => scenelink_settings::load_settings().context("Failed to load settings")?,
        };
        if let Some(endpoint) = &self.endpoint {
            settings.transport.endpoint.clone_from(endpoint);
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        if self.forward_logs {
            settings.logging.forward_logs = true;
        }
        if let Some(name) = &self.project_name {
            settings.project.name.clone_from(name);
        }
        scenelink_settings::finalize(&mut settings).context("Invalid command-line override")?;
        Ok(settings)
    }
}

fn build_host(settings: &SceneLinkSettings, empty: bool) -> Result<HostContext> {
    let project = Project::new(settings.project.name.clone(), settings.project.path.clone());
    let mut host = HostContext::new(project);
    if !empty {
        scenelink_host::demo::populate(&mut host).context("Failed to populate demo scene")?;
    }
    Ok(host)
}

/// Run the host loop on a dedicated thread that owns `host`.
fn spawn_host_thread(
    queue: Arc<DeferredQueue<HostContext>>,
    mut host: HostContext,
    tick: Duration,
) -> Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("scenelink-host".into())
        .spawn(move || run_host_loop(&queue, &mut host, tick))
        .context("Failed to spawn host thread")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.load_settings()?;

    let forward = ForwardLayer::new(
        &settings.logging.forward_min_level,
        settings.logging.forward_logs,
    );
    let forward_handle = forward.handle();
    init_subscriber_with_forwarding(&settings.logging.level, forward);

    let host = build_host(&settings, cli.empty)?;
    tracing::info!(
        project = %settings.project.name,
        entities = host.scene.len(),
        "host scene ready"
    );
    let queue = Arc::new(DeferredQueue::new());
    let host_thread = spawn_host_thread(
        Arc::clone(&queue),
        host,
        Duration::from_millis(settings.host.tick_interval_ms),
    )?;

    let session = Session::new(SessionConfig {
        endpoint: settings.transport.endpoint.clone(),
        reconnect_interval: Duration::from_millis(settings.transport.reconnect_interval_ms),
        heartbeat_interval: Duration::from_millis(settings.transport.heartbeat_interval_ms),
    });
    let out: Arc<dyn Outbound> = session.clone();
    forward_handle.attach(Arc::clone(&out));

    let dispatcher = Arc::new(Dispatcher::with_builtin_handlers(settings.handlers.clone()));
    tracing::info!(
        endpoint = %session.endpoint(),
        methods = dispatcher.registry().methods().len(),
        "starting bridge"
    );
    let events = session.subscribe();
    let pump = tokio::spawn(run_pump(
        events,
        dispatcher,
        Arc::clone(&queue),
        Arc::clone(&out),
    ));
    session.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    let closing = Arc::clone(&out);
    let _ = queue.defer(move |host| {
        let _ = send_project_closed(host, closing.as_ref());
    });
    queue.close();
    host_thread
        .join()
        .map_err(|_| anyhow!("host thread panicked"))?;

    forward_handle.detach();
    session.shutdown();
    pump.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
