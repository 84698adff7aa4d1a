use std::sync::Arc;
use std::time::Duration;

use antipode::{
    AppConfig, ConfigError, InfoPanel, PresentationShell, SearchOrchestrator, SearchOutcome,
    StaleResponsePolicy, parse_trigger,
};
use clap::Parser;
use geocode::NominatimClient;
use scene::{Globe, GlobeEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find the antipode of a place and frame it on the globe")]
struct Args {
    /// Place to look up (repeatable). Without it, place names are read from stdin.
    #[arg(long)]
    query: Vec<String>,

    /// Nominatim-compatible service base URL
    #[arg(long)]
    geocoder_url: Option<String>,

    /// Per-request timeout in milliseconds (0 waits indefinitely)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Which overlapping search may update the scene: latest-issued or latest-completed
    #[arg(long)]
    stale_policy: Option<StaleResponsePolicy>,

    /// Scene post-process trigger: fixed, fixed:<seconds> or stable
    #[arg(long)]
    post_process: Option<String>,

    /// Degrees added to the searched longitude when centring the camera
    #[arg(long, allow_hyphen_values = true)]
    camera_lon_offset: Option<f64>,

    /// Frames to keep rendering once input is exhausted and searches have finished
    #[arg(long, default_value_t = 90)]
    settle_frames: u32,
}

impl Args {
    fn apply(&self, mut config: AppConfig) -> Result<AppConfig, ConfigError> {
        if let Some(url) = &self.geocoder_url {
            config.geocoder.base_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.geocoder.timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(policy) = self.stale_policy {
            config.stale_policy = policy;
        }
        if let Some(value) = &self.post_process {
            config.post_process.trigger = parse_trigger("--post-process", value)?;
        }
        if let Some(offset) = self.camera_lon_offset {
            config.camera.longitude_offset_deg = offset;
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("antipode=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.apply(AppConfig::from_env()?)?;
    info!(
        geocoder = %config.geocoder.base_url,
        policy = ?config.stale_policy,
        "starting"
    );

    let geocoder = NominatimClient::new(config.geocoder.clone())?;
    let (orchestrator, link) = SearchOrchestrator::new(geocoder, &config);
    let orchestrator = Arc::new(orchestrator);
    let mut shell = PresentationShell::mount(Globe::new(config.globe.clone()), link, &config);

    let (query_tx, mut queries) = mpsc::unbounded_channel::<String>();
    if args.query.is_empty() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if query_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!(error = %err, "failed to read input");
                        break;
                    }
                }
            }
        });
    } else {
        for query in &args.query {
            if query_tx.send(query.clone()).is_err() {
                break;
            }
        }
        drop(query_tx);
    }

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / config.frame_hz.max(1.0)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut searches: JoinSet<SearchOutcome> = JoinSet::new();
    let mut input_open = true;
    let mut idle_frames = 0u32;
    let mut shown: Option<InfoPanel> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                shell.frame();
                for event in shell.drain_events() {
                    debug!(frame = event.frame_index, kind = ?event.kind, "{}", event.message);
                }

                if shell.info_panel() != shown.as_ref() {
                    shown = shell.info_panel().cloned();
                    if let Some(panel) = &shown {
                        println!("{panel}");
                    }
                }
                for notice in shell.take_notices() {
                    eprintln!("{notice}");
                }

                if !input_open && searches.is_empty() {
                    idle_frames += 1;
                    if idle_frames >= args.settle_frames {
                        break;
                    }
                }
            }
            next = queries.recv(), if input_open => match next {
                Some(query) => {
                    idle_frames = 0;
                    let orchestrator = orchestrator.clone();
                    searches.spawn(async move { orchestrator.search(&query).await });
                }
                None => input_open = false,
            },
            Some(done) = searches.join_next(), if !searches.is_empty() => match done {
                Ok(outcome) => debug!(?outcome, "search finished"),
                Err(err) => warn!(error = %err, "search task failed"),
            },
        }
    }

    let globe = shell.unmount();
    info!(objects = globe.scene().map(|w| w.len()).unwrap_or(0), "shutting down");
    Ok(())
}
