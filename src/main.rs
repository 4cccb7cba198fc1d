//! Binary entrypoint for the site carousel.
//!
//! Loads the YAML config, fills the business-info placeholders, then runs the
//! gallery carousel with stdin standing in for the page's controls.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use site_carousel::business::PlaceholderPage;
use site_carousel::carousel::{LoopingTrack, PlannedStep};
use site_carousel::config::Configuration;
use site_carousel::events::{CarouselEvent, Direction, Slide};
use site_carousel::menu::MenuToggle;
use site_carousel::tasks;
use site_carousel::tasks::carousel::{CarouselHandle, CarouselTiming};

#[derive(Debug, Parser)]
#[command(
    name = "site-carousel",
    version,
    about = "Business site gallery carousel and info loader"
)]
struct Cli {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Print the settled positions of N forward steps and exit
    #[arg(long = "dry-run", value_name = "STEPS")]
    dry_run: Option<usize>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        n => {
            let level = if n == 1 { Level::DEBUG } else { Level::TRACE };
            EnvFilter::new(format!("site_carousel={level}"))
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = Configuration::from_yaml_file(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?
        .validated()
        .context("invalid configuration values")?;
    debug!("Loaded configuration from {}:\n{:#?}", cli.config.display(), cfg);

    if let Some(steps) = cli.dry_run {
        return run_dry_run(&cfg, steps);
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    if let Some(info_cfg) = &cfg.business_info {
        let mut page = PlaceholderPage::with_markers(info_cfg.markers.iter().cloned());
        tasks::info::run(&info_cfg.source, &mut page).await;
        for slot in page.slots() {
            info!(marker = %slot.marker, text = %slot.text, attrs = ?slot.attrs, "placeholder");
        }
    }

    let track = LoopingTrack::new(cfg.carousel.images.clone()).context("building carousel")?;
    let (events_tx, events_rx) = mpsc::channel::<CarouselEvent>(64); // Carousel -> Renderer
    let renderer = tokio::spawn(render_events(events_rx));
    let carousel = CarouselHandle::spawn(
        track,
        CarouselTiming::from(&cfg.carousel),
        cfg.carousel.controls,
        events_tx,
        &cancel,
    );

    let mut menu = MenuToggle::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("stdin closed; initiating shutdown");
                        break;
                    }
                    Err(err) => {
                        warn!("stdin read failed: {err}");
                        break;
                    }
                };
                let direction = match line.trim() {
                    "next" => Direction::Forward,
                    "prev" => Direction::Backward,
                    "" => continue,
                    "menu" => {
                        menu.toggle();
                        info!(data_menu_open = menu.state_attr(), "menu toggled");
                        continue;
                    }
                    "quit" => break,
                    other => {
                        warn!(command = other, "unknown command (next, prev, menu, quit)");
                        continue;
                    }
                };
                // Fall through to dispose so the renderer is still joined.
                if let Err(err) = carousel.press(direction).await {
                    error!(error = ?err, "carousel stopped; shutting down");
                    break;
                }
            }
        }
    }

    cancel.cancel();
    carousel.dispose().await.context("carousel task failed")?;
    renderer.await.context("renderer task panicked")?;
    Ok(())
}

async fn render_events(mut events: mpsc::Receiver<CarouselEvent>) {
    let mut slides: Vec<Slide> = Vec::new();
    while let Some(event) = events.recv().await {
        match event {
            CarouselEvent::Mounted(mounted) => {
                info!(slots = mounted.len(), "track mounted");
                slides = mounted;
            }
            CarouselEvent::Rendered(frame) => {
                let label = slides.get(frame.index).map(|s| s.label.as_str());
                match &frame.transition {
                    Some(style) => info!(
                        index = frame.index,
                        offset = %format!("{}%", frame.offset_percent),
                        duration = %humantime::format_duration(style.duration),
                        easing = %style.easing,
                        label,
                        "track animating"
                    ),
                    None => debug!(
                        index = frame.index,
                        offset = %format!("{}%", frame.offset_percent),
                        label,
                        "track snapped"
                    ),
                }
            }
            CarouselEvent::Settled(report) => {
                debug!(index = report.index, corrected = report.corrected, "track settled");
            }
        }
    }
}

fn run_dry_run(cfg: &Configuration, steps: usize) -> Result<()> {
    let mut track = LoopingTrack::new(cfg.carousel.images.clone())?;
    let slides = track.display_sequence();

    println!(
        "# carousel dry run\n# images: {}\n# auto-advance: {}\n# steps: {}\n",
        track.len(),
        humantime::format_duration(cfg.carousel.auto_advance),
        steps
    );
    println!("  start: index {:>3}  {}", track.index(), track.current());
    for planned in track.plan_forward(steps) {
        let PlannedStep {
            step,
            moved_to,
            settled,
        } = planned;
        let label = slides
            .get(settled.index)
            .map_or("?", |slide| slide.label.as_str());
        let item = &cfg.carousel.images[settled.index % track.len()];
        if settled.corrected {
            println!(
                "  {step:>5}: index {moved_to:>3} -> {:>3}  {item}  ({label})",
                settled.index
            );
        } else {
            println!("  {step:>5}: index {:>3}  {item}  ({label})", settled.index);
        }
    }
    Ok(())
}
