use std::time::Duration;

use anyhow::{Context, Result};
use tokio::select;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::carousel::LoopingTrack;
use crate::config::{CarouselOptions, ControlOptions};
use crate::events::{CarouselCommand, CarouselEvent, Direction, TrackFrame, TransitionStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselTiming {
    /// Period of the recurring auto-advance.
    pub auto_advance: Duration,
    /// Animation applied to every step.
    pub transition: TransitionStyle,
}

impl From<&CarouselOptions> for CarouselTiming {
    fn from(opts: &CarouselOptions) -> Self {
        Self {
            auto_advance: opts.auto_advance,
            transition: TransitionStyle {
                duration: opts.transition,
                easing: opts.easing.clone(),
            },
        }
    }
}

/// Drives one carousel: owns the track, the auto-advance deadline and the
/// pending transition completion.
///
/// Rules:
/// - Mount the display sequence, then snap to the first original item.
/// - A step starts only when no step is in flight; otherwise it is dropped.
/// - Every started step completes after the transition duration, then settles.
/// - A completion due at the same instant as an auto-advance runs first.
/// - A control command restarts the auto-advance countdown, even when dropped.
/// - Cancellation drops every pending deadline; nothing fires afterwards.
pub async fn run(
    mut track: LoopingTrack<String>,
    timing: CarouselTiming,
    mut commands: Receiver<CarouselCommand>,
    events: Sender<CarouselEvent>,
    cancel: CancellationToken,
) -> Result<()> {
    info!(
        images = track.len(),
        slots = track.display_len(),
        period = %humantime::format_duration(timing.auto_advance),
        transition = %humantime::format_duration(timing.transition.duration),
        "carousel mounted"
    );

    let mounted = [
        CarouselEvent::Mounted(track.display_sequence()),
        CarouselEvent::Rendered(frame(&track, None)),
    ];
    for event in mounted {
        match deliver(&events, event, &cancel).await {
            Delivery::Sent => {}
            Delivery::Cancelled => {
                info!("carousel disposed before mount completed");
                return Ok(());
            }
            Delivery::Closed => {
                warn!("carousel renderer closed before mount");
                return Ok(());
            }
        }
    }

    let mut next_tick = Instant::now() + timing.auto_advance;
    let mut settle_at: Option<Instant> = None;
    let mut controls_open = true;

    loop {
        let mut outgoing: Vec<CarouselEvent> = Vec::new();

        select! {
            biased;

            _ = cancel.cancelled() => break,

            _ = sleep_until(settle_at.unwrap_or(next_tick)), if settle_at.is_some() => {
                settle_at = None;
                let report = track.settle();
                debug!(index = report.index, corrected = report.corrected, "carousel settled");
                if report.corrected {
                    outgoing.push(CarouselEvent::Rendered(frame(&track, None)));
                }
                outgoing.push(CarouselEvent::Settled(report));
            }

            _ = sleep_until(next_tick) => {
                next_tick += timing.auto_advance;
                if let Some(ev) = begin_step(&mut track, Direction::Forward, &timing, &mut settle_at) {
                    outgoing.push(ev);
                }
            }

            cmd = commands.recv(), if controls_open => {
                match cmd {
                    Some(CarouselCommand::Advance(direction)) => {
                        if let Some(ev) = begin_step(&mut track, direction, &timing, &mut settle_at) {
                            outgoing.push(ev);
                        }
                        next_tick = Instant::now() + timing.auto_advance;
                    }
                    None => {
                        // Controls are gone; auto-advance carries on.
                        debug!("carousel command channel closed");
                        controls_open = false;
                    }
                }
            }
        }

        for event in outgoing {
            match deliver(&events, event, &cancel).await {
                Delivery::Sent => {}
                Delivery::Cancelled => {
                    info!(index = track.index(), "carousel disposed while renderer stalled");
                    return Ok(());
                }
                Delivery::Closed => {
                    warn!("carousel renderer closed");
                    return Ok(());
                }
            }
        }
    }

    info!(index = track.index(), "carousel disposed");
    Ok(())
}

enum Delivery {
    Sent,
    Cancelled,
    Closed,
}

// A full renderer channel must not hold off cancellation.
async fn deliver(
    events: &Sender<CarouselEvent>,
    event: CarouselEvent,
    cancel: &CancellationToken,
) -> Delivery {
    select! {
        biased;
        _ = cancel.cancelled() => Delivery::Cancelled,
        res = events.send(event) => match res {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::Closed,
        },
    }
}

fn begin_step(
    track: &mut LoopingTrack<String>,
    direction: Direction,
    timing: &CarouselTiming,
    settle_at: &mut Option<Instant>,
) -> Option<CarouselEvent> {
    let Some(index) = track.advance(direction) else {
        debug!(?direction, index = track.index(), "carousel step dropped; transition in flight");
        return None;
    };
    debug!(?direction, index, "carousel step");
    *settle_at = Some(Instant::now() + timing.transition.duration);
    Some(CarouselEvent::Rendered(frame(
        track,
        Some(timing.transition.clone()),
    )))
}

fn frame(track: &LoopingTrack<String>, transition: Option<TransitionStyle>) -> TrackFrame {
    TrackFrame {
        index: track.index(),
        offset_percent: track.offset_percent(),
        transition,
    }
}

/// Owner of a running carousel task; the init/dispose lifecycle of one gallery.
pub struct CarouselHandle {
    commands: Sender<CarouselCommand>,
    controls: ControlOptions,
    cancel: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl CarouselHandle {
    /// Spawn the controller. Cancelling `parent` also stops the carousel.
    pub fn spawn(
        track: LoopingTrack<String>,
        timing: CarouselTiming,
        controls: ControlOptions,
        events: Sender<CarouselEvent>,
        parent: &CancellationToken,
    ) -> Self {
        let (commands, commands_rx) = mpsc::channel::<CarouselCommand>(16);
        let cancel = parent.child_token();
        let task = tokio::spawn(run(track, timing, commands_rx, events, cancel.clone()));
        Self {
            commands,
            controls,
            cancel,
            task,
        }
    }

    /// Press the previous/next control. Returns `false` if that control is absent.
    pub async fn press(&self, direction: Direction) -> Result<bool> {
        let present = match direction {
            Direction::Forward => self.controls.next,
            Direction::Backward => self.controls.previous,
        };
        if !present {
            warn!(?direction, "carousel control not present; ignoring");
            return Ok(false);
        }
        self.commands
            .send(CarouselCommand::Advance(direction))
            .await
            .context("carousel task is no longer running")?;
        Ok(true)
    }

    /// Stop the controller and wait for it to exit.
    pub async fn dispose(self) -> Result<()> {
        let Self {
            commands,
            cancel,
            task,
            ..
        } = self;
        cancel.cancel();
        drop(commands);
        task.await.context("carousel task panicked")?
    }
}
