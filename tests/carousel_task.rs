use std::time::Duration;

use site_carousel::carousel::LoopingTrack;
use site_carousel::config::ControlOptions;
use site_carousel::events::{CarouselEvent, Direction, SettleReport, TrackFrame, TransitionStyle};
use site_carousel::tasks::carousel::{CarouselHandle, CarouselTiming};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep, timeout};
use tokio_util::sync::CancellationToken;

const PERIOD: Duration = Duration::from_secs(5);
const TRANSITION: Duration = Duration::from_millis(1200);

fn timing() -> CarouselTiming {
    CarouselTiming {
        auto_advance: PERIOD,
        transition: TransitionStyle {
            duration: TRANSITION,
            easing: "ease".to_string(),
        },
    }
}

fn spawn(
    n: usize,
    controls: ControlOptions,
) -> (CarouselHandle, mpsc::Receiver<CarouselEvent>, CancellationToken) {
    spawn_with_capacity(n, controls, 64)
}

fn spawn_with_capacity(
    n: usize,
    controls: ControlOptions,
    capacity: usize,
) -> (CarouselHandle, mpsc::Receiver<CarouselEvent>, CancellationToken) {
    let track = LoopingTrack::new((0..n).map(|i| format!("img/{i}.jpg")).collect()).unwrap();
    let (tx, rx) = mpsc::channel(capacity);
    let cancel = CancellationToken::new();
    let handle = CarouselHandle::spawn(track, timing(), controls, tx, &cancel);
    (handle, rx, cancel)
}

async fn next_event(rx: &mut mpsc::Receiver<CarouselEvent>) -> CarouselEvent {
    timeout(Duration::from_secs(60), rx.recv())
        .await
        .expect("timeout waiting for carousel event")
        .expect("carousel channel closed")
}

async fn skip_mount(rx: &mut mpsc::Receiver<CarouselEvent>) {
    assert!(matches!(next_event(rx).await, CarouselEvent::Mounted(_)));
    assert!(matches!(next_event(rx).await, CarouselEvent::Rendered(_)));
}

#[track_caller]
fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(5),
        "expected ~{expected:?}, got {elapsed:?}"
    );
}

fn animated(index: usize) -> CarouselEvent {
    CarouselEvent::Rendered(TrackFrame {
        index,
        offset_percent: -(index as f64) * 100.0,
        transition: Some(timing().transition),
    })
}

fn snapped(index: usize) -> CarouselEvent {
    CarouselEvent::Rendered(TrackFrame {
        index,
        offset_percent: -(index as f64) * 100.0,
        transition: None,
    })
}

fn settled(index: usize, corrected: bool) -> CarouselEvent {
    CarouselEvent::Settled(SettleReport { index, corrected })
}

#[tokio::test(start_paused = true)]
async fn mount_renders_three_copies_and_rests_on_first_original() {
    let (handle, mut rx, _cancel) = spawn(5, ControlOptions::default());

    match next_event(&mut rx).await {
        CarouselEvent::Mounted(slides) => {
            assert_eq!(slides.len(), 15);
            assert_eq!(slides[5].image, "img/0.jpg");
            assert_eq!(slides[5].label, "Gallery image 1");
            assert_eq!(slides[14].label, "Gallery image 5");
        }
        other => panic!("expected mount, got {other:?}"),
    }
    assert_eq!(next_event(&mut rx).await, snapped(5));

    handle.dispose().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn auto_advance_laps_and_wraps_forward() {
    let start = Instant::now();
    let (handle, mut rx, _cancel) = spawn(5, ControlOptions::default());
    skip_mount(&mut rx).await;

    for (lap, index) in [6, 7, 8, 9].into_iter().enumerate() {
        assert_eq!(next_event(&mut rx).await, animated(index));
        assert_elapsed(start, PERIOD * (lap as u32 + 1));
        assert_eq!(next_event(&mut rx).await, settled(index, false));
        assert_elapsed(start, PERIOD * (lap as u32 + 1) + TRANSITION);
    }

    assert_eq!(next_event(&mut rx).await, animated(10));
    assert_eq!(next_event(&mut rx).await, snapped(5));
    assert_eq!(next_event(&mut rx).await, settled(5, true));

    handle.dispose().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn backward_from_start_settles_on_last_item() {
    let (handle, mut rx, _cancel) = spawn(5, ControlOptions::default());
    skip_mount(&mut rx).await;

    assert!(handle.press(Direction::Backward).await.unwrap());
    assert_eq!(next_event(&mut rx).await, animated(4));
    assert_eq!(next_event(&mut rx).await, snapped(9));
    assert_eq!(next_event(&mut rx).await, settled(9, true));

    handle.dispose().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn presses_during_transition_are_dropped() {
    let (handle, mut rx, _cancel) = spawn(4, ControlOptions::default());
    skip_mount(&mut rx).await;

    let start = Instant::now();
    handle.press(Direction::Forward).await.unwrap();
    assert_eq!(next_event(&mut rx).await, animated(5));

    handle.press(Direction::Forward).await.unwrap();
    sleep(Duration::from_millis(400)).await;
    handle.press(Direction::Backward).await.unwrap();
    sleep(Duration::from_millis(400)).await;
    handle.press(Direction::Forward).await.unwrap();

    assert_eq!(
        next_event(&mut rx).await,
        settled(5, false),
        "extra presses must neither move nor restart the step"
    );
    assert_elapsed(start, TRANSITION);

    handle.dispose().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn forward_then_backward_restores_position() {
    let (handle, mut rx, _cancel) = spawn(3, ControlOptions::default());
    skip_mount(&mut rx).await;

    handle.press(Direction::Forward).await.unwrap();
    assert_eq!(next_event(&mut rx).await, animated(4));
    assert_eq!(next_event(&mut rx).await, settled(4, false));

    handle.press(Direction::Backward).await.unwrap();
    assert_eq!(next_event(&mut rx).await, animated(3));
    assert_eq!(next_event(&mut rx).await, settled(3, false));

    handle.dispose().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn manual_press_restarts_auto_advance_countdown() {
    let start = Instant::now();
    let (handle, mut rx, _cancel) = spawn(5, ControlOptions::default());
    skip_mount(&mut rx).await;

    sleep(Duration::from_secs(3)).await;
    handle.press(Direction::Forward).await.unwrap();
    assert_eq!(next_event(&mut rx).await, animated(6));
    assert_eq!(next_event(&mut rx).await, settled(6, false));

    // The original 5s tick must not fire; the next step lands a full period after the press.
    assert_eq!(next_event(&mut rx).await, animated(7));
    assert_elapsed(start, Duration::from_secs(3) + PERIOD);

    handle.dispose().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn missing_control_degrades_to_auto_advance() {
    let start = Instant::now();
    let controls = ControlOptions {
        previous: true,
        next: false,
    };
    let (handle, mut rx, _cancel) = spawn(2, controls);
    skip_mount(&mut rx).await;

    assert!(!handle.press(Direction::Forward).await.unwrap());
    assert_eq!(next_event(&mut rx).await, animated(3));
    assert_elapsed(start, PERIOD);

    handle.dispose().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dispose_drops_pending_completion() {
    let (handle, mut rx, _cancel) = spawn(3, ControlOptions::default());
    skip_mount(&mut rx).await;

    handle.press(Direction::Forward).await.unwrap();
    assert_eq!(next_event(&mut rx).await, animated(4));
    handle.dispose().await.unwrap();

    sleep(PERIOD * 3).await;
    assert!(rx.recv().await.is_none(), "no events may follow dispose");
}

#[tokio::test(start_paused = true)]
async fn parent_cancellation_stops_carousel() {
    let (handle, mut rx, cancel) = spawn(3, ControlOptions::default());
    skip_mount(&mut rx).await;

    cancel.cancel();
    assert!(rx.recv().await.is_none());
    handle.dispose().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dispose_returns_while_renderer_never_drains() {
    let (handle, _rx, _cancel) = spawn_with_capacity(3, ControlOptions::default(), 1);

    timeout(Duration::from_secs(60), handle.dispose())
        .await
        .expect("dispose hung on a full renderer channel")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn dispose_returns_when_renderer_stalls_mid_run() {
    let (handle, mut rx, _cancel) = spawn_with_capacity(3, ControlOptions::default(), 1);
    skip_mount(&mut rx).await;

    // The first auto-advance fills the channel; its completion then blocks on send.
    sleep(PERIOD * 2).await;

    timeout(Duration::from_secs(60), handle.dispose())
        .await
        .expect("dispose hung on a full renderer channel")
        .unwrap();
    assert_eq!(rx.recv().await, Some(animated(4)));
    assert!(rx.recv().await.is_none(), "the blocked completion must be dropped");
}

#[tokio::test(start_paused = true)]
async fn press_fails_after_renderer_closes_but_dispose_succeeds() {
    let (handle, rx, _cancel) = spawn(3, ControlOptions::default());
    drop(rx);
    sleep(Duration::from_millis(10)).await;

    assert!(handle.press(Direction::Forward).await.is_err());
    handle.dispose().await.unwrap();
}
