use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Requests accepted by the carousel controller task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    /// A control button press; restarts the auto-advance countdown.
    Advance(Direction),
}

/// One entry of the rendered display sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub image: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionStyle {
    pub duration: Duration,
    pub easing: String,
}

/// Horizontal placement of the track. `transition: None` means an instant snap.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFrame {
    pub index: usize,
    pub offset_percent: f64,
    pub transition: Option<TransitionStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleReport {
    pub index: usize,
    pub corrected: bool,
}

/// Emitted by the carousel controller toward whatever draws the track.
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselEvent {
    Mounted(Vec<Slide>),
    Rendered(TrackFrame),
    Settled(SettleReport),
}
