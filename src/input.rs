//! Raw navigation input and its normalisation into [`NavCommand`]s.

/// One raw user gesture that may move the deck.
#[derive(Debug, Clone, PartialEq)]
pub enum NavInput {
    /// Vertical wheel delta. `excluded` is set when the event target lies
    /// inside the region that keeps native scrolling (the globe).
    Wheel { delta_y: f64, excluded: bool },
    /// Touch travel, `start_y - end_y`, measured at `touchend`.
    Swipe { delta_y: f64 },
    /// `KeyboardEvent.key` value.
    Key(String),
    DotClick(usize),
    /// URL fragment, `location.hash`, at load or on `hashchange`.
    Fragment(String),
}

/// What the navigator should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Prev,
    First,
    Last,
    GoTo(usize),
    /// Instant move that leaves no transition lock behind.
    JumpTo(usize),
}

/// Gesture thresholds, see `DeckConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub wheel: f64,
    pub swipe: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { wheel: 50.0, swipe: 50.0 }
    }
}

impl NavInput {
    /// Map the gesture to a command, `None` when it should be ignored.
    pub fn normalize(&self, thresholds: Thresholds) -> Option<NavCommand> {
        match self {
            NavInput::Wheel { excluded: true, .. } => None,
            NavInput::Wheel { delta_y, .. } => by_direction(*delta_y, thresholds.wheel),
            NavInput::Swipe { delta_y } => by_direction(*delta_y, thresholds.swipe),
            NavInput::Key(key) => key_command(key),
            NavInput::DotClick(index) => Some(NavCommand::GoTo(*index)),
            NavInput::Fragment(hash) => slide_from_fragment(hash).map(NavCommand::JumpTo),
        }
    }
}

/// Slide addressed by a `#slide-3` or `#3` fragment. Fragments count from
/// one, the result from zero.
pub fn slide_from_fragment(hash: &str) -> Option<usize> {
    let hash = hash.strip_prefix('#').unwrap_or(hash);
    let number = hash.strip_prefix("slide-").unwrap_or(hash);
    number.parse::<usize>().ok()?.checked_sub(1)
}

fn by_direction(delta: f64, threshold: f64) -> Option<NavCommand> {
    if delta > threshold {
        Some(NavCommand::Next)
    } else if delta < -threshold {
        Some(NavCommand::Prev)
    } else {
        None
    }
}

/// Keyboard shortcuts of the deck.
pub fn key_command(key: &str) -> Option<NavCommand> {
    match key {
        "ArrowDown" | "PageDown" | " " | "Spacebar" => Some(NavCommand::Next),
        "ArrowUp" | "PageUp" => Some(NavCommand::Prev),
        "Home" => Some(NavCommand::First),
        "End" => Some(NavCommand::Last),
        _ => None,
    }
}

/// Keys typed into form fields never navigate.
pub fn is_text_entry(tag_name: &str) -> bool {
    ["INPUT", "TEXTAREA", "SELECT"]
        .iter()
        .any(|tag| tag_name.eq_ignore_ascii_case(tag))
}
