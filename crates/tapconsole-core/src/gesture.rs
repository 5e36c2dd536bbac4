#![forbid(unsafe_code)]

//! Tap / drag disambiguation for the overlay toggle control.
//!
//! [`GestureController`] consumes normalized [`PointerEvent`]s from touch or
//! mouse input and decides, per press, whether the user tapped the control
//! (emit [`GestureIntent::Activate`]) or is holding it to drag it around (emit
//! a stream of [`GestureIntent::Reposition`]).
//!
//! # State Machine
//!
//! ```text
//!            PressStart                 hold timer / threshold exceeded
//!   Idle ───────────────▶ Pressed ────────────────────────────────▶ Dragging
//!    ▲                      │  PressEnd (elapsed ≤ threshold)          │
//!    │                      │  → Activate                              │ PointerMove
//!    │◀─────────────────────┘                                          │ → Reposition
//!    │◀──────────────── PressEnd / PressCancel (no intent) ────────────┘
//! ```
//!
//! `Pressed` is the tap window. The controller never owns a timer: entering
//! `Pressed` returns [`HostRequest::ScheduleHold`] and the host calls
//! [`hold_timer_fired`](GestureController::hold_timer_fired) with the token.
//! Hosts without timers can call [`poll`](GestureController::poll) instead.
//!
//! # Invariants
//!
//! 1. At most one session is active; a `PressStart` during a session is ignored.
//! 2. At most one `Activate` per session, and never once dragging has begun.
//! 3. `Reposition` is only emitted while dragging.
//! 4. Every `AttachSurfaceListener` is followed by exactly one
//!    `DetachSurfaceListener` when the session ends, is cancelled, or is reset.
//! 5. A hold token outlives its session only as a stale value: firing it after
//!    teardown has no effect.
//!
//! # Failure Modes
//!
//! Malformed events (touch without identifier, non-finite coordinates) and
//! events that do not fit the current state are dropped. Each drop is reported
//! in the dispatch log with a [`GestureIgnoredReason`]; nothing is fatal.

use std::time::Duration;

use crate::pointer::{PagePoint, PointerEvent, PointerEventKind, PointerSource};
use crate::{debug, trace};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Rendered size of the toggle control, used to centre it on the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ControlSize {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 40.0,
        }
    }
}

/// Thresholds for gesture recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Press duration after which a press becomes a drag (default: 500ms).
    pub hold_threshold: Duration,
    /// Mouse presses this soon after a touch ends are emulation ghosts (default: 400ms).
    pub ghost_click_window: Duration,
    /// Control size for centring repositioned coordinates (default: 40x40).
    pub control_size: ControlSize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_threshold: Duration::from_millis(500),
            ghost_click_window: Duration::from_millis(400),
            control_size: ControlSize::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public outputs
// ---------------------------------------------------------------------------

/// Identifies the hold timer armed for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HoldToken(u64);

impl HoldToken {
    /// Raw token value, for hosts that round-trip it through foreign code.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Result of a completed gesture, for the overlay to act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureIntent {
    /// Short tap: toggle the panel.
    Activate,
    /// Drag in progress: move the control's top-left corner here.
    Reposition { x: f64, y: f64 },
}

/// Side effect the host must perform for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Arm a one-shot timer; call `hold_timer_fired(token, ..)` when it fires.
    ScheduleHold { token: HoldToken, delay: Duration },
    /// Best-effort cancel of a pending hold timer.
    CancelHold { token: HoldToken },
    /// Listen for moves on the whole page, not just the control.
    AttachSurfaceListener,
    /// Remove the page-wide move listener.
    DetachSurfaceListener,
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    /// Pressed, still inside the tap window.
    Pressed,
    Dragging,
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    PressStart,
    PointerMove,
    PressEnd,
    PressCancel,
    HoldTimer,
    Poll,
    Reset,
}

/// Why an incoming signal was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureIgnoredReason {
    /// Touch event without a touch identifier.
    MissingPointerId,
    /// Coordinates were NaN or infinite.
    InvalidPosition,
    /// A press arrived while another session was active.
    SessionAlreadyActive,
    NoActiveSession,
    /// Event belongs to a different pointer than the active session.
    PointerMismatch,
    /// Emulated mouse press following a touch.
    GhostClick,
    /// Hold timer for a session that no longer exists or already drags.
    StaleTimer,
    /// Move inside the tap window.
    NotDragging,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    IntentEmitted,
    StateUpdated,
    Ignored(GestureIgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureLogEntry {
    pub phase: GesturePhase,
    pub pointer_id: Option<u32>,
    pub source: Option<PointerSource>,
    /// Time since the session's press, when a session was involved.
    pub elapsed: Option<Duration>,
    pub outcome: GestureOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureDispatch {
    pub intent: Option<GestureIntent>,
    pub requests: Vec<HostRequest>,
    pub log: GestureLogEntry,
}

impl GestureDispatch {
    fn ignored(
        phase: GesturePhase,
        reason: GestureIgnoredReason,
        pointer_id: Option<u32>,
        source: Option<PointerSource>,
    ) -> Self {
        trace!(?phase, ?reason, ?pointer_id, "gesture input ignored");
        Self {
            intent: None,
            requests: Vec::new(),
            log: GestureLogEntry {
                phase,
                pointer_id,
                source,
                elapsed: None,
                outcome: GestureOutcome::Ignored(reason),
            },
        }
    }

    fn updated(
        phase: GesturePhase,
        session: &PointerSession,
        elapsed: Duration,
        requests: Vec<HostRequest>,
    ) -> Self {
        Self {
            intent: None,
            requests,
            log: GestureLogEntry {
                phase,
                pointer_id: session.pointer_id,
                source: Some(session.source),
                elapsed: Some(elapsed),
                outcome: GestureOutcome::StateUpdated,
            },
        }
    }

    fn emitted(
        phase: GesturePhase,
        session: &PointerSession,
        elapsed: Duration,
        intent: GestureIntent,
        requests: Vec<HostRequest>,
    ) -> Self {
        Self {
            intent: Some(intent),
            requests,
            log: GestureLogEntry {
                phase,
                pointer_id: session.pointer_id,
                source: Some(session.source),
                elapsed: Some(elapsed),
                outcome: GestureOutcome::IntentEmitted,
            },
        }
    }

    /// Whether the dispatch was dropped.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, GestureOutcome::Ignored(_))
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// One press-to-release cycle.
#[derive(Debug, Clone, Copy)]
struct PointerSession {
    start: Duration,
    pointer_id: Option<u32>,
    source: PointerSource,
    dragging: bool,
    hold_token: HoldToken,
}

impl PointerSession {
    fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start)
    }

    fn matches(&self, pointer_id: Option<u32>) -> bool {
        self.pointer_id == pointer_id
    }
}

// ---------------------------------------------------------------------------
// GestureController
// ---------------------------------------------------------------------------

/// Stateful tap / drag recognizer for a single control.
///
/// Feed every normalized event to [`handle`](Self::handle) in delivery order
/// and perform the returned [`HostRequest`]s.
#[derive(Debug, Clone)]
pub struct GestureController {
    config: GestureConfig,
    session: Option<PointerSession>,
    next_token: u64,
    last_touch_release: Option<Duration>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureController {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
            next_token: 1,
            last_touch_release: None,
        }
    }

    /// Dispatch one normalized event.
    pub fn handle(&mut self, event: &PointerEvent) -> GestureDispatch {
        match event.kind {
            PointerEventKind::PressStart { position } => self.press_start(event, position),
            PointerEventKind::PointerMove { position } => self.pointer_move(event, position),
            PointerEventKind::PressEnd => self.press_end(event),
            PointerEventKind::PressCancel => self.press_cancel(event),
        }
    }

    /// The hold timer armed with `token` fired.
    ///
    /// The firing itself means the threshold has elapsed; `now` is only used
    /// for the log. Stale tokens are ignored.
    pub fn hold_timer_fired(&mut self, token: HoldToken, now: Duration) -> GestureDispatch {
        let Some(session) = self.session.as_mut() else {
            return GestureDispatch::ignored(
                GesturePhase::HoldTimer,
                GestureIgnoredReason::StaleTimer,
                None,
                None,
            );
        };
        if session.hold_token != token || session.dragging {
            return GestureDispatch::ignored(
                GesturePhase::HoldTimer,
                GestureIgnoredReason::StaleTimer,
                session.pointer_id,
                Some(session.source),
            );
        }
        session.dragging = true;
        let session = *session;
        let elapsed = session.elapsed(now);
        debug!(?elapsed, pointer_id = ?session.pointer_id, "hold threshold reached, dragging");
        GestureDispatch::updated(
            GesturePhase::HoldTimer,
            &session,
            elapsed,
            vec![HostRequest::AttachSurfaceListener],
        )
    }

    /// Promote a held press to a drag without a timer callback.
    ///
    /// Promotion needs `now` strictly past the hold threshold. Returns `Some`
    /// only when the state changed.
    pub fn poll(&mut self, now: Duration) -> Option<GestureDispatch> {
        let threshold = self.config.hold_threshold;
        let session = self.session.as_mut()?;
        if session.dragging || session.elapsed(now) <= threshold {
            return None;
        }
        session.dragging = true;
        let session = *session;
        Some(GestureDispatch::updated(
            GesturePhase::Poll,
            &session,
            session.elapsed(now),
            vec![
                HostRequest::CancelHold {
                    token: session.hold_token,
                },
                HostRequest::AttachSurfaceListener,
            ],
        ))
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        match self.session {
            None => GestureState::Idle,
            Some(session) if session.dragging => GestureState::Dragging,
            Some(_) => GestureState::Pressed,
        }
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some_and(|s| s.dragging)
    }

    /// Pointer id of the active session. `Some(None)` is an active mouse session.
    #[must_use]
    pub fn active_pointer(&self) -> Option<Option<u32>> {
        self.session.map(|s| s.pointer_id)
    }

    /// Hold token of the active session, if any.
    #[must_use]
    pub fn active_hold_token(&self) -> Option<HoldToken> {
        self.session.map(|s| s.hold_token)
    }

    /// Drop any session, returning the teardown requests.
    pub fn reset(&mut self) -> Vec<HostRequest> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        debug!(phase = ?GesturePhase::Reset, "gesture session reset");
        vec![Self::teardown_request(&session)]
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration. Applies from the next press.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureController {
    fn press_start(&mut self, event: &PointerEvent, position: PagePoint) -> GestureDispatch {
        let phase = GesturePhase::PressStart;
        if let Some(reason) = Self::validate(event, Some(position)) {
            return GestureDispatch::ignored(phase, reason, event.pointer_id, Some(event.source));
        }
        if self.session.is_some() {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::SessionAlreadyActive,
                event.pointer_id,
                Some(event.source),
            );
        }
        if event.source == PointerSource::Mouse
            && self.last_touch_release.is_some_and(|released| {
                event.timestamp.saturating_sub(released) <= self.config.ghost_click_window
            })
        {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::GhostClick,
                event.pointer_id,
                Some(event.source),
            );
        }

        let session = PointerSession {
            start: event.timestamp,
            pointer_id: event.pointer_id,
            source: event.source,
            dragging: false,
            hold_token: self.next_token(),
        };
        self.session = Some(session);
        debug!(pointer_id = ?session.pointer_id, source = ?session.source, "press started");
        GestureDispatch::updated(
            phase,
            &session,
            Duration::ZERO,
            vec![HostRequest::ScheduleHold {
                token: session.hold_token,
                delay: self.config.hold_threshold,
            }],
        )
    }

    fn pointer_move(&mut self, event: &PointerEvent, position: PagePoint) -> GestureDispatch {
        let phase = GesturePhase::PointerMove;
        let threshold = self.config.hold_threshold;
        let size = self.config.control_size;
        if let Some(reason) = Self::validate(event, Some(position)) {
            return GestureDispatch::ignored(phase, reason, event.pointer_id, Some(event.source));
        }
        let Some(session) = self.session.as_mut() else {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::NoActiveSession,
                event.pointer_id,
                Some(event.source),
            );
        };
        if !session.matches(event.pointer_id) {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::PointerMismatch,
                event.pointer_id,
                Some(event.source),
            );
        }

        let elapsed = session.elapsed(event.timestamp);
        let mut requests = Vec::new();
        if !session.dragging {
            // Equality with the threshold is still the tap window.
            if elapsed <= threshold {
                return GestureDispatch::ignored(
                    phase,
                    GestureIgnoredReason::NotDragging,
                    event.pointer_id,
                    Some(event.source),
                );
            }
            // The hold timer was lost or is late; the move proves the hold.
            session.dragging = true;
            requests.push(HostRequest::CancelHold {
                token: session.hold_token,
            });
            requests.push(HostRequest::AttachSurfaceListener);
        }

        let session = *session;
        let intent = GestureIntent::Reposition {
            x: position.x - size.width / 2.0,
            y: position.y - size.height / 2.0,
        };
        trace!(x = position.x, y = position.y, "reposition");
        GestureDispatch::emitted(phase, &session, elapsed, intent, requests)
    }

    fn press_end(&mut self, event: &PointerEvent) -> GestureDispatch {
        let phase = GesturePhase::PressEnd;
        if let Some(reason) = Self::validate(event, None) {
            return GestureDispatch::ignored(phase, reason, event.pointer_id, Some(event.source));
        }
        let Some(session) = self.session else {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::NoActiveSession,
                event.pointer_id,
                Some(event.source),
            );
        };
        if !session.matches(event.pointer_id) {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::PointerMismatch,
                event.pointer_id,
                Some(event.source),
            );
        }

        self.session = None;
        if session.source == PointerSource::Touch {
            self.last_touch_release = Some(event.timestamp);
        }
        let elapsed = session.elapsed(event.timestamp);
        let requests = vec![Self::teardown_request(&session)];

        if session.dragging {
            debug!(?elapsed, "drag ended");
            return GestureDispatch::updated(phase, &session, elapsed, requests);
        }
        // Equality with the threshold still counts as a tap.
        if elapsed <= self.config.hold_threshold {
            debug!(?elapsed, "tap");
            GestureDispatch::emitted(phase, &session, elapsed, GestureIntent::Activate, requests)
        } else {
            debug!(?elapsed, "hold released without drag");
            GestureDispatch::updated(phase, &session, elapsed, requests)
        }
    }

    fn press_cancel(&mut self, event: &PointerEvent) -> GestureDispatch {
        let phase = GesturePhase::PressCancel;
        let Some(session) = self.session else {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::NoActiveSession,
                event.pointer_id,
                Some(event.source),
            );
        };
        // A cancel without id applies to whatever session is active.
        if event.pointer_id.is_some() && !session.matches(event.pointer_id) {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::PointerMismatch,
                event.pointer_id,
                Some(event.source),
            );
        }

        self.session = None;
        let elapsed = session.elapsed(event.timestamp);
        debug!(?elapsed, dragging = session.dragging, "press cancelled");
        GestureDispatch::updated(
            phase,
            &session,
            elapsed,
            vec![Self::teardown_request(&session)],
        )
    }

    fn validate(event: &PointerEvent, position: Option<PagePoint>) -> Option<GestureIgnoredReason> {
        if event.source == PointerSource::Touch && event.pointer_id.is_none() {
            return Some(GestureIgnoredReason::MissingPointerId);
        }
        if position.is_some_and(|p| !p.is_finite()) {
            return Some(GestureIgnoredReason::InvalidPosition);
        }
        None
    }

    fn teardown_request(session: &PointerSession) -> HostRequest {
        if session.dragging {
            HostRequest::DetachSurfaceListener
        } else {
            HostRequest::CancelHold {
                token: session.hold_token,
            }
        }
    }

    fn next_token(&mut self) -> HoldToken {
        let token = HoldToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1).max(1);
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);
    const MS_500: Duration = Duration::from_millis(500);
    const MS_600: Duration = Duration::from_millis(600);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn touch_down(id: u32, x: f64, y: f64, t: Duration) -> PointerEvent {
        PointerEvent::press_start(PointerSource::Touch, Some(id), (x, y), t)
    }

    fn touch_move(id: u32, x: f64, y: f64, t: Duration) -> PointerEvent {
        PointerEvent::pointer_move(PointerSource::Touch, Some(id), (x, y), t)
    }

    fn touch_up(id: u32, t: Duration) -> PointerEvent {
        PointerEvent::press_end(PointerSource::Touch, Some(id), t)
    }

    fn mouse_down(x: f64, y: f64, t: Duration) -> PointerEvent {
        PointerEvent::press_start(PointerSource::Mouse, None, (x, y), t)
    }

    fn mouse_move(x: f64, y: f64, t: Duration) -> PointerEvent {
        PointerEvent::pointer_move(PointerSource::Mouse, None, (x, y), t)
    }

    fn mouse_up(t: Duration) -> PointerEvent {
        PointerEvent::press_end(PointerSource::Mouse, None, t)
    }

    fn scheduled_token(dispatch: &GestureDispatch) -> HoldToken {
        dispatch
            .requests
            .iter()
            .find_map(|r| match r {
                HostRequest::ScheduleHold { token, .. } => Some(*token),
                _ => None,
            })
            .expect("press should schedule a hold timer")
    }

    // --- Tap ---

    #[test]
    fn quick_tap_activates() {
        let mut gc = GestureController::default();
        gc.handle(&mouse_down(10.0, 10.0, Duration::ZERO));
        let dispatch = gc.handle(&mouse_up(MS_50));

        assert_eq!(dispatch.intent, Some(GestureIntent::Activate));
        assert_eq!(dispatch.log.outcome, GestureOutcome::IntentEmitted);
        assert_eq!(gc.state(), GestureState::Idle);
    }

    #[test]
    fn tap_at_exact_threshold_still_activates() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        let dispatch = gc.handle(&touch_up(1, MS_500));
        assert_eq!(dispatch.intent, Some(GestureIntent::Activate));
    }

    #[test]
    fn tap_cancels_pending_hold_timer() {
        let mut gc = GestureController::default();
        let down = gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        let token = scheduled_token(&down);
        let up = gc.handle(&touch_up(1, MS_50));
        assert_eq!(up.requests, vec![HostRequest::CancelHold { token }]);
    }

    #[test]
    fn late_release_without_timer_is_not_a_tap() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        let dispatch = gc.handle(&touch_up(1, MS_600));
        assert_eq!(dispatch.intent, None);
        assert_eq!(dispatch.log.outcome, GestureOutcome::StateUpdated);
    }

    // --- Hold and drag ---

    #[test]
    fn press_schedules_hold_with_threshold() {
        let mut gc = GestureController::default();
        let dispatch = gc.handle(&touch_down(4, 5.0, 5.0, Duration::ZERO));
        assert!(matches!(
            dispatch.requests.as_slice(),
            [HostRequest::ScheduleHold { delay, .. }] if *delay == MS_500
        ));
        assert_eq!(gc.state(), GestureState::Pressed);
    }

    #[test]
    fn hold_timer_enters_dragging_and_attaches_surface_listener() {
        let mut gc = GestureController::default();
        let down = gc.handle(&touch_down(4, 5.0, 5.0, Duration::ZERO));
        let dispatch = gc.hold_timer_fired(scheduled_token(&down), MS_500);

        assert_eq!(dispatch.requests, vec![HostRequest::AttachSurfaceListener]);
        assert!(gc.is_dragging());
        assert_eq!(gc.state(), GestureState::Dragging);
    }

    #[test]
    fn drag_emits_centered_reposition() {
        let mut gc = GestureController::default();
        let down = gc.handle(&touch_down(4, 5.0, 5.0, Duration::ZERO));
        gc.hold_timer_fired(scheduled_token(&down), MS_500);

        let dispatch = gc.handle(&touch_move(4, 100.0, 200.0, MS_600));
        assert_eq!(
            dispatch.intent,
            Some(GestureIntent::Reposition { x: 80.0, y: 180.0 })
        );
    }

    #[test]
    fn drag_release_detaches_and_never_activates() {
        let mut gc = GestureController::default();
        let down = gc.handle(&mouse_down(5.0, 5.0, Duration::ZERO));
        gc.hold_timer_fired(scheduled_token(&down), MS_500);
        gc.handle(&mouse_move(50.0, 50.0, MS_600));

        let dispatch = gc.handle(&mouse_up(ms(700)));
        assert_eq!(dispatch.intent, None);
        assert_eq!(dispatch.requests, vec![HostRequest::DetachSurfaceListener]);
        assert_eq!(gc.state(), GestureState::Idle);
    }

    #[test]
    fn moves_inside_tap_window_are_ignored() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(4, 5.0, 5.0, Duration::ZERO));
        let dispatch = gc.handle(&touch_move(4, 6.0, 6.0, MS_50));
        assert_eq!(
            dispatch.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::NotDragging)
        );
        // The press can still become a tap.
        let up = gc.handle(&touch_up(4, ms(100)));
        assert_eq!(up.intent, Some(GestureIntent::Activate));
    }

    #[test]
    fn move_after_threshold_promotes_without_timer() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(4, 5.0, 5.0, Duration::ZERO));
        let dispatch = gc.handle(&touch_move(4, 40.0, 40.0, MS_600));

        assert!(matches!(
            dispatch.intent,
            Some(GestureIntent::Reposition { .. })
        ));
        assert!(
            dispatch
                .requests
                .contains(&HostRequest::AttachSurfaceListener)
        );
        assert!(gc.is_dragging());
    }

    #[test]
    fn poll_promotes_after_threshold_only() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        assert!(gc.poll(ms(499)).is_none());
        assert!(gc.poll(MS_500).is_none());
        assert_eq!(gc.state(), GestureState::Pressed);
        let dispatch = gc.poll(ms(501)).expect("threshold exceeded");
        assert_eq!(dispatch.log.phase, GesturePhase::Poll);
        assert!(gc.is_dragging());
        assert!(gc.poll(MS_600).is_none());
    }

    #[test]
    fn poll_at_exact_threshold_keeps_tap_window() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        assert!(gc.poll(MS_500).is_none());
        let up = gc.handle(&touch_up(1, MS_500));
        assert_eq!(up.intent, Some(GestureIntent::Activate));
    }

    #[test]
    fn move_at_exact_threshold_keeps_tap_window() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        let moved = gc.handle(&touch_move(1, 6.0, 6.0, MS_500));
        assert_eq!(
            moved.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::NotDragging)
        );
        assert!(moved.requests.is_empty());
        let up = gc.handle(&touch_up(1, MS_500));
        assert_eq!(up.intent, Some(GestureIntent::Activate));
    }

    // --- Stale timers ---

    #[test]
    fn timer_after_tap_is_stale() {
        let mut gc = GestureController::default();
        let down = gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        gc.handle(&touch_up(1, MS_50));

        let dispatch = gc.hold_timer_fired(scheduled_token(&down), MS_500);
        assert_eq!(
            dispatch.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::StaleTimer)
        );
        assert_eq!(gc.state(), GestureState::Idle);
    }

    #[test]
    fn timer_from_previous_session_does_not_promote_new_one() {
        let mut gc = GestureController::default();
        let first = gc.handle(&mouse_down(0.0, 0.0, Duration::ZERO));
        gc.handle(&mouse_up(MS_50));
        gc.handle(&mouse_down(0.0, 0.0, ms(100)));

        let dispatch = gc.hold_timer_fired(scheduled_token(&first), MS_500);
        assert!(dispatch.is_ignored());
        assert_eq!(gc.state(), GestureState::Pressed);
    }

    #[test]
    fn duplicate_timer_fire_is_stale() {
        let mut gc = GestureController::default();
        let down = gc.handle(&mouse_down(0.0, 0.0, Duration::ZERO));
        let token = scheduled_token(&down);
        gc.hold_timer_fired(token, MS_500);
        let again = gc.hold_timer_fired(token, MS_600);
        assert!(again.is_ignored());
        assert!(again.requests.is_empty());
    }

    // --- Session exclusivity ---

    #[test]
    fn second_press_during_session_is_ignored() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        let second = gc.handle(&touch_down(2, 9.0, 9.0, ms(10)));

        assert_eq!(
            second.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::SessionAlreadyActive)
        );
        assert!(second.requests.is_empty());
        assert_eq!(gc.active_pointer(), Some(Some(1)));

        // The second finger's release does not end the first session.
        let stray = gc.handle(&touch_up(2, ms(20)));
        assert_eq!(
            stray.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::PointerMismatch)
        );
        let up = gc.handle(&touch_up(1, ms(30)));
        assert_eq!(up.intent, Some(GestureIntent::Activate));
    }

    #[test]
    fn moves_from_other_pointer_are_ignored_while_dragging() {
        let mut gc = GestureController::default();
        let down = gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        gc.hold_timer_fired(scheduled_token(&down), MS_500);
        let dispatch = gc.handle(&touch_move(7, 50.0, 50.0, MS_600));
        assert_eq!(
            dispatch.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::PointerMismatch)
        );
    }

    // --- Cancel ---

    #[test]
    fn cancel_in_tap_window_emits_nothing() {
        let mut gc = GestureController::default();
        let down = gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        let dispatch = gc.handle(&PointerEvent::press_cancel(
            PointerSource::Touch,
            Some(1),
            MS_50,
        ));
        assert_eq!(dispatch.intent, None);
        assert_eq!(
            dispatch.requests,
            vec![HostRequest::CancelHold {
                token: scheduled_token(&down)
            }]
        );
        assert_eq!(gc.state(), GestureState::Idle);
    }

    #[test]
    fn cancel_while_dragging_detaches() {
        let mut gc = GestureController::default();
        let down = gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        gc.hold_timer_fired(scheduled_token(&down), MS_500);
        let dispatch = gc.handle(&PointerEvent::press_cancel(
            PointerSource::Touch,
            None,
            MS_600,
        ));
        assert_eq!(dispatch.requests, vec![HostRequest::DetachSurfaceListener]);
        assert!(!gc.is_dragging());
    }

    #[test]
    fn cancel_without_session_is_ignored() {
        let mut gc = GestureController::default();
        let dispatch = gc.handle(&PointerEvent::press_cancel(
            PointerSource::Mouse,
            None,
            Duration::ZERO,
        ));
        assert_eq!(
            dispatch.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::NoActiveSession)
        );
    }

    // --- Malformed input ---

    #[test]
    fn touch_without_identifier_is_dropped() {
        let mut gc = GestureController::default();
        let dispatch = gc.handle(&PointerEvent::press_start(
            PointerSource::Touch,
            None,
            (1.0, 1.0),
            Duration::ZERO,
        ));
        assert_eq!(
            dispatch.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::MissingPointerId)
        );
        assert_eq!(gc.state(), GestureState::Idle);
    }

    #[test]
    fn non_finite_position_is_dropped() {
        let mut gc = GestureController::default();
        let dispatch = gc.handle(&mouse_down(f64::NAN, 0.0, Duration::ZERO));
        assert_eq!(
            dispatch.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::InvalidPosition)
        );
    }

    #[test]
    fn touch_move_and_release_without_identifier_are_dropped() {
        let mut gc = GestureController::default();
        gc.handle(&mouse_down(0.0, 0.0, Duration::ZERO));

        let moved = gc.handle(&PointerEvent::pointer_move(
            PointerSource::Touch,
            None,
            (5.0, 5.0),
            MS_600,
        ));
        assert_eq!(
            moved.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::MissingPointerId)
        );
        let released = gc.handle(&PointerEvent::press_end(PointerSource::Touch, None, MS_50));
        assert_eq!(
            released.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::MissingPointerId)
        );
        assert_eq!(released.intent, None);

        // The mouse session survives both.
        assert_eq!(gc.state(), GestureState::Pressed);
        let up = gc.handle(&mouse_up(ms(100)));
        assert_eq!(up.intent, Some(GestureIntent::Activate));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut gc = GestureController::default();
        let dispatch = gc.handle(&mouse_up(Duration::ZERO));
        assert!(dispatch.is_ignored());
        assert_eq!(dispatch.intent, None);
    }

    // --- Ghost clicks ---

    #[test]
    fn emulated_mouse_after_touch_is_ghost() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        gc.handle(&touch_up(1, MS_50));

        let ghost = gc.handle(&mouse_down(0.0, 0.0, ms(80)));
        assert_eq!(
            ghost.log.outcome,
            GestureOutcome::Ignored(GestureIgnoredReason::GhostClick)
        );
        let ghost_up = gc.handle(&mouse_up(ms(90)));
        assert!(ghost_up.is_ignored());
    }

    #[test]
    fn mouse_after_ghost_window_is_accepted() {
        let mut gc = GestureController::default();
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        gc.handle(&touch_up(1, MS_50));

        let down = gc.handle(&mouse_down(0.0, 0.0, ms(1000)));
        assert!(!down.is_ignored());
    }

    // --- Reset / config ---

    #[test]
    fn reset_while_dragging_requests_detach() {
        let mut gc = GestureController::default();
        let down = gc.handle(&mouse_down(0.0, 0.0, Duration::ZERO));
        gc.hold_timer_fired(scheduled_token(&down), MS_500);
        assert_eq!(gc.reset(), vec![HostRequest::DetachSurfaceListener]);
        assert!(gc.reset().is_empty());
        assert_eq!(gc.state(), GestureState::Idle);
    }

    #[test]
    fn custom_threshold() {
        let mut gc = GestureController::new(GestureConfig {
            hold_threshold: ms(1000),
            ..GestureConfig::default()
        });
        gc.handle(&touch_down(1, 0.0, 0.0, Duration::ZERO));
        let up = gc.handle(&touch_up(1, ms(900)));
        assert_eq!(up.intent, Some(GestureIntent::Activate));
        assert_eq!(gc.config().hold_threshold, ms(1000));
    }

    #[test]
    fn tokens_are_unique_per_session() {
        let mut gc = GestureController::default();
        let a = scheduled_token(&gc.handle(&mouse_down(0.0, 0.0, Duration::ZERO)));
        gc.handle(&mouse_up(MS_50));
        let b = scheduled_token(&gc.handle(&mouse_down(0.0, 0.0, ms(100))));
        assert_ne!(a, b);
        assert_eq!(gc.active_hold_token(), Some(b));
    }

    #[test]
    fn debug_format() {
        let gc = GestureController::default();
        assert!(format!("{gc:?}").contains("GestureController"));
    }

    #[cfg(feature = "tracing")]
    mod trace_capture {
        use super::*;
        use std::sync::{Arc, Mutex};
        use tracing::Subscriber;
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        #[derive(Debug, Default)]
        struct Seen {
            messages: Vec<String>,
        }

        struct Capture {
            seen: Arc<Mutex<Seen>>,
        }

        struct MessageVisitor<'a>(&'a mut Option<String>);

        impl tracing::field::Visit for MessageVisitor<'_> {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    *self.0 = Some(format!("{value:?}"));
                }
            }
        }

        impl<S: Subscriber> Layer<S> for Capture {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                let mut message = None;
                event.record(&mut MessageVisitor(&mut message));
                if let Some(message) = message {
                    self.seen.lock().expect("trace capture lock").messages.push(message);
                }
            }
        }

        #[test]
        fn transitions_and_ignores_are_logged() {
            let seen = Arc::new(Mutex::new(Seen::default()));
            let subscriber = tracing_subscriber::registry().with(Capture {
                seen: Arc::clone(&seen),
            });
            tracing::subscriber::with_default(subscriber, || {
                let mut gc = GestureController::default();
                gc.handle(&touch_down(1, 0.0, 0.0, ms(0)));
                gc.handle(&touch_down(2, 0.0, 0.0, ms(10)));
                gc.handle(&PointerEvent::press_end(PointerSource::Touch, Some(1), ms(90)));
            });

            let messages = &seen.lock().expect("trace capture lock").messages;
            assert!(messages.iter().any(|m| m == "press started"));
            assert!(messages.iter().any(|m| m == "gesture input ignored"));
            assert!(messages.iter().any(|m| m == "tap"));
        }
    }
}
