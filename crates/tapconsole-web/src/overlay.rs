#![forbid(unsafe_code)]

//! The overlay instance.
//!
//! [`Overlay`] owns everything a page needs for one diagnostic overlay: the
//! gesture controller of the toggle control, the log panel with its
//! renderer, the control position, and panel / control visibility. The host
//! pushes input and time in; the overlay answers through [`OverlayHost`].
//!
//! # Lifecycle
//!
//! 1. A tap on the control emits `Activate`: the panel opens and the control
//!    hides.
//! 2. [`Overlay::close_panel`] closes the panel and schedules the control to
//!    reappear after the reveal delay.
//! 3. [`Overlay::tick`] performs the pending reveal once its deadline passes.
//!
//! A held press becomes a drag; each drag move repositions the control.

use std::time::Duration;

use tapconsole_core::{
    GestureController, GestureDispatch, GestureIntent, HoldToken, HostRequest, PagePoint,
    PointerEvent, Value, debug, trace,
};
use tapconsole_widgets::{EntryId, LogPanel};

use crate::console::ConsoleSink;
use crate::error::{InputParseError, ReportParseError};
use crate::input::parse_pointer_input;
use crate::options::OverlayOptions;
use crate::report::{ErrorEvent, RejectionEvent, error_report, rejection_report};

/// Outbound calls from the overlay to the page.
pub trait OverlayHost {
    /// The control was tapped and the panel is now open.
    fn on_activate(&mut self);

    /// Move the control's top-left corner to page coordinates `(x, y)`.
    fn on_reposition(&mut self, x: f64, y: f64);

    /// Arm a one-shot timer; call [`Overlay::hold_timer_fired`] with `token`
    /// when it fires.
    fn schedule_hold_timer(&mut self, token: HoldToken, delay: Duration);

    /// Disarm a timer armed earlier. Firing anyway is harmless.
    fn cancel_hold_timer(&mut self, _token: HoldToken) {}

    /// Add (`true`) or remove the page-wide move listener used while dragging.
    fn set_surface_listener(&mut self, attached: bool);

    /// Show or hide the toggle control.
    fn set_control_visible(&mut self, _visible: bool) {}
}

/// One overlay on one page.
#[derive(Debug)]
pub struct Overlay<H: OverlayHost> {
    host: H,
    gesture: GestureController,
    panel: LogPanel,
    position: Option<PagePoint>,
    panel_open: bool,
    control_visible: bool,
    reveal_at: Option<Duration>,
    reveal_delay: Duration,
}

impl<H: OverlayHost> Overlay<H> {
    #[must_use]
    pub fn new(host: H, options: &OverlayOptions) -> Self {
        Self {
            host,
            gesture: GestureController::new(options.gesture_config()),
            panel: LogPanel::new(options.panel_config()),
            position: None,
            panel_open: false,
            control_visible: true,
            reveal_at: None,
            reveal_delay: options.reveal_delay(),
        }
    }

    /// Overlay with default options.
    #[must_use]
    pub fn with_defaults(host: H) -> Self {
        Self::new(host, &OverlayOptions::default())
    }

    // -- input ------------------------------------------------------------

    /// Feed one normalized pointer event and apply the result.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> GestureDispatch {
        let dispatch = self.gesture.handle(event);
        self.apply(&dispatch);
        dispatch
    }

    /// Parse raw input JSON and feed every resulting event.
    pub fn try_handle_input_json(
        &mut self,
        json: &str,
    ) -> Result<Vec<GestureDispatch>, InputParseError> {
        let events = parse_pointer_input(json)?;
        Ok(events
            .iter()
            .map(|event| self.handle_pointer(event))
            .collect())
    }

    /// Like [`try_handle_input_json`](Self::try_handle_input_json), but
    /// malformed input is dropped.
    pub fn handle_input_json(&mut self, json: &str) -> Vec<GestureDispatch> {
        self.try_handle_input_json(json).unwrap_or_else(|err| {
            debug!(error = %err, "raw input dropped");
            Vec::new()
        })
    }

    /// The hold timer armed with `token` fired at `now`.
    pub fn hold_timer_fired(&mut self, token: HoldToken, now: Duration) -> GestureDispatch {
        let dispatch = self.gesture.hold_timer_fired(token, now);
        self.apply(&dispatch);
        dispatch
    }

    /// Advance host time: reveal the control when due and promote a held
    /// press whose timer never arrived.
    pub fn tick(&mut self, now: Duration) -> Option<GestureDispatch> {
        if let Some(deadline) = self.reveal_at
            && now >= deadline
        {
            self.reveal_at = None;
            self.set_control_visible(true);
            debug!(?now, "toggle control revealed");
        }
        let dispatch = self.gesture.poll(now)?;
        self.apply(&dispatch);
        Some(dispatch)
    }

    /// Abandon any press or drag in progress (e.g. the page lost focus).
    pub fn cancel_gesture(&mut self) {
        let requests = self.gesture.reset();
        for request in requests {
            self.perform(request);
        }
    }

    // -- panel ------------------------------------------------------------

    /// Close the panel; the control reappears after the reveal delay.
    ///
    /// Returns `false` if the panel was not open.
    pub fn close_panel(&mut self, now: Duration) -> bool {
        if !self.panel_open {
            return false;
        }
        self.panel_open = false;
        let deadline = now.saturating_add(self.reveal_delay);
        self.reveal_at = Some(deadline);
        debug!(?deadline, "panel closed");
        true
    }

    /// Remove every log entry.
    pub fn clear_panel(&mut self) {
        self.panel.clear();
    }

    /// Toggle a node inside a logged argument. See [`LogPanel::toggle`].
    pub fn toggle_node(&mut self, id: EntryId, argument: usize, path: &[usize]) -> Option<bool> {
        self.panel.toggle(id, argument, path)
    }

    pub fn append_log(&mut self, arguments: impl IntoIterator<Item = Value>) -> EntryId {
        self.panel.append_log(arguments)
    }

    pub fn append_error(&mut self, error: Value) -> EntryId {
        self.panel.append_error(error)
    }

    /// Append the report for a page `error` event (`None` if the event was missing).
    pub fn report_error(&mut self, event: Option<&ErrorEvent>) -> EntryId {
        self.append_error(Value::from(error_report(event)))
    }

    /// Append the report for an `unhandledrejection` event.
    pub fn report_rejection(&mut self, event: Option<&RejectionEvent>) -> EntryId {
        self.append_error(Value::from(rejection_report(event)))
    }

    /// [`report_error`](Self::report_error) from the event's JSON; `null` is a
    /// missing event.
    pub fn report_error_json(&mut self, json: &str) -> Result<EntryId, ReportParseError> {
        let event: Option<ErrorEvent> = serde_json::from_str(json)?;
        Ok(self.report_error(event.as_ref()))
    }

    /// [`report_rejection`](Self::report_rejection) from the event's JSON.
    pub fn report_rejection_json(&mut self, json: &str) -> Result<EntryId, ReportParseError> {
        let event: Option<RejectionEvent> = serde_json::from_str(json)?;
        Ok(self.report_rejection(event.as_ref()))
    }

    // -- accessors --------------------------------------------------------

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    #[must_use]
    pub fn panel(&self) -> &LogPanel {
        &self.panel
    }

    /// Last position the control was dragged to; `None` until the first drag.
    #[must_use]
    pub fn position(&self) -> Option<PagePoint> {
        self.position
    }

    #[must_use]
    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    #[must_use]
    pub fn is_control_visible(&self) -> bool {
        self.control_visible
    }

    /// Deadline of the pending control reveal.
    #[must_use]
    pub fn reveal_at(&self) -> Option<Duration> {
        self.reveal_at
    }

    pub fn into_host(self) -> H {
        self.host
    }

    // -- dispatch ---------------------------------------------------------

    fn apply(&mut self, dispatch: &GestureDispatch) {
        for &request in &dispatch.requests {
            self.perform(request);
        }
        match dispatch.intent {
            Some(GestureIntent::Activate) => self.open_panel(),
            Some(GestureIntent::Reposition { x, y }) => {
                self.position = Some(PagePoint::new(x, y));
                self.host.on_reposition(x, y);
            }
            None => {}
        }
    }

    fn perform(&mut self, request: HostRequest) {
        trace!(?request, "host request");
        match request {
            HostRequest::ScheduleHold { token, delay } => {
                self.host.schedule_hold_timer(token, delay);
            }
            HostRequest::CancelHold { token } => self.host.cancel_hold_timer(token),
            HostRequest::AttachSurfaceListener => self.host.set_surface_listener(true),
            HostRequest::DetachSurfaceListener => self.host.set_surface_listener(false),
        }
    }

    fn open_panel(&mut self) {
        self.panel_open = true;
        self.reveal_at = None;
        self.set_control_visible(false);
        debug!(entries = self.panel.len(), "panel opened");
        self.host.on_activate();
    }

    fn set_control_visible(&mut self, visible: bool) {
        if self.control_visible != visible {
            self.control_visible = visible;
            self.host.set_control_visible(visible);
        }
    }
}

impl<H: OverlayHost> ConsoleSink for Overlay<H> {
    fn log(&mut self, args: &[Value]) {
        self.append_log(args.iter().cloned());
    }

    fn error(&mut self, err: &Value) {
        self.append_error(err.clone());
    }
}
