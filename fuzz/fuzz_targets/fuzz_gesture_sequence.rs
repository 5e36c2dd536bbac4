#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tapconsole_core::{
    GestureController, GestureIntent, GestureState, HoldToken, HostRequest, PointerEvent,
    PointerSource,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Down { touch: bool, id: u8, x: i16, y: i16 },
    Move { touch: bool, id: u8, x: i16, y: i16 },
    Up { touch: bool, id: u8 },
    Cancel { touch: bool, id: Option<u8> },
    Timer { current: bool },
    Poll,
    Reset,
}

#[derive(Debug, Arbitrary)]
struct Input {
    ops: Vec<(u16, Op)>,
}

fn source(touch: bool) -> PointerSource {
    if touch {
        PointerSource::Touch
    } else {
        PointerSource::Mouse
    }
}

fn pointer(touch: bool, id: u8) -> Option<u32> {
    touch.then_some(u32::from(id % 4))
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 512 {
        return;
    }
    let mut controller = GestureController::default();
    let mut now = Duration::ZERO;
    let mut last_token = HoldToken::from_raw(0);
    let mut listener_attached = false;

    for (dt, op) in input.ops {
        now += Duration::from_millis(u64::from(dt % 2048));
        let before = controller.state();
        let dispatch = match op {
            Op::Down { touch, id, x, y } => controller.handle(&PointerEvent::press_start(
                source(touch),
                pointer(touch, id),
                (f64::from(x), f64::from(y)),
                now,
            )),
            Op::Move { touch, id, x, y } => controller.handle(&PointerEvent::pointer_move(
                source(touch),
                pointer(touch, id),
                (f64::from(x), f64::from(y)),
                now,
            )),
            Op::Up { touch, id } => controller.handle(&PointerEvent::press_end(
                source(touch),
                pointer(touch, id),
                now,
            )),
            Op::Cancel { touch, id } => controller.handle(&PointerEvent::press_cancel(
                source(touch),
                id.map(|id| u32::from(id % 4)),
                now,
            )),
            Op::Timer { current } => {
                let token = if current {
                    controller.active_hold_token().unwrap_or(last_token)
                } else {
                    last_token
                };
                controller.hold_timer_fired(token, now)
            }
            Op::Poll => match controller.poll(now) {
                Some(dispatch) => dispatch,
                None => continue,
            },
            Op::Reset => {
                for request in controller.reset() {
                    if request == HostRequest::DetachSurfaceListener {
                        listener_attached = false;
                    }
                }
                assert_eq!(controller.state(), GestureState::Idle);
                continue;
            }
        };

        if dispatch.is_ignored() {
            assert_eq!(controller.state(), before, "ignored dispatch changed state");
            assert!(dispatch.requests.is_empty());
            assert!(dispatch.intent.is_none());
        }
        match dispatch.intent {
            Some(GestureIntent::Activate) => {
                assert_eq!(before, GestureState::Pressed);
                assert_eq!(controller.state(), GestureState::Idle);
            }
            Some(GestureIntent::Reposition { x, y }) => {
                assert!(x.is_finite() && y.is_finite());
                assert_eq!(controller.state(), GestureState::Dragging);
            }
            None => {}
        }
        for request in &dispatch.requests {
            match *request {
                HostRequest::ScheduleHold { token, .. } => last_token = token,
                HostRequest::AttachSurfaceListener => {
                    assert!(!listener_attached, "listener attached twice");
                    listener_attached = true;
                }
                HostRequest::DetachSurfaceListener => {
                    assert!(listener_attached, "listener detached while not attached");
                    listener_attached = false;
                }
                HostRequest::CancelHold { .. } => {}
            }
        }
        assert_eq!(listener_attached, controller.is_dragging());
    }
});
