use std::time::Duration;

use glam::Vec2;

use crate::camera::Camera;
use crate::coords::Viewport;

use super::state::InputState;
use super::types::{Action, InputEvent, Key, Modifiers, MouseButton, ScrollDelta};

/// Whether an input event continues to later handlers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

/// What an event handler may read and change.
pub struct HandlerCtx<'a> {
    pub camera: &'a mut Camera,
    pub input: &'a InputState,
    pub viewport: Viewport,
}

/// Window-level listener for input and frame boundaries.
///
/// Every method has a no-op default. Input callbacks return
/// [`Propagation::Stop`] to hide the event from handlers registered after
/// this one and from the application.
pub trait EventHandler {
    fn key_press(
        &mut self,
        ctx: &mut HandlerCtx<'_>,
        key: Key,
        action: Action,
        modifiers: Modifiers,
    ) -> Propagation {
        let _ = (ctx, key, action, modifiers);
        Propagation::Continue
    }

    fn mouse_button_press(
        &mut self,
        ctx: &mut HandlerCtx<'_>,
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    ) -> Propagation {
        let _ = (ctx, button, action, modifiers);
        Propagation::Continue
    }

    fn cursor_moved(&mut self, ctx: &mut HandlerCtx<'_>, position: Vec2) -> Propagation {
        let _ = (ctx, position);
        Propagation::Continue
    }

    fn scroll(&mut self, ctx: &mut HandlerCtx<'_>, delta: ScrollDelta) -> Propagation {
        let _ = (ctx, delta);
        Propagation::Continue
    }

    fn text(&mut self, ctx: &mut HandlerCtx<'_>, text: &str) -> Propagation {
        let _ = (ctx, text);
        Propagation::Continue
    }

    /// Called before the frame is drawn. `dt` is the time since the previous
    /// frame began.
    fn before_frame(&mut self, ctx: &mut HandlerCtx<'_>, dt: Duration) {
        let _ = (ctx, dt);
    }

    /// Called after the frame was presented, with the time spent on it.
    fn after_frame(&mut self, ctx: &mut HandlerCtx<'_>, frame_duration: Duration) {
        let _ = (ctx, frame_duration);
    }
}

/// Handlers of one window, notified in registration order.
#[derive(Default)]
pub struct EventHandlers {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handler: impl EventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Delivers `event` until a handler stops it.
    ///
    /// State-only events (focus, modifiers, cursor leaving) are not delivered
    /// and always continue.
    pub fn dispatch(&mut self, ctx: &mut HandlerCtx<'_>, event: &InputEvent) -> Propagation {
        for handler in &mut self.handlers {
            let p = match event {
                InputEvent::Key { key, action, modifiers, .. } => {
                    handler.key_press(ctx, *key, *action, *modifiers)
                }
                InputEvent::MouseButton { button, action, modifiers } => {
                    handler.mouse_button_press(ctx, *button, *action, *modifiers)
                }
                InputEvent::CursorMoved(pos) => handler.cursor_moved(ctx, *pos),
                InputEvent::Scroll(delta) => handler.scroll(ctx, *delta),
                InputEvent::Text(text) => handler.text(ctx, text),
                InputEvent::CursorLeft
                | InputEvent::ModifiersChanged(_)
                | InputEvent::Focused(_) => return Propagation::Continue,
            };

            if p == Propagation::Stop {
                return Propagation::Stop;
            }
        }
        Propagation::Continue
    }

    pub fn before_frame(&mut self, ctx: &mut HandlerCtx<'_>, dt: Duration) {
        for handler in &mut self.handlers {
            handler.before_frame(ctx, dt);
        }
    }

    pub fn after_frame(&mut self, ctx: &mut HandlerCtx<'_>, frame_duration: Duration) {
        for handler in &mut self.handlers {
            handler.after_frame(ctx, frame_duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct Named {
        name: &'static str,
        stop_keys: bool,
        log: Log,
    }

    impl EventHandler for Named {
        fn key_press(&mut self, _: &mut HandlerCtx<'_>, _: Key, _: Action, _: Modifiers) -> Propagation {
            self.log.borrow_mut().push(self.name);
            if self.stop_keys { Propagation::Stop } else { Propagation::Continue }
        }

        fn before_frame(&mut self, ctx: &mut HandlerCtx<'_>, _: Duration) {
            ctx.camera.set_position(ctx.camera.position() + Vec2::ONE.extend(0.0));
        }
    }

    fn press(key: Key) -> InputEvent {
        InputEvent::Key { key, action: Action::Press, code: 0, modifiers: Modifiers::default() }
    }

    #[test]
    fn dispatch_in_order_until_stopped() {
        let log: Log = Rc::default();
        let mut handlers = EventHandlers::new();
        handlers.push(Named { name: "first", stop_keys: false, log: log.clone() });
        handlers.push(Named { name: "second", stop_keys: true, log: log.clone() });
        handlers.push(Named { name: "third", stop_keys: false, log: log.clone() });

        let mut camera = Camera::new();
        let input = InputState::default();
        let mut ctx = HandlerCtx { camera: &mut camera, input: &input, viewport: Viewport::new(1, 1) };

        assert_eq!(handlers.dispatch(&mut ctx, &press(Key::Space)), Propagation::Stop);
        assert_eq!(*log.borrow(), ["first", "second"]);
    }

    #[test]
    fn state_events_are_not_delivered() {
        let log: Log = Rc::default();
        let mut handlers = EventHandlers::new();
        handlers.push(Named { name: "only", stop_keys: true, log: log.clone() });

        let mut camera = Camera::new();
        let input = InputState::default();
        let mut ctx = HandlerCtx { camera: &mut camera, input: &input, viewport: Viewport::new(1, 1) };

        assert_eq!(handlers.dispatch(&mut ctx, &InputEvent::Focused(true)), Propagation::Continue);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn frame_hooks_reach_every_handler() {
        let log: Log = Rc::default();
        let mut handlers = EventHandlers::new();
        handlers.push(Named { name: "a", stop_keys: true, log: log.clone() });
        handlers.push(Named { name: "b", stop_keys: true, log });

        let mut camera = Camera::new();
        let input = InputState::default();
        let mut ctx = HandlerCtx { camera: &mut camera, input: &input, viewport: Viewport::new(1, 1) };
        handlers.before_frame(&mut ctx, Duration::from_millis(16));

        assert_eq!(camera.position(), glam::Vec3::new(2.0, 2.0, 0.0));
    }
}
