//! The Elm-style application loop: [`Model`], [`Driver`], [`Canvas`],
//! [`Effect`], [`App`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::messages::Msg;
use crate::screen::{compute_frame, Frame, Screen};

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Synchronous access to the screen from inside [`Model::update`].
///
/// Long-running updates use this to show intermediate frames before they
/// return control to the loop.
pub trait Canvas {
    /// Draw a complete frame with `draw` and show it immediately.
    fn present(&mut self, draw: &mut dyn FnMut(&mut Screen));
}

/// A [`Canvas`] that keeps the last presented screen in memory and counts
/// frames. Used where no terminal is attached.
#[derive(Debug, Clone)]
pub struct HeadlessCanvas {
    pub screen: Screen,
    pub frames: usize,
}

impl HeadlessCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            screen: Screen::new(width, height),
            frames: 0,
        }
    }
}

impl Canvas for HeadlessCanvas {
    fn present(&mut self, draw: &mut dyn FnMut(&mut Screen)) {
        draw(&mut self.screen);
        self.frames += 1;
    }
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model.
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg, canvas: &mut dyn Canvas) -> Option<Effect>;

    /// Render the current state into `screen`.
    fn draw(&self, screen: &mut Screen);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`.
    /// The implementation should honour `ctx.is_done()` and return when it
    /// becomes `true`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// The [`Canvas`] handed to the model by [`App`]: draws into the current
/// screen, diffs against the previous one and flushes through the driver.
struct Presenter<'a, D: Driver> {
    driver: &'a mut D,
    prev: &'a mut Screen,
    curr: &'a mut Screen,
    error: Option<Box<dyn std::error::Error>>,
}

impl<D: Driver> Presenter<'_, D> {
    fn show(&mut self) {
        if self.error.is_some() {
            return;
        }
        let frame = compute_frame(self.prev, self.curr);
        if !frame.is_empty() {
            if let Err(e) = self.driver.flush(frame) {
                self.error = Some(e);
                return;
            }
        }
        self.prev.copy_from(self.curr);
    }
}

impl<D: Driver> Canvas for Presenter<'_, D> {
    fn present(&mut self, draw: &mut dyn FnMut(&mut Screen)) {
        draw(self.curr);
        self.show();
    }
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Enters the event loop: poll → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End` or a `Msg::Quit`
    ///    arrives.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut prev = Screen::new(self.width, self.height);
        let mut curr = Screen::new(self.width, self.height);

        let result = self.event_loop(&ctx, &tx, &rx, &mut prev, &mut curr);
        self.driver.close();
        result
    }

    fn event_loop(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
        rx: &Receiver<Msg>,
        prev: &mut Screen,
        curr: &mut Screen,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Process the Init message first.
        self.process_pending(rx, ctx, prev, curr)?;

        while !ctx.is_done() {
            if let Err(e) = self.driver.poll_msgs(ctx, tx.clone()) {
                ctx.cancel();
                return Err(e);
            }
            if ctx.is_done() {
                break;
            }
            self.process_pending(rx, ctx, prev, curr)?;
        }
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev: &mut Screen,
        curr: &mut Screen,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            if matches!(msg, Msg::Quit) {
                ctx.cancel();
                return Ok(());
            }
            let mut presenter = Presenter {
                driver: &mut self.driver,
                prev: &mut *prev,
                curr: &mut *curr,
                error: None,
            };
            let effect = self.model.update(msg, &mut presenter);
            if let Some(e) = presenter.error.take() {
                return Err(e);
            }
            if let Some(Effect::End) = effect {
                ctx.cancel();
                return Ok(());
            }
            needs_draw = true;
        }

        if needs_draw {
            let model = &self.model;
            let mut presenter = Presenter {
                driver: &mut self.driver,
                prev: &mut *prev,
                curr: &mut *curr,
                error: None,
            };
            presenter.present(&mut |screen: &mut Screen| model.draw(screen));
            if let Some(e) = presenter.error.take() {
                return Err(e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::glyph::Glyph;
    use crate::messages::Key;

    /// Driver that replays a fixed list of messages and records flushes.
    struct ScriptDriver {
        script: Vec<Msg>,
        flushed: Vec<Frame>,
        closed: bool,
    }

    impl Driver for ScriptDriver {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _ctx: &Context,
            tx: Sender<Msg>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.script.is_empty() {
                tx.send(Msg::Quit).ok();
            } else {
                tx.send(self.script.remove(0)).ok();
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.flushed.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    /// Counts key presses; each press animates two intermediate frames.
    struct Counter {
        presses: u32,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg, canvas: &mut dyn Canvas) -> Option<Effect> {
            match msg {
                Msg::KeyDown { key: Key::Char('q'), .. } => Some(Effect::End),
                Msg::KeyDown { .. } => {
                    for i in 0..2 {
                        canvas.present(&mut |s: &mut Screen| {
                            s.set(Point::new(i, 0), Glyph::default().with_char('*'));
                        });
                    }
                    self.presses += 1;
                    None
                }
                _ => None,
            }
        }

        fn draw(&self, screen: &mut Screen) {
            let ch = char::from_digit(self.presses % 10, 10).unwrap_or('?');
            screen.set(Point::new(3, 0), Glyph::default().with_char(ch));
        }
    }

    #[test]
    fn loop_presents_intermediate_frames_and_ends() {
        let driver = ScriptDriver {
            script: vec![Msg::key(Key::Space), Msg::key(Key::Char('q'))],
            flushed: Vec::new(),
            closed: false,
        };
        let mut app = App::new(AppConfig {
            model: Counter { presses: 0 },
            driver,
            width: 4,
            height: 1,
        });
        app.run().unwrap();
        assert_eq!(app.model.presses, 1);
        assert!(app.driver.closed);
        // Init draw + two animation frames + post-update draw.
        assert_eq!(app.driver.flushed.len(), 4);
        assert_eq!(app.driver.flushed[1].glyphs.len(), 1);
    }

    #[test]
    fn headless_canvas_counts_frames() {
        let mut canvas = HeadlessCanvas::new(2, 1);
        canvas.present(&mut |s: &mut Screen| s.set(Point::new(1, 0), Glyph::default().with_char('x')));
        assert_eq!(canvas.frames, 1);
        assert_eq!(canvas.screen.at(Point::new(1, 0)).ch, 'x');
    }

    #[test]
    fn context_cancel() {
        let ctx = Context::new();
        let clone = ctx.clone();
        assert!(!ctx.is_done());
        clone.cancel();
        assert!(ctx.is_done());
    }
}
