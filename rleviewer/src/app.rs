//! The interaction loop.
//!
//! A [`Session`] owns the decoder context, the viewport and the compositor.
//! Each iteration polls input once, applies pan and zoom, and repaints the
//! whole panel only when the view actually changed:
//!
//! ```text
//!   Idle --(view changed)--> Dirty --(repaint)--> Idle
//!     \                                            |
//!      +------------(exit key)--> Exit <-----------+
//! ```
//!
//! An image with no complete line opens as an empty session that draws
//! nothing and only waits for the exit key.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use rle_codec::{DecoderContext, Geometry, ResolverStats};
use rle_display::{Compositor, DisplaySink, FrameStats, Viewport};
use rle_input::{Clock, InputSource, Keys, RepeatGate};
use std::fmt;
use tracing::{debug, info, warn};

/// Position in the interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Panel matches the view; waiting for input.
    Idle,
    /// View changed; the next repaint redraws the panel.
    Dirty,
    /// Exit key seen; the loop is over.
    Exit,
}

/// Counters accumulated over a session.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub polls: u64,
    pub frames: u64,
    pub rows_decoded: u64,
    pub resolver: ResolverStats,
    pub last_frame: Option<FrameStats>,
}

impl SessionStats {
    fn record_frame(&mut self, frame: FrameStats, resolver: ResolverStats) {
        self.frames += 1;
        self.rows_decoded += frame.rows_decoded as u64;
        self.resolver.hits += resolver.hits;
        self.resolver.misses += resolver.misses;
        self.resolver.hinted += resolver.hinted;
        self.resolver.lines_scanned += resolver.lines_scanned;
        self.last_frame = Some(frame);
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} polls, {} frames, {} rows decoded, row cache {:.1}% hits, {} lines scanned",
            self.polls,
            self.frames,
            self.rows_decoded,
            self.resolver.hit_ratio() * 100.0,
            self.resolver.lines_scanned
        )
    }
}

/// Decode and view state for a non-empty image.
#[derive(Debug)]
struct OpenImage<B> {
    ctx: DecoderContext<B>,
    viewport: Viewport,
    compositor: Compositor,
}

/// One viewing session over an encoded buffer.
#[derive(Debug)]
pub struct Session<B> {
    image: Option<OpenImage<B>>,
    gate: RepeatGate,
    state: LoopState,
    stats: SessionStats,
}

impl<B: AsRef<[u8]>> Session<B> {
    /// Index `data` and set up the initial view.
    ///
    /// A buffer without a complete line gives an empty session rather than
    /// an error.
    pub fn open(data: B, config: &ViewerConfig) -> Result<Self, ViewerError> {
        let gate = RepeatGate::new(config.input.repeat_interval_ms);
        let image = match DecoderContext::open(data, &config.context_options()) {
            Ok(ctx) => {
                let geometry = *ctx.geometry();
                let viewport = Viewport::new(
                    config.viewport_config(),
                    geometry.total_width(),
                    geometry.total_height(),
                );
                info!("Viewing {} at {}", geometry, viewport.state());
                Some(OpenImage {
                    compositor: Compositor::new(config.context_options().background),
                    ctx,
                    viewport,
                })
            }
            Err(e) if !e.is_fatal() => {
                warn!("{}; waiting for exit", e);
                None
            }
            Err(e) => return Err(e.into()),
        };

        let state = match &image {
            Some(image) if image.viewport.is_dirty() => LoopState::Dirty,
            _ => LoopState::Idle,
        };
        Ok(Self {
            image,
            gate,
            state,
            stats: SessionStats::default(),
        })
    }

    /// Current loop state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Returns true if the image had no decodable lines.
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    /// Image geometry, if any.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.image.as_ref().map(|image| image.ctx.geometry())
    }

    /// The viewport, if any.
    pub fn viewport(&self) -> Option<&Viewport> {
        self.image.as_ref().map(|image| &image.viewport)
    }

    /// Counters so far.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Apply one poll's worth of keys to the view.
    pub fn handle_keys(&mut self, keys: Keys) -> LoopState {
        if self.state == LoopState::Exit {
            return self.state;
        }
        if keys.contains(Keys::EXIT) {
            info!("Exit requested");
            self.state = LoopState::Exit;
            return self.state;
        }
        let Some(image) = self.image.as_mut() else {
            return self.state;
        };

        let viewport = &mut image.viewport;
        let (steps_x, steps_y) = keys.pan_steps();
        viewport.pan_by(steps_x, steps_y);
        if keys.contains(Keys::ZOOM_OUT) {
            viewport.zoom_out();
        }
        if keys.contains(Keys::ZOOM_IN) {
            viewport.zoom_in();
        }

        if viewport.is_dirty() {
            debug!("Keys {} moved view to {}", keys, viewport.state());
            self.state = LoopState::Dirty;
        }
        self.state
    }

    /// Redraw the panel if the viewport is dirty.
    pub fn repaint(&mut self, sink: &mut dyn DisplaySink) -> Result<Option<FrameStats>, ViewerError> {
        if self.state != LoopState::Dirty {
            return Ok(None);
        }
        let Some(image) = self.image.as_mut() else {
            self.state = LoopState::Idle;
            return Ok(None);
        };

        let frame = image
            .compositor
            .render_frame(&mut image.ctx, image.viewport.state(), sink)?;
        image.viewport.mark_clean();
        let resolver = image.ctx.take_stats();
        debug!(
            "Repainted {}: {}; resolver {} hits, {} misses, {} hinted, {} lines scanned",
            image.viewport.state(),
            frame,
            resolver.hits,
            resolver.misses,
            resolver.hinted,
            resolver.lines_scanned
        );
        self.stats.record_frame(frame, resolver);
        self.state = LoopState::Idle;
        Ok(Some(frame))
    }

    /// Poll once, update the view and repaint if needed.
    pub fn step(
        &mut self,
        input: &mut dyn InputSource,
        clock: &dyn Clock,
        sink: &mut dyn DisplaySink,
    ) -> Result<LoopState, ViewerError> {
        let keys = self.gate.filter(input.poll(), clock);
        self.stats.polls += 1;
        if self.handle_keys(keys) == LoopState::Exit {
            return Ok(LoopState::Exit);
        }
        self.repaint(sink)?;
        Ok(self.state)
    }

    /// Paint the first frame, then loop until the exit key.
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        clock: &dyn Clock,
        sink: &mut dyn DisplaySink,
    ) -> Result<SessionStats, ViewerError> {
        self.repaint(sink)?;
        while self.step(input, clock, sink)? != LoopState::Exit {}
        info!("Session finished: {}", self.stats);
        Ok(self.stats)
    }
}
