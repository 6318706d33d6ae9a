use std::sync::Arc;
use std::time::Duration;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::coords::{AffineTransform, CanvasSize};
use crate::error::RenderError;
use crate::painter::{Paintable, RepaintSignal};
use crate::source::RenderSource;
use crate::viewer::ViewerTransform;

use super::buffers::ScaleLevel;
use super::config::RendererConfig;
use super::policy::{HysteresisPolicy, ScalePolicy};
use super::projector::InterruptibleProjector;
use super::request::RenderRequest;
use super::scales::ScreenScales;
use super::target::RenderTarget;

/// How a pass ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// The buffer went to the target.
    Published,
    /// A newer request (or a stop) cancelled the pass.
    Cancelled,
    /// The canvas changed size while rendering; the buffer was dropped.
    Discarded,
    /// Nothing was published; the previous image stays on screen.
    Failed(RenderError),
}

/// Summary of the most recent pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub scale_index: usize,
    pub size: CanvasSize,
    pub render_time: Duration,
    pub outcome: PassOutcome,
}

/// Progressive renderer: coarse preview first, then successively finer
/// passes until full resolution or a new request.
///
/// Each [`paint`](Paintable::paint) renders exactly one scale level. A
/// successful pass publishes its buffer and queues the next finer level; the
/// level a fresh request starts from is steered by a [`ScalePolicy`] so that
/// the first preview after an interaction fits the configured frame budget.
///
/// Meant to be moved into a [`PainterThread`](crate::painter::PainterThread);
/// other threads talk to it through a [`RendererHandle`].
pub struct MultiResolutionRenderer<A, S>
where
    A: AffineTransform,
    S: RenderSource<A>,
{
    source: Arc<S>,
    target: Arc<dyn RenderTarget>,
    viewer: Arc<ViewerTransform<A>>,
    request: Arc<RenderRequest>,
    signal: RepaintSignal,
    scales: ScreenScales,
    canvas: CanvasSize,
    levels: Vec<ScaleLevel<A>>,
    double_buffered: bool,
    policy: Box<dyn ScalePolicy>,
    pool: ThreadPool,
    pass_timeout: Duration,
    last_pass: Option<PassReport>,
}

/// Thread-safe remote control of a [`MultiResolutionRenderer`].
#[derive(Debug, Clone)]
pub struct RendererHandle {
    request: Arc<RenderRequest>,
    signal: RepaintSignal,
}

impl RendererHandle {
    /// Restarts the refinement chain from the current starting level.
    pub fn request_repaint(&self) {
        self.request.request(None);
        self.signal.request_repaint();
    }

    /// Requests a pass at `scale_index` (clamped to the available levels).
    pub fn request_repaint_at(&self, scale_index: usize) {
        self.request.request(Some(scale_index));
        self.signal.request_repaint();
    }

    /// Cancels the in-flight pass, refinement or not.
    pub fn cancel(&self) {
        self.request.cancel_active();
    }

    /// Level a fresh request currently starts from.
    pub fn max_scale_index(&self) -> usize {
        self.request.max_index()
    }

    pub fn requested_scale_index(&self) -> usize {
        self.request.requested_index()
    }

    pub fn signal(&self) -> &RepaintSignal {
        &self.signal
    }
}

impl<A, S> MultiResolutionRenderer<A, S>
where
    A: AffineTransform,
    S: RenderSource<A>,
{
    /// Builds the renderer and its worker pool. Buffers are sized from the
    /// target's canvas and re-sized whenever it changes.
    pub fn new(
        config: &RendererConfig,
        source: Arc<S>,
        target: Arc<dyn RenderTarget>,
        viewer: Arc<ViewerTransform<A>>,
        signal: RepaintSignal,
    ) -> Result<Self, RenderError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(|i| format!("loupe-render-{i}"))
            .build()
            .map_err(|e| RenderError::WorkerPool(e.to_string()))?;

        let scales = config.screen_scales.clone();
        let mut renderer = Self {
            source,
            target,
            viewer,
            request: Arc::new(RenderRequest::new(scales.len())),
            signal,
            scales,
            canvas: CanvasSize::default(),
            levels: Vec::new(),
            double_buffered: config.double_buffered,
            policy: Box::new(HysteresisPolicy::new(config.target_render_time)),
            pool,
            pass_timeout: config.pass_timeout,
            last_pass: None,
        };
        renderer.check_resize();
        log::debug!(
            "renderer ready: {} scales, {} workers, target {:?}",
            renderer.scales.len(),
            config.num_threads,
            config.target_render_time
        );
        Ok(renderer)
    }

    /// Replaces the adaptive starting-level policy.
    pub fn with_policy(mut self, policy: Box<dyn ScalePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn handle(&self) -> RendererHandle {
        RendererHandle {
            request: Arc::clone(&self.request),
            signal: self.signal.clone(),
        }
    }

    pub fn request_repaint(&self) {
        self.handle().request_repaint();
    }

    pub fn request_repaint_at(&self, scale_index: usize) {
        self.handle().request_repaint_at(scale_index);
    }

    pub fn screen_scales(&self) -> &ScreenScales {
        &self.scales
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    pub fn max_scale_index(&self) -> usize {
        self.request.max_index()
    }

    pub fn last_pass(&self) -> Option<&PassReport> {
        self.last_pass.as_ref()
    }

    /// Reallocates every level when the target's canvas changed size.
    fn check_resize(&mut self) {
        let size = self.target.canvas_size();
        if size == self.canvas {
            return;
        }
        log::debug!(
            "canvas {}x{} -> {}x{}; reallocating {} levels",
            self.canvas.width,
            self.canvas.height,
            size.width,
            size.height,
            self.scales.len()
        );
        self.canvas = size;
        self.levels = if size.is_empty() {
            Vec::new()
        } else {
            self.scales
                .iter()
                .map(|scale| ScaleLevel::new(size, scale, self.double_buffered))
                .collect()
        };
    }

    /// Feeds a successful pass to the policy and moves the starting level.
    fn adapt(&mut self, rendered: usize, render_time: Duration) {
        let max = self.request.max_index();
        let num_scales = self.levels.len();
        let next = self
            .policy
            .next_max_index(rendered, render_time, max, num_scales)
            .min(num_scales.saturating_sub(1));
        if next != max {
            log::info!(
                "starting scale {max} -> {next} ({:.3} after {render_time:?} at scale {rendered})",
                self.scales[next]
            );
            self.request.set_max_index(next);
        }
    }

    fn report(
        &mut self,
        scale_index: usize,
        size: CanvasSize,
        render_time: Duration,
        outcome: PassOutcome,
    ) {
        self.last_pass = Some(PassReport { scale_index, size, render_time, outcome });
    }
}

impl<A, S> Paintable for MultiResolutionRenderer<A, S>
where
    A: AffineTransform,
    S: RenderSource<A>,
{
    fn paint(&mut self) -> bool {
        self.check_resize();
        if self.levels.is_empty() {
            return true;
        }

        let ticket = self.request.begin_pass();
        let index = ticket.index;
        let size = self.levels[index].buffers.size();

        let viewer = self.viewer.snapshot();
        let mut source_to_screen = self.levels[index].transform.clone();
        source_to_screen
            .concatenate(&viewer)
            .concatenate(&self.source.source_transform());
        let Some(screen_to_source) = source_to_screen.inverse() else {
            self.request.finish_pass();
            log::warn!("scale {index}: source-to-screen transform is singular; skipping pass");
            let outcome = PassOutcome::Failed(RenderError::SingularTransform);
            self.report(index, size, Duration::ZERO, outcome);
            return true;
        };

        log::debug!(
            "scale {index}: rendering {}x{}{}",
            size.width,
            size.height,
            if ticket.cancellable { "" } else { " (uninterruptible)" }
        );
        let (result, render_time) = {
            let source = &*self.source;
            let mut projector = InterruptibleProjector::new(
                source.interpolated_sampler(),
                source.converter(),
                screen_to_source,
                ticket.token.clone(),
            )
            .with_timeout(self.pass_timeout);
            let result = projector.map(self.levels[index].buffers.back_mut(), &self.pool);
            (result, projector.last_render_time().unwrap_or_default())
        };
        self.request.finish_pass();

        match result {
            Ok(true) => {
                if self.target.canvas_size() != self.canvas {
                    log::debug!("scale {index}: canvas resized during pass; discarding");
                    self.report(index, size, render_time, PassOutcome::Discarded);
                    return false;
                }
                let image = self.levels[index].buffers.publish();
                self.target.set_image(image);
                log::debug!("scale {index}: published after {render_time:?}");
                self.report(index, size, render_time, PassOutcome::Published);

                self.adapt(index, render_time);
                if index > 0 {
                    if self.request.refine(&ticket, index - 1) {
                        self.signal.request_repaint();
                    } else {
                        log::trace!("scale {index}: refinement superseded by a newer request");
                    }
                }
                true
            }
            Ok(false) => {
                log::debug!("scale {index}: cancelled after {render_time:?}");
                self.report(index, size, render_time, PassOutcome::Cancelled);
                false
            }
            Err(err) => {
                match &err {
                    RenderError::TimedOut(_) => log::warn!("scale {index}: {err}"),
                    _ => log::error!("scale {index}: {err}"),
                }
                self.report(index, size, render_time, PassOutcome::Failed(err));
                true
            }
        }
    }
}
