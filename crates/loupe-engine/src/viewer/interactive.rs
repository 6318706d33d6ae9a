use std::sync::Arc;

use anyhow::Context;

use crate::coords::{AffineTransform, CanvasSize};
use crate::painter::{PainterThread, RepaintSignal};
use crate::paint::Converter;
use crate::render::{
    BufferedImageTarget, MultiResolutionRenderer, RendererConfig, RendererHandle,
};
use crate::source::{Interpolation, InterpolatingSource, RealValue, RenderSource};

use super::ViewerTransform;

/// A source on screen: renderer, painter thread and image target wired
/// together behind a transform-editing API.
///
/// Every transform change requests a repaint; the painter refines from a
/// coarse preview to full resolution in the background while the caller
/// picks finished images off [`target`](Self::target).
pub struct InteractiveViewer<A: AffineTransform> {
    transform: Arc<ViewerTransform<A>>,
    target: Arc<BufferedImageTarget>,
    renderer: RendererHandle,
    painter: PainterThread,
}

impl<A: AffineTransform> InteractiveViewer<A> {
    /// Starts the painter and requests the first frame.
    ///
    /// Stopping waits at most `config.pass_timeout` for the painter.
    pub fn new<S>(
        config: &RendererConfig,
        source: Arc<S>,
        canvas: CanvasSize,
        initial: A,
    ) -> anyhow::Result<Self>
    where
        S: RenderSource<A> + 'static,
    {
        let transform = Arc::new(ViewerTransform::new(initial));
        let target = Arc::new(BufferedImageTarget::new(canvas));
        let signal = RepaintSignal::new();
        let renderer = MultiResolutionRenderer::new(
            config,
            source,
            target.clone(),
            transform.clone(),
            signal.clone(),
        )
        .context("failed to build renderer")?;
        let handle = renderer.handle();
        let painter = PainterThread::spawn("loupe-painter", signal, renderer)?
            .with_stop_timeout(config.pass_timeout);
        handle.request_repaint();
        log::debug!("viewer started on a {}x{} canvas", canvas.width, canvas.height);
        Ok(Self { transform, target, renderer: handle, painter })
    }

    /// Replaces the viewer transform and repaints.
    pub fn set_transform(&self, transform: &A) {
        self.transform.set(transform);
        self.renderer.request_repaint();
    }

    /// Edits the viewer transform in place and repaints.
    pub fn update_transform<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        let out = self.transform.update(f);
        self.renderer.request_repaint();
        out
    }

    /// Copy of the current viewer transform.
    pub fn transform(&self) -> A {
        self.transform.snapshot()
    }

    pub fn target(&self) -> &Arc<BufferedImageTarget> {
        &self.target
    }

    pub fn renderer(&self) -> &RendererHandle {
        &self.renderer
    }

    pub fn request_repaint(&self) {
        self.renderer.request_repaint();
    }

    pub fn set_canvas_size(&self, size: CanvasSize) {
        self.target.set_canvas_size(size);
        self.renderer.request_repaint();
    }

    /// Flips `source` to its other interpolation and repaints with it.
    ///
    /// `source` should be the one this viewer displays.
    pub fn switch_interpolation<T, C>(&self, source: &InterpolatingSource<A, T, C>) -> Interpolation
    where
        T: RealValue,
        C: Converter<f64>,
    {
        let now = source.switch_interpolation();
        self.renderer.request_repaint();
        now
    }

    /// Cancels the running pass and shuts the painter down.
    ///
    /// Returns `false` when the painter did not exit within the pass timeout
    /// and was left to finish on its own.
    pub fn stop(&mut self) -> bool {
        self.painter.signal().stop();
        self.renderer.cancel();
        self.painter.join()
    }
}

impl<A: AffineTransform> Drop for InteractiveViewer<A> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Affine2;
    use crate::render::ScreenScales;
    use crate::source::{ArrayImg, FnSampler, SimpleSource};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    const WAIT: Duration = Duration::from_secs(20);

    fn x_of(p: &[f64]) -> u32 {
        p[0].round().max(0.0) as u32
    }

    fn config() -> RendererConfig {
        RendererConfig::default()
            .with_screen_scales(ScreenScales::new(vec![1.0, 0.5, 0.25]).unwrap())
            .with_num_threads(2)
    }

    fn viewer(canvas: CanvasSize) -> InteractiveViewer<Affine2> {
        let source =
            Arc::new(SimpleSource::uncalibrated(FnSampler::new(2, x_of), |v: &u32| *v));
        InteractiveViewer::new(&config(), source, canvas, Affine2::identity()).unwrap()
    }

    #[test]
    fn refines_to_a_full_resolution_frame() {
        let canvas = CanvasSize::new(64, 48);
        let v = viewer(canvas);
        let image = v.target().wait_for(WAIT, |i| i.size() == canvas).unwrap();
        assert_eq!(image.get(17, 30), Some(17));
    }

    #[test]
    fn transform_changes_reach_the_screen() {
        let canvas = CanvasSize::new(32, 32);
        let v = viewer(canvas);
        v.target().wait_for(WAIT, |i| i.size() == canvas).unwrap();

        v.update_transform(|t| {
            t.translate(-10.0, 0.0);
        });
        assert_eq!(v.transform(), Affine2::from_translation(-10.0, 0.0));
        let image = v
            .target()
            .wait_for(WAIT, |i| i.size() == canvas && i.get(0, 0) == Some(10))
            .unwrap();
        assert_eq!(image.get(5, 3), Some(15));
    }

    #[test]
    fn canvas_resize_repaints_at_new_size() {
        let v = viewer(CanvasSize::new(16, 16));
        v.target().wait_for(WAIT, |i| i.size() == CanvasSize::new(16, 16)).unwrap();
        v.set_canvas_size(CanvasSize::new(40, 10));
        assert!(v.target().wait_for(WAIT, |i| i.size() == CanvasSize::new(40, 10)).is_some());
    }

    #[test]
    fn stop_cancels_a_long_pass() {
        let started = Arc::new(AtomicBool::new(false));
        let sampler = {
            let started = started.clone();
            FnSampler::new(2, move |p: &[f64]| {
                started.store(true, Ordering::SeqCst);
                thread::sleep(Duration::from_micros(50));
                x_of(p)
            })
        };
        let source = Arc::new(SimpleSource::uncalibrated(sampler, |v: &u32| *v));
        let cfg = config().with_screen_scales(ScreenScales::single());
        let mut v =
            InteractiveViewer::new(&cfg, source, CanvasSize::new(512, 512), Affine2::identity())
                .unwrap();

        let deadline = Instant::now() + WAIT;
        while !started.load(Ordering::SeqCst) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(started.load(Ordering::SeqCst));

        let t0 = Instant::now();
        v.stop();
        assert!(t0.elapsed() < Duration::from_secs(5));
        assert_eq!(v.target().published_count(), 0);

        v.request_repaint();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(v.target().published_count(), 0);
    }

    #[test]
    fn stop_is_bounded_by_the_pass_timeout() {
        let started = Arc::new(AtomicBool::new(false));
        let sampler = {
            let started = started.clone();
            FnSampler::new(2, move |p: &[f64]| {
                if !started.swap(true, Ordering::SeqCst) {
                    thread::sleep(Duration::from_secs(3));
                }
                x_of(p)
            })
        };
        let source = Arc::new(SimpleSource::uncalibrated(sampler, |v: &u32| *v));
        let cfg = config()
            .with_screen_scales(ScreenScales::single())
            .with_num_threads(1)
            .with_pass_timeout(Duration::from_millis(100));
        let mut v =
            InteractiveViewer::new(&cfg, source, CanvasSize::new(8, 8), Affine2::identity())
                .unwrap();

        let deadline = Instant::now() + WAIT;
        while !started.load(Ordering::SeqCst) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(started.load(Ordering::SeqCst));

        let t0 = Instant::now();
        assert!(!v.stop());
        assert!(t0.elapsed() < Duration::from_secs(2));
        drop(v);
        assert!(t0.elapsed() < Duration::from_secs(2));
    }

    // ── interpolation ─────────────────────────────────────────────────────

    #[test]
    fn switching_interpolation_repaints_with_the_new_scheme() {
        let img = ArrayImg::from_fn(vec![4, 4], |p| (p[0] * 100) as u16).unwrap();
        let source = Arc::new(
            InterpolatingSource::new(
                Arc::new(img),
                0,
                Affine2::identity(),
                |v: &f64| v.round() as u32,
            )
            .unwrap(),
        );
        let canvas = CanvasSize::new(12, 12);
        let mut zoom = Affine2::identity();
        zoom.scale(4.0);
        let v = InteractiveViewer::new(&config(), source.clone(), canvas, zoom).unwrap();

        let nearest = v
            .target()
            .wait_for(WAIT, |i| i.size() == canvas && i.get(1, 0) == Some(0))
            .unwrap();
        assert_eq!(nearest.get(4, 0), Some(100));

        assert_eq!(v.switch_interpolation(&source), Interpolation::NLinear);
        let linear = v
            .target()
            .wait_for(WAIT, |i| i.size() == canvas && i.get(1, 0) == Some(25))
            .unwrap();
        assert_eq!(linear.get(2, 0), Some(50));
        assert_eq!(linear.get(4, 0), Some(100));
    }
}
