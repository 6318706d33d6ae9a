use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};

use loupe_engine::coords::{Affine3, AffineTransform, CanvasSize};
use loupe_engine::logging::{LoggingConfig, init_logging};
use loupe_engine::paint::{Lut, LutConverter};
use loupe_engine::painter::PainterState;
use loupe_engine::render::{RendererConfig, ScreenImage};
use loupe_engine::source::{ArrayImg, NLinear, SimpleSource};
use loupe_engine::time::StopWatch;
use loupe_engine::viewer::InteractiveViewer;

const CANVAS: CanvasSize = CanvasSize::new(640, 480);
const VOLUME: usize = 96;
const MAX_VALUE: f64 = 4095.0;

/// Headless session: a burst of simulated rotate/zoom input on a procedural
/// volume, then the settled full-resolution frame written as PNG.
fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("loupe-studio.png"));

    let source = Arc::new(volume_source()?);
    let config = RendererConfig::default().with_target_render_time(Duration::from_millis(25));
    let viewer = InteractiveViewer::new(&config, source, CANVAS, initial_view())
        .context("failed to start viewer")?;

    let watch = StopWatch::started();
    simulate_input(&viewer);
    let image = wait_until_settled(&viewer, Duration::from_secs(60))?;
    log::info!(
        "settled after {:?}: {} frames published, starting scale index {}",
        watch.elapsed(),
        viewer.target().published_count(),
        viewer.renderer().max_scale_index()
    );

    write_png(&image, &out)?;
    log::info!("wrote {}", out.display());
    Ok(())
}

// ── data ──────────────────────────────────────────────────────────────────

/// Cube of u16 with two nested shells and a ripple, z voxels twice as deep.
fn volume_source() -> anyhow::Result<SimpleSource<Affine3, NLinear<u16>, LutConverter>> {
    let c = (VOLUME as f64 - 1.0) / 2.0;
    let img = ArrayImg::from_fn(vec![VOLUME; 3], |p| {
        let (x, y, z) = (p[0] as f64 - c, p[1] as f64 - c, p[2] as f64 - c);
        let r = (x * x + y * y + z * z).sqrt() / c;
        let shells =
            (-((r - 0.8) * 12.0).powi(2)).exp() + 0.6 * (-((r - 0.35) * 10.0).powi(2)).exp();
        let ripple = 0.25 * (1.0 + (x * 0.3).sin() * (y * 0.3).cos());
        let v = if r <= 1.0 { shells + ripple * (1.0 - r) } else { 0.0 };
        (v.clamp(0.0, 1.0) * MAX_VALUE) as u16
    })
    .context("failed to build volume")?;

    let mut calibration = Affine3::identity();
    calibration.set_entry(2, 2, 2.0);
    let sampler = NLinear::new(Arc::new(img), 0.0).context("failed to build sampler")?;
    Ok(SimpleSource::new(
        sampler,
        calibration,
        LutConverter::new(0.0, MAX_VALUE, Lut::fire()),
    ))
}

/// Volume centered on the canvas, slicing through its middle.
fn initial_view() -> Affine3 {
    let half = VOLUME as f64 / 2.0;
    let mut t = Affine3::from_translation(-half, -half, -(VOLUME as f64));
    t.scale(4.0)
        .translate(CANVAS.width as f64 / 2.0, CANVAS.height as f64 / 2.0, 0.0);
    t
}

// ── interaction ───────────────────────────────────────────────────────────

/// Stands in for mouse drags and wheel turns arriving every few ms.
fn simulate_input(viewer: &InteractiveViewer<Affine3>) {
    let (cx, cy) = (CANVAS.width as f64 / 2.0, CANVAS.height as f64 / 2.0);
    for step in 0..40 {
        viewer.update_transform(|t| {
            t.rotate_about(1, 0.03, cx, cy);
            t.rotate_about(0, 0.01, cx, cy);
        });
        if step % 8 == 0 {
            viewer.update_transform(|t| {
                t.translate(-cx, -cy, 0.0).scale(1.05).translate(cx, cy, 0.0);
            });
        }
        thread::sleep(Duration::from_millis(12));
    }
    log::debug!("input burst done");
}

/// Waits for the painter to go idle, i.e. the refinement chain finished.
fn wait_until_settled(
    viewer: &InteractiveViewer<Affine3>,
    timeout: Duration,
) -> anyhow::Result<Arc<ScreenImage>> {
    let deadline = Instant::now() + timeout;
    let signal = viewer.renderer().signal();
    while signal.state() != PainterState::Idle {
        if Instant::now() >= deadline {
            bail!("no settled frame within {timeout:?}");
        }
        thread::sleep(Duration::from_millis(5));
    }
    let image = viewer
        .target()
        .image()
        .context("renderer went idle without publishing")?;
    if image.size() != CANVAS {
        bail!(
            "last frame is {}x{}, expected {}x{}",
            image.width(),
            image.height(),
            CANVAS.width,
            CANVAS.height
        );
    }
    Ok(image)
}

fn write_png(image: &ScreenImage, path: &Path) -> anyhow::Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width(), image.height(), image.to_rgba8())
        .context("pixel buffer does not match image size")?;
    rgba.save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}
