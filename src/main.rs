// Air Canvas: draw in the air over a live camera feed.
// • Index finger extended: draw. Index + middle: pick a color or brush size
//   from the header. (Without a hand tracker wired in, the mouse stands in:
//   hold Left to draw, Right to select.)
// • C cycles the palette, X clears, +/- resize the brush, nine digits enter
//   a custom BGR color, Q or ESC quits.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use air_canvas::camera::CameraCapture;
use air_canvas::compositor;
use air_canvas::config::Config;
use air_canvas::draw::Drawer;
use air_canvas::error::Error;
use air_canvas::ledger::Ledger;
use air_canvas::overlay::OverlaySet;
use air_canvas::raster;
use air_canvas::session::{KeyCommand, SessionState};
use air_canvas::tracker::{HandTracker, PointerTracker, TrackerSettings};

fn main() -> Result<(), Error> {
    /* --- Configuration + logging --- */
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    let default_level = if config.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    info!(
        "canvas {}x{}, header {}, stroke lifetime {:.0}s",
        config.canvas_width, config.canvas_height, config.header_height,
        config.stroke_lifetime_secs
    );

    /* --- Camera + window + overlays --- */
    let mut cam = CameraCapture::new(
        0,
        config.canvas_width as u32,
        config.canvas_height as u32,
    )?;
    let (cam_w, cam_h) = cam.resolution();
    debug!("camera streaming at {cam_w}x{cam_h}");

    let mut drawer = Drawer::new("Air Canvas", config.canvas_width, config.canvas_height)?;

    let overlays = OverlaySet::load(&config);
    info!("loaded {} overlay image(s)", overlays.len());

    /* --- Session state --- */
    let mut state = SessionState::new(&config, overlays.initial_key(), Instant::now());
    let mut ledger = Ledger::new(config.stroke_lifetime());
    let mut tracker = PointerTracker::new(TrackerSettings {
        detection_confidence: config.detection_confidence,
        tracking_confidence: config.tracking_confidence,
    });

    /* --- FPS bookkeeping --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    'run: while drawer.is_open() {
        let now = Instant::now();

        /* 1) Capture. A missed frame is transient: skip the iteration. */
        let mut frame = match cam.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("no frame captured: {e}");
                continue;
            }
        };

        /* 2) Mirror for a selfie view and normalize to canvas size. */
        raster::flip_horizontal(&mut frame);
        if frame.width != config.canvas_width || frame.height != config.canvas_height {
            frame = raster::resize_nearest(&frame, config.canvas_width, config.canvas_height);
        }

        /* 3) Track the hand and run one frame of gesture handling. */
        tracker.set_pointer(drawer.pointer());
        let observation = tracker.detect(&frame);
        state.step(&mut frame, observation.as_ref(), &mut ledger, &config, now);

        /* 4) Re-rasterize the surviving strokes and composite. */
        let layer = ledger.rasterize(
            now,
            config.canvas_width,
            config.canvas_height,
            config.header_height,
        );
        let header = overlays.get(state.overlay_key());
        let countdown = state.countdown(observation.is_some(), now, &config);
        let output = compositor::compose(
            &frame,
            &layer,
            header,
            state.thickness(),
            countdown,
            &config,
        );

        /* 5) Present, then handle this frame's key presses. */
        drawer.present(&output)?;
        for cmd in drawer.poll_commands() {
            if cmd == KeyCommand::Quit {
                break 'run;
            }
            state.handle_key(cmd, &mut ledger, &overlays, &config);
        }

        /* 6) FPS counter, once per second at debug level. */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
