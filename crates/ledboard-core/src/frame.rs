//! Per-frame render pipeline: clear, draw the foreground app, overlay, push.

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use log::{info, warn};

use crate::{
    display::{Canvas, Panel},
    scheduler::Scheduler,
};

const REPORT_INTERVAL_MS: u64 = 5_000;
const BADGE_ORIGIN: Point = Point::new(0, 16);
const BADGE_SIZE: Size = Size::new(8, 8);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameResult {
    Pushed,
    /// Render failed; the panel keeps showing the previous frame.
    StaleKept,
    PanelFault,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub pushed: u64,
    pub stale: u64,
    pub panel_faults: u64,
    /// Time between the last two pushed frames.
    pub last_delta_ms: u64,
}

pub struct FrameLoop<P: Panel> {
    panel: P,
    frame: Canvas,
    stats: FrameStats,
    last_push_ms: Option<u64>,
    report_start_ms: u64,
    report_frames: u64,
    panel_fault_logged: bool,
}

impl<P: Panel> FrameLoop<P> {
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            frame: Canvas::new(),
            stats: FrameStats::default(),
            last_push_ms: None,
            report_start_ms: 0,
            report_frames: 0,
            panel_fault_logged: false,
        }
    }

    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    pub const fn frame(&self) -> &Canvas {
        &self.frame
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Produces and pushes one frame for the foreground app.
    pub fn tick(&mut self, scheduler: &mut Scheduler, now_ms: u64) -> FrameResult {
        self.frame.clear();
        if let Err(err) = scheduler.render(&mut self.frame, now_ms) {
            warn!(
                "frame: render failed app={} err={}",
                scheduler.current_app_name(),
                err
            );
            self.stats.stale = self.stats.stale.saturating_add(1);
            return FrameResult::StaleKept;
        }

        if let Some(capture) = scheduler.capture_indicator(now_ms) {
            draw_capture_badge(&mut self.frame, capture);
        }

        if let Err(err) = self.panel.sync(&self.frame) {
            if !self.panel_fault_logged {
                warn!("frame: panel sync failed err={:?}", err);
                self.panel_fault_logged = true;
            }
            self.stats.panel_faults = self.stats.panel_faults.saturating_add(1);
            return FrameResult::PanelFault;
        }
        if self.panel_fault_logged {
            info!("frame: panel recovered");
            self.panel_fault_logged = false;
        }

        if self.last_push_ms.is_none() {
            info!("frame: first frame pushed app={}", scheduler.current_app_name());
            self.report_start_ms = now_ms;
        }
        self.stats.last_delta_ms = self
            .last_push_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.stats.pushed = self.stats.pushed.saturating_add(1);
        self.last_push_ms = Some(now_ms);
        self.report(now_ms);
        FrameResult::Pushed
    }

    /// Clears the panel. Used on shutdown.
    pub fn blank(&mut self) -> Result<(), P::Error> {
        self.frame.clear();
        self.panel.blank()
    }

    fn report(&mut self, now_ms: u64) {
        self.report_frames = self.report_frames.saturating_add(1);
        let elapsed_ms = now_ms.saturating_sub(self.report_start_ms);
        if elapsed_ms < REPORT_INTERVAL_MS {
            return;
        }

        let fps_x100 = self.report_frames * 100_000 / elapsed_ms.max(1);
        info!(
            "effective_fps={}.{:02} frames={} elapsed_ms={}",
            fps_x100 / 100,
            fps_x100 % 100,
            self.report_frames,
            elapsed_ms
        );
        self.report_frames = 0;
        self.report_start_ms = now_ms;
    }
}

/// Green filled square while capture is on, red outlined cross while off.
pub fn draw_capture_badge(frame: &mut Canvas, capture: bool) {
    let area = Rectangle::new(BADGE_ORIGIN, BADGE_SIZE);
    if capture {
        let _ = area
            .into_styled(PrimitiveStyle::with_fill(Rgb888::GREEN))
            .draw(frame);
        return;
    }

    let stroke = PrimitiveStyle::with_stroke(Rgb888::RED, 1);
    let _ = area.into_styled(stroke).draw(frame);
    let corner = BADGE_ORIGIN + Point::new(BADGE_SIZE.width as i32 - 1, BADGE_SIZE.height as i32 - 1);
    let _ = Line::new(BADGE_ORIGIN, corner).into_styled(stroke).draw(frame);
    let _ = Line::new(
        Point::new(BADGE_ORIGIN.x, corner.y),
        Point::new(corner.x, BADGE_ORIGIN.y),
    )
    .into_styled(stroke)
    .draw(frame);
}

#[cfg(test)]
mod tests {
    use hub75_fb::Rgb;

    use super::*;
    use crate::{
        app::{App, AppContext, AppError, AppResult},
        gesture::{Gesture, GestureSet},
        scheduler::SchedulerConfig,
    };

    #[derive(Default)]
    struct RecordingPanel {
        frames: Vec<Canvas>,
        fail: bool,
    }

    impl Panel for RecordingPanel {
        type Error = ();

        fn sync(&mut self, frame: &Canvas) -> Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    struct Fill {
        color: Rgb,
        broken: bool,
    }

    impl App for Fill {
        fn name(&self) -> &str {
            "fill"
        }

        fn render(&mut self, canvas: &mut Canvas, _now_ms: u64) -> AppResult {
            if self.broken {
                return Err(AppError::Unavailable);
            }
            canvas.fill(self.color);
            Ok(())
        }

        fn gestures(&self) -> GestureSet {
            GestureSet::of(&[Gesture::LongPress, Gesture::DoublePress])
        }

        fn on_gesture(&mut self, gesture: Gesture, ctx: &mut AppContext) -> AppResult {
            match gesture {
                Gesture::LongPress => {
                    ctx.toggle_capture_default_press();
                }
                _ => self.broken = true,
            }
            Ok(())
        }
    }

    fn scheduler() -> Scheduler {
        let apps: Vec<Box<dyn App>> = vec![Box::new(Fill {
            color: Rgb::BLUE,
            broken: false,
        })];
        let mut scheduler = Scheduler::new(apps, SchedulerConfig::default()).unwrap();
        scheduler.initialize_all(0);
        scheduler
    }

    #[test]
    fn pushes_rendered_frame() {
        let mut scheduler = scheduler();
        let mut frames = FrameLoop::new(RecordingPanel::default());

        assert_eq!(frames.tick(&mut scheduler, 16), FrameResult::Pushed);
        assert_eq!(frames.tick(&mut scheduler, 33), FrameResult::Pushed);

        let pushed = &frames.panel().frames;
        assert_eq!(pushed.len(), 2);
        assert_eq!(pushed[1].pixel(10, 10), Some(Rgb::BLUE));
        assert_eq!(frames.stats().last_delta_ms, 17);
    }

    #[test]
    fn failed_render_keeps_previous_frame() {
        let mut scheduler = scheduler();
        let mut frames = FrameLoop::new(RecordingPanel::default());
        frames.tick(&mut scheduler, 0);

        scheduler.dispatch(Gesture::DoublePress, 5);
        assert_eq!(frames.tick(&mut scheduler, 16), FrameResult::StaleKept);
        assert_eq!(frames.panel().frames.len(), 1);
        assert_eq!(frames.stats().stale, 1);
    }

    #[test]
    fn capture_badge_overlays_then_expires() {
        let mut scheduler = scheduler();
        let mut frames = FrameLoop::new(RecordingPanel::default());

        scheduler.dispatch(Gesture::LongPress, 100);
        frames.tick(&mut scheduler, 200);
        let frame = frames.panel().frames.last().unwrap();
        assert_eq!(frame.pixel(3, 19), Some(Rgb::GREEN));
        assert_eq!(frame.pixel(8, 19), Some(Rgb::BLUE));

        frames.tick(&mut scheduler, 2_600);
        let frame = frames.panel().frames.last().unwrap();
        assert_eq!(frame.pixel(3, 19), Some(Rgb::BLUE));
    }

    #[test]
    fn capture_off_badge_is_red_cross() {
        let mut frame = Canvas::new();
        draw_capture_badge(&mut frame, false);
        assert_eq!(frame.pixel(0, 16), Some(Rgb::RED));
        assert_eq!(frame.pixel(3, 19), Some(Rgb::RED));
        assert_eq!(frame.pixel(2, 18), Some(Rgb::RED));
        assert_eq!(frame.pixel(1, 18), Some(Rgb::BLACK));
    }

    #[test]
    fn panel_fault_is_counted() {
        let mut scheduler = scheduler();
        let mut frames = FrameLoop::new(RecordingPanel {
            fail: true,
            ..Default::default()
        });

        assert_eq!(frames.tick(&mut scheduler, 0), FrameResult::PanelFault);
        assert_eq!(frames.tick(&mut scheduler, 16), FrameResult::PanelFault);
        assert_eq!(frames.stats().panel_faults, 2);
        assert_eq!(frames.stats().pushed, 0);
    }
}
