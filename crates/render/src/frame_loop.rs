use std::cell::Cell;
use std::rc::Rc;

use crate::context::AppContext;
use crate::renderer::Renderer;

/// Host hook that arranges for the next frame callback.
pub trait FrameScheduler {
    fn schedule_next(&mut self);
}

/// Shared stop switch for a [`RenderLoop`]. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stopped: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// Per-frame driver: advance controls, draw, reschedule.
#[derive(Debug, Default)]
pub struct RenderLoop {
    handle: LoopHandle,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_stopped()
    }

    /// Completed ticks.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. Returns `None` without drawing or rescheduling once
    /// the loop has been stopped.
    pub fn tick<R, S>(
        &mut self,
        ctx: &mut AppContext,
        renderer: &mut R,
        scheduler: &mut S,
    ) -> Option<R::Output>
    where
        R: Renderer + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if self.handle.is_stopped() {
            return None;
        }
        ctx.controls.update(&mut ctx.camera);
        let output = renderer.render(&ctx.scene, &ctx.camera);
        scheduler.schedule_next();
        self.frames += 1;
        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use chora_scene::Scene;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Draw,
        Schedule,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct RecordingRenderer(Log);

    impl Renderer for RecordingRenderer {
        type Output = usize;

        fn render(&mut self, scene: &Scene, _camera: &OrbitCamera) -> usize {
            self.0.borrow_mut().push(Event::Draw);
            scene.len()
        }
    }

    struct RecordingScheduler(Log);

    impl FrameScheduler for RecordingScheduler {
        fn schedule_next(&mut self) {
            self.0.borrow_mut().push(Event::Schedule);
        }
    }

    fn harness() -> (Log, RecordingRenderer, RecordingScheduler, AppContext) {
        let log = Log::default();
        (
            log.clone(),
            RecordingRenderer(log.clone()),
            RecordingScheduler(log),
            AppContext::new(800.0, 600.0, 1.0),
        )
    }

    #[test]
    fn ticks_draw_then_reschedule() {
        let (log, mut renderer, mut scheduler, mut ctx) = harness();
        let mut frame_loop = RenderLoop::new();
        for _ in 0..5 {
            assert_eq!(
                frame_loop.tick(&mut ctx, &mut renderer, &mut scheduler),
                Some(0)
            );
        }
        assert_eq!(frame_loop.frames(), 5);

        let log = log.borrow();
        assert_eq!(log.len(), 10);
        for pair in log.chunks(2) {
            assert_eq!(pair, [Event::Draw, Event::Schedule]);
        }
    }

    #[test]
    fn stopped_loop_does_nothing() {
        let (log, mut renderer, mut scheduler, mut ctx) = harness();
        let mut frame_loop = RenderLoop::new();
        frame_loop.tick(&mut ctx, &mut renderer, &mut scheduler);

        let handle = frame_loop.handle();
        handle.stop();
        assert!(!frame_loop.is_running());
        assert_eq!(
            frame_loop.tick(&mut ctx, &mut renderer, &mut scheduler),
            None
        );
        assert_eq!(frame_loop.frames(), 1);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn tick_advances_damping() {
        let (_, mut renderer, mut scheduler, mut ctx) = harness();
        ctx.controls.rotate_left(1.0);
        let start = ctx.camera.position;
        let mut frame_loop = RenderLoop::new();
        frame_loop.tick(&mut ctx, &mut renderer, &mut scheduler);
        assert_ne!(ctx.camera.position, start);
    }

    #[test]
    fn renderer_trait_objects_work() {
        let (log, renderer, mut scheduler, mut ctx) = harness();
        let mut boxed: Box<dyn Renderer<Output = usize>> = Box::new(renderer);
        let mut frame_loop = RenderLoop::new();
        frame_loop.tick(&mut ctx, boxed.as_mut(), &mut scheduler);
        assert_eq!(log.borrow()[0], Event::Draw);
    }
}
