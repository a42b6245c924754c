//! Per-frame compute/present protocol.
//!
//! Each frame the compute side takes ownership of the shared resource, writes
//! it, and hands it back before the graphics side draws from it:
//!
//! 1. acquire the shared resource
//! 2. update the animation argument
//! 3. dispatch the kernel over the full 2-D extent
//! 4. release the shared resource
//! 5. block until the queue drains
//! 6. draw
//! 7. block until GL has finished with the resource
//!
//! Acquire/release plus the two blocking drains are the only synchronisation
//! between the APIs, so the order above is never changed and a held resource
//! is always released.

use tracing::trace;

use crate::error::Result;

/// Compute half of the frame protocol (steps 1-5).
pub trait ComputeStage {
    /// Hand the shared resource to the compute queue.
    fn acquire(&mut self) -> Result<()>;

    /// Update the time-varying kernel argument.
    fn set_phase(&mut self, phase: f32) -> Result<()>;

    /// Enqueue the kernel over a `width` x `height` grid.
    fn dispatch(&mut self, width: u32, height: u32) -> Result<()>;

    /// Hand the shared resource back to the graphics API.
    fn release(&mut self) -> Result<()>;

    /// Block until all queued compute work has completed.
    fn finish(&mut self) -> Result<()>;
}

/// Graphics half of the frame protocol (steps 6-7).
pub trait PresentStage {
    fn draw(&mut self) -> Result<()>;

    /// Block until all GL commands issued so far have completed, so the next
    /// acquire never races a pending draw.
    fn finish(&mut self) -> Result<()>;
}

/// Drives one compute dispatch and one draw per frame.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    width: u32,
    height: u32,
    phase: f32,
    phase_step: f32,
    frame: u64,
}

impl FrameDriver {
    pub fn new(width: u32, height: u32, phase_step: f32) -> Self {
        Self {
            width,
            height,
            phase: 0.0,
            phase_step,
            frame: 0,
        }
    }

    /// Current value of the animation argument.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Number of frames that completed the compute half.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Run one full frame. Drawing is skipped if the compute half fails.
    pub fn run_frame<C, P>(&mut self, compute: &mut C, present: &mut P) -> Result<()>
    where
        C: ComputeStage + ?Sized,
        P: PresentStage + ?Sized,
    {
        self.compute(compute)?;

        let drawn = present.draw();
        let finished = present.finish();
        drawn.and(finished)
    }

    fn compute<C: ComputeStage + ?Sized>(&mut self, compute: &mut C) -> Result<()> {
        compute.acquire()?;

        self.phase += self.phase_step;
        let work = compute
            .set_phase(self.phase)
            .and_then(|()| compute.dispatch(self.width, self.height));

        // Release and drain even if the dispatch failed; the first error wins.
        let released = compute.release();
        let finished = compute.finish();
        work.and(released).and(finished)?;

        self.frame += 1;
        trace!(frame = self.frame, phase = self.phase, "compute frame done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TracerError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Acquire,
        SetPhase(f32),
        Dispatch(u32, u32),
        Release,
        Finish,
        Draw,
        GlFinish,
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    #[derive(Default)]
    struct MockCompute {
        log: Log,
        fail_acquire: bool,
        fail_set_phase: bool,
        fail_dispatch: bool,
        fail_release: bool,
    }

    impl ComputeStage for MockCompute {
        fn acquire(&mut self) -> Result<()> {
            if self.fail_acquire {
                return Err(TracerError::compute("acquire"));
            }
            self.log.borrow_mut().push(Call::Acquire);
            Ok(())
        }

        fn set_phase(&mut self, phase: f32) -> Result<()> {
            self.log.borrow_mut().push(Call::SetPhase(phase));
            if self.fail_set_phase {
                return Err(TracerError::compute("set phase"));
            }
            Ok(())
        }

        fn dispatch(&mut self, width: u32, height: u32) -> Result<()> {
            self.log.borrow_mut().push(Call::Dispatch(width, height));
            if self.fail_dispatch {
                return Err(TracerError::compute("dispatch"));
            }
            Ok(())
        }

        fn release(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Call::Release);
            if self.fail_release {
                return Err(TracerError::compute("release"));
            }
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Call::Finish);
            Ok(())
        }
    }

    struct MockPresent {
        log: Log,
        fail_draw: bool,
    }

    impl PresentStage for MockPresent {
        fn draw(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Call::Draw);
            if self.fail_draw {
                return Err(TracerError::graphics("draw"));
            }
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Call::GlFinish);
            Ok(())
        }
    }

    fn mocks() -> (Log, MockCompute, MockPresent) {
        let log = Log::default();
        let compute = MockCompute {
            log: log.clone(),
            ..Default::default()
        };
        let present = MockPresent {
            log: log.clone(),
            fail_draw: false,
        };
        (log, compute, present)
    }

    fn strip_phase(calls: &[Call]) -> Vec<Call> {
        calls
            .iter()
            .map(|c| match c {
                Call::SetPhase(_) => Call::SetPhase(0.0),
                other => other.clone(),
            })
            .collect()
    }

    #[test]
    fn every_frame_follows_protocol_order() {
        let (log, mut compute, mut present) = mocks();
        let mut driver = FrameDriver::new(800, 600, 0.01);

        for _ in 0..3 {
            driver.run_frame(&mut compute, &mut present).unwrap();
        }

        let expected_frame = [
            Call::Acquire,
            Call::SetPhase(0.0),
            Call::Dispatch(800, 600),
            Call::Release,
            Call::Finish,
            Call::Draw,
            Call::GlFinish,
        ];
        let calls = strip_phase(&log.borrow());
        assert_eq!(calls.len(), 21);
        for frame in calls.chunks(7) {
            assert_eq!(frame, expected_frame);
        }
        assert_eq!(driver.frame(), 3);
    }

    #[test]
    fn phase_advances_by_step_each_frame() {
        let (log, mut compute, mut present) = mocks();
        let mut driver = FrameDriver::new(4, 4, 0.5);

        driver.run_frame(&mut compute, &mut present).unwrap();
        driver.run_frame(&mut compute, &mut present).unwrap();

        let phases: Vec<f32> = log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::SetPhase(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(phases, vec![0.5, 1.0]);
        assert_eq!(driver.phase(), 1.0);
    }

    #[test]
    fn failed_dispatch_still_releases_and_skips_draw() {
        let (log, mut compute, mut present) = mocks();
        compute.fail_dispatch = true;
        let mut driver = FrameDriver::new(2, 2, 0.01);

        let err = driver.run_frame(&mut compute, &mut present).unwrap_err();
        assert!(matches!(err, TracerError::Compute(ref m) if m == "dispatch"));

        let calls = strip_phase(&log.borrow());
        assert_eq!(
            calls,
            vec![
                Call::Acquire,
                Call::SetPhase(0.0),
                Call::Dispatch(2, 2),
                Call::Release,
                Call::Finish,
            ]
        );
        assert_eq!(driver.frame(), 0);
    }

    #[test]
    fn failed_acquire_touches_nothing_else() {
        let (log, mut compute, mut present) = mocks();
        compute.fail_acquire = true;
        let mut driver = FrameDriver::new(2, 2, 0.01);

        assert!(driver.run_frame(&mut compute, &mut present).is_err());
        assert!(log.borrow().is_empty());
        assert_eq!(driver.phase(), 0.0);
    }

    #[test]
    fn failed_set_phase_skips_dispatch_but_still_releases() {
        let (log, mut compute, mut present) = mocks();
        compute.fail_set_phase = true;
        let mut driver = FrameDriver::new(2, 2, 0.01);

        let err = driver.run_frame(&mut compute, &mut present).unwrap_err();
        assert!(matches!(err, TracerError::Compute(ref m) if m == "set phase"));

        let calls = strip_phase(&log.borrow());
        assert_eq!(
            calls,
            vec![
                Call::Acquire,
                Call::SetPhase(0.0),
                Call::Release,
                Call::Finish,
            ]
        );
        assert_eq!(driver.frame(), 0);
    }

    #[test]
    fn failed_release_still_drains_and_is_reported() {
        let (log, mut compute, mut present) = mocks();
        compute.fail_release = true;
        let mut driver = FrameDriver::new(2, 2, 0.01);

        let err = driver.run_frame(&mut compute, &mut present).unwrap_err();
        assert!(matches!(err, TracerError::Compute(ref m) if m == "release"));

        let calls = strip_phase(&log.borrow());
        assert_eq!(
            calls,
            vec![
                Call::Acquire,
                Call::SetPhase(0.0),
                Call::Dispatch(2, 2),
                Call::Release,
                Call::Finish,
            ]
        );
        assert_eq!(driver.frame(), 0);
    }

    #[test]
    fn gl_is_drained_even_when_draw_fails() {
        let (log, mut compute, mut present) = mocks();
        present.fail_draw = true;
        let mut driver = FrameDriver::new(2, 2, 0.01);

        let err = driver.run_frame(&mut compute, &mut present).unwrap_err();
        assert!(matches!(err, TracerError::Graphics(ref m) if m == "draw"));

        let calls = log.borrow();
        assert_eq!(&calls[calls.len() - 2..], [Call::Draw, Call::GlFinish]);
        assert_eq!(driver.frame(), 1);
    }
}
