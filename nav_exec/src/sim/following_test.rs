//! # Following test task
//!
//! A stand-in for the rover and its localisation. Each cycle the task integrates the latest
//! motion command over the time since the previous cycle and publishes the resulting pose, so
//! that a path tracker can be run in closed loop without any hardware.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, trace};
use nalgebra::Vector2;

use super::{integrator, FollowingTestParams, MotionCommandCache};
use crate::{clock::CycleTimer, loc::Pose};
use comms_if::{
    nav::MotionCommand,
    port::{InputPort, OutputPort, PortRead},
};
use util::{module::Task, time::Clock};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Motion simulation task.
pub struct FollowingTest<C: Clock> {
    /// Overrides the simulated pose when written to
    pub start_pose_in: InputPort<Pose>,

    /// Commands to simulate
    pub motion_command_in: InputPort<MotionCommand>,

    /// The simulated pose, written every cycle
    pub robot_pose_out: OutputPort<Pose>,

    /// Start pose from the configuration, `None` until configured
    start_pose: Option<Pose>,

    current_pose: Pose,

    cmd_cache: MotionCommandCache,

    timer: CycleTimer<C>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FollowingTestError {
    #[error("The start pose is not finite: position {0:?}, heading {1} deg")]
    InvalidStartPose([f64; 2], f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<C: Clock> FollowingTest<C> {
    pub fn new(clock: C) -> Self {
        Self {
            start_pose_in: InputPort::new("start_pose"),
            motion_command_in: InputPort::new("motion_command"),
            robot_pose_out: OutputPort::new("robot_pose"),
            start_pose: None,
            current_pose: Pose::default(),
            cmd_cache: MotionCommandCache::default(),
            timer: CycleTimer::new(clock),
        }
    }

    /// The pose as of the last cycle.
    pub fn current_pose(&self) -> &Pose {
        &self.current_pose
    }

    /// The command currently being simulated.
    pub fn current_cmd(&self) -> &MotionCommand {
        self.cmd_cache.current()
    }
}

impl<C: Clock> Task for FollowingTest<C> {
    type Config = FollowingTestParams;
    type Error = FollowingTestError;

    fn configure(&mut self, params: FollowingTestParams) -> Result<(), FollowingTestError> {
        let finite = params.start_position_m.iter().all(|v| v.is_finite())
            && params.start_heading_deg.is_finite();
        if !finite {
            return Err(FollowingTestError::InvalidStartPose(
                params.start_position_m,
                params.start_heading_deg,
            ));
        }

        let start = Pose::from_start(
            Vector2::from(params.start_position_m),
            params.start_heading_deg,
        );

        self.start_pose = Some(start);
        self.current_pose = start;
        self.cmd_cache.reset();

        info!("Config of robot pose done, robot = {}", self.current_pose);

        Ok(())
    }

    fn start(&mut self) -> Result<(), FollowingTestError> {
        self.timer.reset();
        info!("Following test started from {}", self.current_pose);
        Ok(())
    }

    fn update(&mut self) {
        if self.start_pose.is_none() {
            trace!("Start pose not received, not simulating");
            return;
        }

        // An externally set pose replaces the simulation for this cycle
        if let PortRead::NewData(pose) = self.start_pose_in.read_newest() {
            self.current_pose = pose;
            info!("New pose received: {}", self.current_pose);
            self.robot_pose_out.write(self.current_pose);
            return;
        }

        let cmd = *self.cmd_cache.refresh(&mut self.motion_command_in);
        let dt_s = self.timer.next_dt_s();

        trace!("Simulating {:?} with dt = {:.4} s", cmd, dt_s);

        self.current_pose = integrator::integrate(&self.current_pose, &cmd, dt_s);
        self.robot_pose_out.write(self.current_pose);
    }

    fn stop(&mut self) {
        info!("Following test stopped at {}", self.current_pose);
    }

    fn cleanup(&mut self) {
        self.start_pose = None;
        self.cmd_cache.reset();
        self.start_pose_in.clear();
        self.motion_command_in.clear();
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;
    use std::f64::consts::FRAC_PI_2;
    use util::{
        module::{TaskRunner, TaskState},
        time::ManualClock,
    };

    fn params() -> FollowingTestParams {
        FollowingTestParams {
            start_position_m: [1.0, 2.0],
            start_heading_deg: 90.0,
        }
    }

    fn runner(clock: &ManualClock) -> TaskRunner<FollowingTest<ManualClock>> {
        let mut runner = TaskRunner::new("following_test", FollowingTest::new(clock.clone()));
        runner.configure(params()).unwrap();
        runner.start().unwrap();
        runner
    }

    #[test]
    fn test_drives_forward() {
        let clock = ManualClock::new();
        let mut runner = runner(&clock);

        runner.task_mut().motion_command_in.push(MotionCommand::new(0.5, 0.0));

        for _ in 0..10 {
            clock.advance_s(0.1);
            runner.update();
        }

        let task = runner.task_mut();
        let poses = task.robot_pose_out.drain();
        assert_eq!(poses.len(), 10);

        // Heading is along +Y
        let pose = task.current_pose();
        assert!((pose.position_m_lm - Vector3::new(1.0, 2.5, 0.0)).norm() < 1e-9);
        assert!((pose.get_heading() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_command_is_held() {
        let clock = ManualClock::new();
        let mut runner = runner(&clock);

        runner.task_mut().motion_command_in.push(MotionCommand::new(0.0, 0.5));
        clock.advance_s(0.5);
        runner.update();

        // No new command, keep turning
        clock.advance_s(0.5);
        runner.update();

        let pose = *runner.task().current_pose();
        assert!((pose.get_heading() - (FRAC_PI_2 + 0.5)).abs() < 1e-9);
        assert!((pose.position_m_lm - Vector3::new(1.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_stale_gap_not_integrated() {
        let clock = ManualClock::new();
        let mut runner = runner(&clock);

        runner.task_mut().motion_command_in.push(MotionCommand::new(1.0, 0.0));
        clock.advance_s(5.0);
        runner.update();

        assert_eq!(runner.task().current_pose().position2(), Vector2::new(1.0, 2.0));
        assert_eq!(runner.task().robot_pose_out.num_writes(), 1);

        clock.advance_s(0.2);
        runner.update();
        assert!((runner.task().current_pose().position_m_lm[1] - 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_start_pose_override() {
        let clock = ManualClock::new();
        let mut runner = runner(&clock);

        runner.task_mut().motion_command_in.push(MotionCommand::new(1.0, 0.0));
        let reset_pose = Pose::from_start(Vector2::new(-3.0, 0.0), 0.0);
        runner.task_mut().start_pose_in.push(reset_pose);

        // The cycle which adopts the new pose doesn't simulate
        clock.advance_s(0.1);
        runner.update();
        assert_eq!(*runner.task().current_pose(), reset_pose);
        assert_eq!(runner.task().robot_pose_out.last(), Some(&reset_pose));

        // Then the command moves it along +X
        clock.advance_s(0.1);
        runner.update();
        assert!(runner.task().current_pose().position_m_lm[0] > -3.0);
    }

    #[test]
    fn test_not_configured() {
        let clock = ManualClock::new();
        let mut task = FollowingTest::new(clock.clone());

        // Driving the task directly without configuring does nothing
        task.update();
        assert_eq!(task.robot_pose_out.num_writes(), 0);

        let bad = FollowingTestParams {
            start_position_m: [f64::NAN, 0.0],
            start_heading_deg: 0.0,
        };
        let mut runner = TaskRunner::new("following_test", FollowingTest::new(clock));
        assert!(runner.configure(bad).is_err());
        assert_eq!(runner.state(), TaskState::Unconfigured);
    }

    #[test]
    fn test_cleanup_forgets_start_pose() {
        let clock = ManualClock::new();
        let mut runner = runner(&clock);

        runner.stop().unwrap();
        runner.cleanup().unwrap();

        runner.task_mut().update();
        assert_eq!(runner.task().robot_pose_out.num_writes(), 0);
    }
}
