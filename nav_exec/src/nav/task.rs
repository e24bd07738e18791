//! # Waypoint navigation task
//!
//! Each cycle the task:
//!
//! 1. Takes a new trajectory if one was received, and hands a copy to the tracker.
//! 2. Applies a speed override if one was received.
//! 3. Runs the tracker on the latest pose, or reports `NoTrajectory`/`NoPose` if it can't.
//! 4. Publishes the navigation state when it changes.
//! 5. Writes the motion command through the gate.
//! 6. Publishes the tracker's lookahead point and segment.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};

// Internal
use super::*;
use crate::loc::Pose;
use comms_if::{
    nav::{MotionCommand, NavigationState, ReportedState, Waypoint},
    port::{InputPort, OutputPort, PortRead},
};
use util::module::Task;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct WaypointNavigation<T: PathTracker> {
    /// Trajectory to follow
    pub trajectory_in: InputPort<Vec<Waypoint>>,

    /// Current pose of the rover
    pub pose_in: InputPort<Pose>,

    /// Replaces the tracker's translational velocity
    pub speed_override_in: InputPort<f64>,

    pub motion_command_out: OutputPort<MotionCommand>,

    /// The tracker's lookahead point
    pub current_waypoint_out: OutputPort<Waypoint>,

    /// Code of the navigation state, written on change
    pub nav_state_out: OutputPort<i32>,

    pub current_segment_out: OutputPort<usize>,

    /// The tracker, only present while configured
    tracker: Option<T>,

    store: TrajectoryStore,

    state_machine: NavStateMachine,

    gate: CommandGate,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WaypointNavigationError {
    #[error("Invalid navigation parameters: {0}")]
    InvalidParams(#[from] NavParamsError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T: PathTracker> WaypointNavigation<T> {
    pub fn new() -> Self {
        Self {
            trajectory_in: InputPort::new("trajectory"),
            pose_in: InputPort::new("pose"),
            speed_override_in: InputPort::new("speed_override"),
            motion_command_out: OutputPort::new("motion_command"),
            current_waypoint_out: OutputPort::new("current_waypoint"),
            nav_state_out: OutputPort::new("nav_state"),
            current_segment_out: OutputPort::new("current_segment"),
            tracker: None,
            store: TrajectoryStore::new(),
            state_machine: NavStateMachine::new(),
            gate: CommandGate::default(),
        }
    }

    pub fn tracker(&self) -> Option<&T> {
        self.tracker.as_ref()
    }

    pub fn trajectory(&self) -> &TrajectoryStore {
        &self.store
    }

    /// The currently published navigation state.
    pub fn nav_state(&self) -> Option<NavigationState> {
        self.state_machine.published()
    }

    /// True while the rover is held stopped.
    pub fn is_stopped(&self) -> bool {
        self.gate.is_stopped()
    }

    fn emit(&mut self, decision: GateDecision, cmd: &MotionCommand) {
        if let Some(c) = self.gate.process(decision, cmd) {
            debug!("Motion command: {:?}", c);
            self.motion_command_out.write(c);
        }
    }
}

impl<T: PathTracker> Default for WaypointNavigation<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PathTracker> Task for WaypointNavigation<T> {
    type Config = NavParams;
    type Error = WaypointNavigationError;

    fn configure(&mut self, params: NavParams) -> Result<(), WaypointNavigationError> {
        params.validate()?;

        let mut tracker = T::new(&params.tracker);
        tracker.set_pd_config(&params.pd);
        tracker.set_tolerances(params.position_tolerance_m, params.heading_tolerance_rad);
        self.tracker = Some(tracker);

        self.store.clear();
        self.gate = CommandGate::new(params.repeat_command);
        self.state_machine.reset();

        info!(
            "Waypoint navigation configured: velocity = {} m/s, lookahead = {} m{}",
            params.tracker.translational_velocity_ms,
            params.tracker.lookahead_distance_m,
            if params.tracker.backwards { ", backwards" } else { "" }
        );

        Ok(())
    }

    fn start(&mut self) -> Result<(), WaypointNavigationError> {
        info!("Waypoint navigation started with {} waypoints", self.store.len());
        Ok(())
    }

    fn update(&mut self) {
        let tracker = match self.tracker.as_mut() {
            Some(t) => t,
            None => {
                warn!("Waypoint navigation has no tracker, is it configured?");
                return;
            }
        };

        // ---- INPUTS ----

        if let PortRead::NewData(waypoints) = self.trajectory_in.read_newest() {
            self.store.replace(waypoints);
            tracker.set_trajectory(self.store.to_vec());
        }

        if let PortRead::NewData(speed_ms) = self.speed_override_in.read_newest() {
            if speed_ms.is_finite() {
                info!("Translational velocity overridden to {} m/s", speed_ms);
                tracker.set_translational_velocity(speed_ms);
            }
            else {
                warn!("Rejecting non-finite speed override {}", speed_ms);
            }
        }

        // ---- TRACKING ----

        let mut tracker_ran = false;
        let (reported, cmd) = if self.store.is_empty() {
            (ReportedState::from(NavigationState::NoTrajectory), MotionCommand::zero())
        }
        else {
            // An old pose is still the best estimate available
            match self.pose_in.read_newest().sample() {
                Some(pose) => {
                    tracker.set_pose(&pose);
                    let cmd = tracker.update();
                    tracker_ran = true;
                    (tracker.navigation_state(), cmd)
                }
                None => (ReportedState::from(NavigationState::NoPose), MotionCommand::zero()),
            }
        };

        // ---- OUTPUTS ----

        let mut decision = self.state_machine.interpret(reported);
        if self.state_machine.changed() {
            if let Some(state) = self.state_machine.published() {
                self.nav_state_out.write(state.code());
            }
        }

        if !cmd.is_finite() {
            warn!("Tracker produced a non-finite command {:?}, stopping the rover", cmd);
            decision = GateDecision::Stop;
        }

        self.emit(decision, &cmd);

        if tracker_ran {
            if let Some(tracker) = self.tracker.as_ref() {
                if let Some(wp) = tracker.lookahead_point() {
                    self.current_waypoint_out.write(wp);
                }
                self.current_segment_out.write(tracker.current_segment());
            }
        }
    }

    fn stop(&mut self) {
        self.emit(GateDecision::Stop, &MotionCommand::zero());
        info!("Waypoint navigation stopped");
    }

    fn cleanup(&mut self) {
        self.tracker = None;
        self.store.clear();
        self.trajectory_in.clear();
        self.pose_in.clear();
        self.speed_override_in.clear();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::nav::params::test::nav_params;
    use nalgebra::Vector2;
    use util::module::{TaskRunner, TaskState};

    /// Tracker whose command and state are set by the test.
    struct ScriptedTracker {
        velocity_ms: f64,
        pd: Option<PdConfig>,
        tolerances: Option<(f64, f64)>,
        trajectory: Vec<Waypoint>,
        pose: Option<Pose>,
        num_updates: usize,

        state: ReportedState,
        cmd: MotionCommand,
    }

    impl PathTracker for ScriptedTracker {
        fn new(config: &TrackerConfig) -> Self {
            Self {
                velocity_ms: config.translational_velocity_ms,
                pd: None,
                tolerances: None,
                trajectory: Vec::new(),
                pose: None,
                num_updates: 0,
                state: NavigationState::Driving.into(),
                cmd: MotionCommand::new(config.translational_velocity_ms, 0.0),
            }
        }

        fn set_trajectory(&mut self, waypoints: Vec<Waypoint>) {
            self.trajectory = waypoints;
        }

        fn set_pose(&mut self, pose: &Pose) {
            self.pose = Some(*pose);
        }

        fn update(&mut self) -> MotionCommand {
            self.num_updates += 1;
            self.cmd
        }

        fn navigation_state(&self) -> ReportedState {
            self.state
        }

        fn lookahead_point(&self) -> Option<Waypoint> {
            self.trajectory.last().copied()
        }

        fn current_segment(&self) -> usize {
            self.num_updates
        }

        fn set_translational_velocity(&mut self, velocity_ms: f64) {
            self.velocity_ms = velocity_ms;
        }

        fn set_pd_config(&mut self, pd: &PdConfig) {
            self.pd = Some(*pd);
        }

        fn set_tolerances(&mut self, position_m: f64, heading_rad: f64) {
            self.tolerances = Some((position_m, heading_rad));
        }
    }

    type Runner = TaskRunner<WaypointNavigation<ScriptedTracker>>;

    fn runner() -> Runner {
        let mut runner = TaskRunner::new("waypoint_nav", WaypointNavigation::new());
        runner.configure(nav_params()).unwrap();
        runner.start().unwrap();
        runner
    }

    /// Runner with a trajectory and pose, ready to drive.
    fn driving_runner() -> Runner {
        let mut runner = runner();
        let task = runner.task_mut();
        task.trajectory_in.push(vec![Waypoint::new(0.0, 0.0), Waypoint::new(2.0, 0.0)]);
        task.pose_in.push(Pose::from_start(Vector2::zeros(), 0.0));
        runner
    }

    fn script(runner: &mut Runner, state: ReportedState, cmd: MotionCommand) {
        // Unwrap safe, the task is configured
        let tracker = runner.task_mut().tracker.as_mut().unwrap();
        tracker.state = state;
        tracker.cmd = cmd;
    }

    fn run(runner: &mut Runner, cycles: usize) {
        for _ in 0..cycles {
            assert!(runner.update());
        }
    }

    #[test]
    fn test_configure() {
        let runner = runner();
        let tracker = runner.task().tracker().unwrap();

        assert_eq!(tracker.velocity_ms, 0.1);
        assert_eq!(tracker.pd, Some(PdConfig { p: 1.0, d: 0.1, saturation: 0.3 }));
        assert_eq!(tracker.tolerances, Some((0.1, 0.05)));
        assert_eq!(runner.task().nav_state(), None);

        let mut params = nav_params();
        params.pd.saturation = 0.0;
        let mut runner: Runner = TaskRunner::new("waypoint_nav", WaypointNavigation::new());
        assert!(runner.configure(params).is_err());
        assert_eq!(runner.state(), TaskState::Unconfigured);
        assert!(runner.task().tracker().is_none());
        assert!(runner.start().is_err());
    }

    #[test]
    fn test_no_trajectory() {
        let mut runner = runner();
        runner.task_mut().pose_in.push(Pose::default());

        run(&mut runner, 5);

        let task = runner.task_mut();
        assert_eq!(task.nav_state_out.drain(), vec![NavigationState::NoTrajectory.code()]);
        assert_eq!(task.motion_command_out.drain(), vec![MotionCommand::zero()]);
        assert_eq!(task.current_segment_out.num_writes(), 0);
        assert_eq!(task.tracker().unwrap().num_updates, 0);
        assert!(task.is_stopped());
    }

    #[test]
    fn test_no_pose() {
        let mut runner = runner();
        runner.task_mut().trajectory_in.push(vec![Waypoint::new(1.0, 1.0)]);

        run(&mut runner, 3);

        let task = runner.task_mut();
        assert_eq!(task.nav_state_out.drain(), vec![NavigationState::NoPose.code()]);
        assert_eq!(task.motion_command_out.drain(), vec![MotionCommand::zero()]);

        // The tracker got the trajectory even though it never ran
        let tracker = task.tracker().unwrap();
        assert_eq!(tracker.trajectory, vec![Waypoint::new(1.0, 1.0)]);
        assert_eq!(tracker.num_updates, 0);
    }

    #[test]
    fn test_dedup_while_driving() {
        let mut runner = driving_runner();
        let cmd = MotionCommand::new(0.1, 0.02);
        script(&mut runner, NavigationState::Driving.into(), cmd);

        run(&mut runner, 10);

        {
            let task = runner.task_mut();
            assert_eq!(task.motion_command_out.drain(), vec![cmd]);
            assert_eq!(task.nav_state_out.drain(), vec![NavigationState::Driving.code()]);
            assert_eq!(task.current_segment_out.drain(), (1..=10usize).collect::<Vec<usize>>());
            assert_eq!(task.current_waypoint_out.num_writes(), 10);
            assert_eq!(task.current_waypoint_out.last(), Some(&Waypoint::new(2.0, 0.0)));

            // The same old pose is used every cycle
            assert_eq!(task.tracker().unwrap().num_updates, 10);
        }

        let cmd2 = MotionCommand::new(0.1, -0.02);
        script(&mut runner, NavigationState::Aligning.into(), cmd2);
        run(&mut runner, 3);

        let task = runner.task_mut();
        assert_eq!(task.motion_command_out.drain(), vec![cmd2]);
        assert_eq!(task.nav_state_out.drain(), vec![NavigationState::Aligning.code()]);
    }

    #[test]
    fn test_repeat_command() {
        let mut params = nav_params();
        params.repeat_command = true;

        let mut runner: Runner = TaskRunner::new("waypoint_nav", WaypointNavigation::new());
        runner.configure(params).unwrap();
        runner.start().unwrap();
        runner.task_mut().trajectory_in.push(vec![Waypoint::new(2.0, 0.0)]);
        runner.task_mut().pose_in.push(Pose::default());

        run(&mut runner, 4);
        assert_eq!(runner.task().motion_command_out.num_writes(), 4);

        // Stops are still only written once
        script(&mut runner, NavigationState::TargetReached.into(), MotionCommand::zero());
        run(&mut runner, 4);
        assert_eq!(runner.task().motion_command_out.num_writes(), 5);
    }

    #[test]
    fn test_safety_latch() {
        let mut runner = driving_runner();
        let cmd = MotionCommand::new(0.1, 0.0);
        script(&mut runner, NavigationState::Driving.into(), cmd);
        run(&mut runner, 2);

        // The tracker still asks to move, but the rover must stop
        script(&mut runner, NavigationState::OutOfBoundaries.into(), cmd);
        run(&mut runner, 5);

        {
            let task = runner.task_mut();
            assert_eq!(task.motion_command_out.drain(), vec![cmd, MotionCommand::zero()]);
            assert_eq!(
                task.nav_state_out.drain(),
                vec![NavigationState::Driving.code(), NavigationState::OutOfBoundaries.code()]
            );
            assert!(task.is_stopped());
        }

        script(&mut runner, NavigationState::Driving.into(), cmd);
        run(&mut runner, 2);

        let task = runner.task_mut();
        assert_eq!(task.motion_command_out.drain(), vec![cmd]);
        assert!(!task.is_stopped());
    }

    #[test]
    fn test_unrecognised_state() {
        let mut runner = driving_runner();
        let cmd = MotionCommand::new(0.1, 0.0);
        run(&mut runner, 1);

        script(&mut runner, ReportedState::from(99), cmd);
        run(&mut runner, 3);

        let task = runner.task_mut();
        assert_eq!(task.motion_command_out.drain(), vec![cmd, MotionCommand::zero()]);
        assert_eq!(task.nav_state_out.drain(), vec![NavigationState::Driving.code()]);
        assert_eq!(task.nav_state(), Some(NavigationState::Driving));
        assert!(task.is_stopped());
    }

    #[test]
    fn test_non_finite_command_stops() {
        let mut runner = driving_runner();
        script(
            &mut runner,
            NavigationState::Driving.into(),
            MotionCommand::new(f64::NAN, 0.0)
        );

        run(&mut runner, 5);

        {
            let task = runner.task_mut();
            let cmds = task.motion_command_out.drain();
            assert!(cmds.iter().all(|c| c.is_finite()));
            assert_eq!(cmds, vec![MotionCommand::zero()]);
            assert!(task.is_stopped());

            // The state is still what the tracker reported
            assert_eq!(task.nav_state(), Some(NavigationState::Driving));
        }

        let cmd = MotionCommand::new(0.1, 0.0);
        script(&mut runner, NavigationState::Driving.into(), cmd);
        run(&mut runner, 2);

        let task = runner.task_mut();
        assert_eq!(task.motion_command_out.drain(), vec![cmd]);
        assert!(!task.is_stopped());
    }

    #[test]
    fn test_speed_override() {
        let mut runner = driving_runner();

        runner.task_mut().speed_override_in.push(0.3);
        run(&mut runner, 1);
        assert_eq!(runner.task().tracker().unwrap().velocity_ms, 0.3);

        runner.task_mut().speed_override_in.push(f64::NAN);
        run(&mut runner, 1);
        assert_eq!(runner.task().tracker().unwrap().velocity_ms, 0.3);
    }

    #[test]
    fn test_new_trajectory_replaces_old() {
        let mut runner = driving_runner();
        run(&mut runner, 1);
        assert_eq!(runner.task().trajectory().len(), 2);

        runner.task_mut().trajectory_in.push(vec![Waypoint::new(-1.0, 3.0)]);
        run(&mut runner, 1);
        assert_eq!(runner.task().trajectory().waypoints(), &[Waypoint::new(-1.0, 3.0)]);
        assert_eq!(runner.task().tracker().unwrap().trajectory, vec![Waypoint::new(-1.0, 3.0)]);

        // An empty trajectory stops the rover
        runner.task_mut().trajectory_in.push(Vec::new());
        run(&mut runner, 1);
        assert_eq!(runner.task().nav_state(), Some(NavigationState::NoTrajectory));
        assert_eq!(runner.task().motion_command_out.last(), Some(&MotionCommand::zero()));
    }

    #[test]
    fn test_stop_and_cleanup() {
        let mut runner = driving_runner();
        let cmd = MotionCommand::new(0.1, 0.0);
        run(&mut runner, 3);

        runner.stop().unwrap();
        assert_eq!(
            runner.task_mut().motion_command_out.drain(),
            vec![cmd, MotionCommand::zero()]
        );

        // Restarting and stopping again doesn't repeat the zero
        runner.start().unwrap();
        runner.stop().unwrap();
        assert!(runner.task_mut().motion_command_out.drain().is_empty());

        runner.cleanup().unwrap();
        assert!(runner.task().tracker().is_none());
        assert!(runner.task().trajectory().is_empty());

        // Reconfiguring starts from scratch
        runner.configure(nav_params()).unwrap();
        runner.start().unwrap();
        run(&mut runner, 1);
        assert_eq!(runner.task().nav_state(), Some(NavigationState::NoTrajectory));
        assert_eq!(runner.task().motion_command_out.last(), Some(&MotionCommand::zero()));
    }
}
