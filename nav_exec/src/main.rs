//! Navigation simulation executable entry point.
//!
//! # Architecture
//!
//! The executable runs the `FollowingTest` task against a script of timestamped motion commands:
//!
//!     - Initialise the session, logging and parameters
//!     - Main loop:
//!         - Push any commands released by the script into the task
//!         - Update the task
//!         - Archive the poses written by the task
//!     - At the end of the script stop the task and save the final pose
//!
//! Usage:
//!
//! ```text
//! nav_exec <script> [--params <file>] [--cycle-period <s>] [--log-level <level>]
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use comms_if::nav::MotionCommand;
use nav_lib::{
    loc::Pose,
    sim::{FollowingTest, FollowingTestParams},
};
use util::{
    archive::Archiver,
    logger::{logger_init, parse_level},
    module::TaskRunner,
    script_interpreter::{Pending, ScriptInterpreter},
    session::{get_elapsed_seconds, Session},
    time::MonotonicClock,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(name = "nav_exec", about = "Simulates the rover following a script of motion commands")]
struct Opt {
    /// Script of motion commands, one `<time_s>: <command>;` per line
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Parameter file. Paths which don't exist are looked up in `$NAV_SW_ROOT/params`.
    #[structopt(long, parse(from_os_str), default_value = "following_test.toml")]
    params: PathBuf,

    /// Target period of one cycle in seconds
    #[structopt(long, default_value = "0.1")]
    cycle_period: f64,

    /// Minimum level of logged records (info, debug or trace)
    #[structopt(long, default_value = "info")]
    log_level: String,
}

/// One row of the pose archive.
#[derive(Debug, Serialize)]
struct PoseRecord {
    time_s: f64,
    x_m: f64,
    y_m: f64,
    z_m: f64,
    heading_rad: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("nav_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(parse_level(&opt.log_level), &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Navigation Simulation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opt);

    if !(opt.cycle_period.is_finite() && opt.cycle_period > 0.0) {
        return Err(eyre!("Invalid cycle period {} s", opt.cycle_period));
    }
    let cycle_period = Duration::from_secs_f64(opt.cycle_period);

    // ---- LOAD PARAMETERS ----

    let params: FollowingTestParams = if opt.params.exists() {
        util::params::load_path(&opt.params)
    }
    else {
        util::params::load(&opt.params.to_string_lossy())
    }
    .wrap_err_with(|| format!("Could not load parameters from {:?}", opt.params))?;

    info!("Parameters loaded");

    // ---- LOAD SCRIPT ----

    info!("Loading script from {:?}", opt.script);

    let mut script: ScriptInterpreter<MotionCommand> = ScriptInterpreter::new(&opt.script)
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasting {:.02} s with {} commands",
        script.get_duration(),
        script.get_num_cmds()
    );

    // ---- INITIALISE TASK ----

    let mut runner = TaskRunner::new("following_test", FollowingTest::new(MonotonicClock));
    runner.configure(params).wrap_err("Failed to configure the following test")?;

    let mut pose_archive = Archiver::from_path(&session, "robot_pose.csv")
        .wrap_err("Failed to create the pose archive")?;

    runner.start().wrap_err("Failed to start the following test")?;

    info!("Initialisation complete, entering main loop\n");

    // ---- MAIN LOOP ----

    loop {
        let cycle_start_instant = Instant::now();

        // ---- SCRIPT ----

        match script.get_pending() {
            Pending::EndOfScript => {
                info!("End of script reached");
                break;
            }
            Pending::Some(cmds) => {
                // The port only keeps the newest command
                if cmds.len() > 1 {
                    warn!("{} commands released in one cycle, only the last is used", cmds.len());
                }
                for cmd in cmds {
                    info!("Script command: {:?}", cmd);
                    runner.task_mut().motion_command_in.push(cmd);
                }
            }
            Pending::None => (),
        }

        // ---- SIMULATION ----

        runner.update();

        // ---- WRITE ARCHIVES ----

        let time_s = get_elapsed_seconds();
        for pose in runner.task_mut().robot_pose_out.drain() {
            if let Err(e) = pose_archive.serialise(PoseRecord::new(time_s, &pose)) {
                warn!("Could not archive pose: {}", e);
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            ),
        }
    }

    // ---- SHUTDOWN ----

    let final_pose = *runner.task().current_pose();
    info!("Final pose: {}", final_pose);

    runner.stop().wrap_err("Failed to stop the following test")?;
    runner.cleanup().wrap_err("Failed to clean up the following test")?;

    session.save("final_pose.json", final_pose);
    session.exit();

    info!("End of execution");

    Ok(())
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseRecord {
    fn new(time_s: f64, pose: &Pose) -> Self {
        Self {
            time_s,
            x_m: pose.position_m_lm[0],
            y_m: pose.position_m_lm[1],
            z_m: pose.position_m_lm[2],
            heading_rad: pose.get_heading(),
        }
    }
}
