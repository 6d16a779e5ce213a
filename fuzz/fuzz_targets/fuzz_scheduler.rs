//! Fuzz target: scheduler task table
//!
//! Drives arbitrary add / remove / tick / dispatch / start / stop
//! sequences against the scheduler and verifies:
//! - No panics under arbitrary op streams
//! - `active_count` always matches the set of live handles
//! - A sixth concurrent add always reports `TableFull`
//! - Handles stay unique while live, and every live handle removes cleanly
//!
//! cargo fuzz run fuzz_scheduler

#![no_main]

use libfuzzer_sys::fuzz_target;

use hydrotherm::app::ports::{HwPorts, Task};
use hydrotherm::config::SystemConfig;
use hydrotherm::control::context::ControlContext;
use hydrotherm::error::{SchedulerError, StorageError};
use hydrotherm::scheduler::{Scheduler, TaskHandle, MAX_TASKS};

// ── Inert port bundle for dispatch ────────────────────────────

use hydrotherm::app::ports::{
    ActuatorPort, Button, DisplayPort, InputPort, SensorPort, StoragePort, WakePort,
};

struct NullBench;

impl SensorPort for NullBench {
    fn sample_temperature(&mut self) -> u8 {
        0
    }
    fn last_temperature(&self) -> u8 {
        0
    }
}

impl ActuatorPort for NullBench {
    fn heater_on(&mut self) {}
    fn heater_off(&mut self) {}
    fn cooler_on(&mut self) {}
    fn cooler_off(&mut self) {}
    fn indicator_on(&mut self) {}
    fn indicator_off(&mut self) {}
    fn indicator_toggle(&mut self) {}
}

impl DisplayPort for NullBench {
    fn write_digit(&mut self, _value: u8) {}
    fn enable_digits(&mut self, _mask: u8) {}
    fn display_off(&mut self) {}
}

impl InputPort for NullBench {
    fn is_pressed(&self, _button: Button) -> bool {
        false
    }
}

impl StoragePort for NullBench {
    fn read_byte(&self, _addr: u16) -> Result<u8, StorageError> {
        Err(StorageError::Backend)
    }
    fn write_byte(&mut self, _addr: u16, _value: u8) -> Result<(), StorageError> {
        Ok(())
    }
}

impl WakePort for NullBench {
    fn enable_wake(&mut self) {}
    fn disable_wake(&mut self) {}
    fn clear_wake_pending(&mut self) {}
}

struct NopTask;

impl Task for NopTask {
    fn name(&self) -> &'static str {
        "nop"
    }
    fn run(&mut self, _ctx: &mut ControlContext, _hw: &mut dyn HwPorts) {}
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut sched = Scheduler::new();
    let mut ctx = ControlContext::new(SystemConfig::default(), 60);
    let mut bench = NullBench;
    let mut live: Vec<TaskHandle> = Vec::new();

    // One op per byte; add/remove pull their parameters from the bytes
    // that follow. Periods stay >= 1 so no task self-removes behind the
    // handle list's back.
    let mut i = 0;
    while i < data.len() {
        match data[i] % 9 {
            0..=2 => {
                let delay = u32::from(data.get(i + 1).copied().unwrap_or(0) % 32);
                let period = u32::from(1 + data.get(i + 2).copied().unwrap_or(0) % 16);
                i += 2;
                match sched.add(Box::new(NopTask), delay, period) {
                    Ok(handle) => {
                        assert!(
                            live.len() < MAX_TASKS,
                            "add succeeded with {} tasks already live",
                            live.len()
                        );
                        assert!(
                            !live.iter().any(|h| h.index() == handle.index()),
                            "slot {} handed out twice",
                            handle.index()
                        );
                        live.push(handle);
                    }
                    Err(e) => {
                        assert_eq!(e, SchedulerError::TableFull);
                        assert_eq!(live.len(), MAX_TASKS, "TableFull below capacity");
                    }
                }
            }
            3..=4 => {
                if !live.is_empty() {
                    let pick = data.get(i + 1).copied().unwrap_or(0) as usize % live.len();
                    i += 1;
                    let handle = live.swap_remove(pick);
                    sched
                        .remove(handle)
                        .expect("removing a live handle must succeed");
                }
            }
            5 => sched.on_tick(),
            6 => sched.dispatch(&mut ctx, &mut bench),
            7 => sched.start(),
            8 => sched.stop(),
            _ => unreachable!(),
        }

        assert_eq!(
            sched.active_count(),
            live.len(),
            "table count diverged from the live handle set"
        );
        i += 1;
    }

    // Every surviving handle must still remove cleanly, draining the table.
    for handle in live.drain(..) {
        sched
            .remove(handle)
            .expect("live handle went stale without a remove");
    }
    assert_eq!(sched.active_count(), 0);
});
