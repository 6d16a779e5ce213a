//! Fuzz target: setpoint editor state machine
//!
//! Feeds the editor arbitrary plus/minus button levels, one invocation
//! per fuzz byte, and verifies:
//! - No panics under arbitrary press/release interleavings
//! - The setpoint never leaves the configured range
//! - The setpoint stays aligned to the step grid
//! - A single invocation moves the setpoint by at most one step
//! - The persisted byte always matches the live setpoint
//!
//! cargo fuzz run fuzz_editor

#![no_main]

use libfuzzer_sys::fuzz_target;

use hydrotherm::app::ports::Task;
use hydrotherm::config::SystemConfig;
use hydrotherm::control::context::ControlContext;
use hydrotherm::control::editor::EditorTask;

// ── Button + storage bench, everything else inert ─────────────

use hydrotherm::app::ports::{
    ActuatorPort, Button, DisplayPort, InputPort, SensorPort, StoragePort, WakePort,
};
use hydrotherm::error::StorageError;
use std::collections::HashMap;

struct EditorBench {
    plus: bool,
    minus: bool,
    store: HashMap<u16, u8>,
}

impl EditorBench {
    fn new() -> Self {
        Self {
            plus: false,
            minus: false,
            store: HashMap::new(),
        }
    }
}

impl SensorPort for EditorBench {
    fn sample_temperature(&mut self) -> u8 {
        0
    }
    fn last_temperature(&self) -> u8 {
        0
    }
}

impl ActuatorPort for EditorBench {
    fn heater_on(&mut self) {}
    fn heater_off(&mut self) {}
    fn cooler_on(&mut self) {}
    fn cooler_off(&mut self) {}
    fn indicator_on(&mut self) {}
    fn indicator_off(&mut self) {}
    fn indicator_toggle(&mut self) {}
}

impl DisplayPort for EditorBench {
    fn write_digit(&mut self, _value: u8) {}
    fn enable_digits(&mut self, _mask: u8) {}
    fn display_off(&mut self) {}
}

impl InputPort for EditorBench {
    fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Plus => self.plus,
            Button::Minus => self.minus,
            Button::Power => false,
        }
    }
}

impl StoragePort for EditorBench {
    fn read_byte(&self, addr: u16) -> Result<u8, StorageError> {
        self.store.get(&addr).copied().ok_or(StorageError::Backend)
    }
    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        self.store.insert(addr, value);
        Ok(())
    }
}

impl WakePort for EditorBench {
    fn enable_wake(&mut self) {}
    fn disable_wake(&mut self) {}
    fn clear_wake_pending(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let config = SystemConfig::default();
    let (min, max, step) = (
        config.setpoint_min_c,
        config.setpoint_max_c,
        config.setpoint_step_c,
    );
    let addr = config.setpoint_store_addr;

    let mut ctx = ControlContext::new(config, 60);
    // Publish On up front so the byte stream drives a live editor
    // instead of the power-on reset branch.
    ctx.power.acknowledge_on();
    ctx.power.acknowledge_on();

    let mut bench = EditorBench::new();
    let mut editor = EditorTask::new();

    // Bit 0 = plus level, bit 1 = minus level; one editor run per byte.
    for &byte in data {
        bench.plus = byte & 0b01 != 0;
        bench.minus = byte & 0b10 != 0;

        let before = ctx.setpoint;
        editor.run(&mut ctx, &mut bench);
        let after = ctx.setpoint;

        assert!(
            (min..=max).contains(&after),
            "setpoint {after} left the range {min}..={max}"
        );
        assert_eq!(
            (after - min) % step,
            0,
            "setpoint {after} fell off the {step}-degree grid"
        );
        let moved = after.abs_diff(before);
        assert!(
            moved == 0 || moved == step,
            "one run moved the setpoint by {moved}"
        );
        if let Some(&stored) = bench.store.get(&addr) {
            assert_eq!(
                stored, after,
                "persisted setpoint {stored} diverged from live value {after}"
            );
        }
    }
});
