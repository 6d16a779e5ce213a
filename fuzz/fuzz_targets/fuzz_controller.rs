//! Fuzz target: whole-controller cycle loop
//!
//! Runs the full service (scheduler, all five tasks, sleep/wake) against
//! arbitrary interleavings of ticks, button levels, temperature swings
//! and wake pulses, and verifies:
//! - No panics at any point in the cycle loop
//! - The heater and cooler relays are never energized together
//! - The setpoint stays in range and on the step grid
//! - Relays are off whenever the controller is asleep
//!
//! cargo fuzz run fuzz_controller

#![no_main]

use libfuzzer_sys::fuzz_target;

use hydrotherm::app::service::ControllerService;
use hydrotherm::config::SystemConfig;

// ── Recording port bundle ─────────────────────────────────────

use hydrotherm::app::ports::{
    ActuatorPort, Button, DisplayPort, InputPort, SensorPort, StoragePort, WakePort,
};
use hydrotherm::error::StorageError;
use std::collections::HashMap;

struct FuzzBench {
    temperature: u8,
    last: u8,
    heater: bool,
    cooler: bool,
    indicator: bool,
    plus: bool,
    minus: bool,
    power: bool,
    store: HashMap<u16, u8>,
    wake_armed: bool,
}

impl FuzzBench {
    fn new() -> Self {
        Self {
            temperature: 0,
            last: 0,
            heater: false,
            cooler: false,
            indicator: false,
            plus: false,
            minus: false,
            power: false,
            store: HashMap::new(),
            wake_armed: false,
        }
    }
}

impl SensorPort for FuzzBench {
    fn sample_temperature(&mut self) -> u8 {
        self.last = self.temperature;
        self.temperature
    }
    fn last_temperature(&self) -> u8 {
        self.last
    }
}

impl ActuatorPort for FuzzBench {
    fn heater_on(&mut self) {
        self.heater = true;
    }
    fn heater_off(&mut self) {
        self.heater = false;
    }
    fn cooler_on(&mut self) {
        self.cooler = true;
    }
    fn cooler_off(&mut self) {
        self.cooler = false;
    }
    fn indicator_on(&mut self) {
        self.indicator = true;
    }
    fn indicator_off(&mut self) {
        self.indicator = false;
    }
    fn indicator_toggle(&mut self) {
        self.indicator = !self.indicator;
    }
}

impl DisplayPort for FuzzBench {
    fn write_digit(&mut self, _value: u8) {}
    fn enable_digits(&mut self, _mask: u8) {}
    fn display_off(&mut self) {}
}

impl InputPort for FuzzBench {
    fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::Plus => self.plus,
            Button::Minus => self.minus,
            Button::Power => self.power,
        }
    }
}

impl StoragePort for FuzzBench {
    fn read_byte(&self, addr: u16) -> Result<u8, StorageError> {
        self.store.get(&addr).copied().ok_or(StorageError::Backend)
    }
    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        self.store.insert(addr, value);
        Ok(())
    }
}

impl WakePort for FuzzBench {
    fn enable_wake(&mut self) {
        self.wake_armed = true;
    }
    fn disable_wake(&mut self) {
        self.wake_armed = false;
    }
    fn clear_wake_pending(&mut self) {}
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let config = SystemConfig::default();
    let (min, max, step) = (
        config.setpoint_min_c,
        config.setpoint_max_c,
        config.setpoint_step_c,
    );
    let addr = config.setpoint_store_addr;

    let mut bench = FuzzBench::new();
    let mut service = ControllerService::new(config, 60);
    service.register_tasks().expect("empty table accepts five tasks");
    service.sleep_now(&mut bench);

    // Two bytes per cycle: the first carries the button levels, a wake
    // pulse and the tick count, the second the water temperature.
    for chunk in data.chunks_exact(2) {
        let (levels, temperature) = (chunk[0], chunk[1]);

        bench.plus = levels & 0b0001 != 0;
        bench.minus = levels & 0b0010 != 0;
        bench.power = levels & 0b0100 != 0;
        bench.temperature = temperature;

        if levels & 0b1000 != 0 && !service.is_awake() {
            service.wake(&mut bench);
        }

        let ticks = u32::from(levels >> 4);
        service.run_cycle(ticks, &mut bench);

        assert!(
            !(bench.heater && bench.cooler),
            "heater and cooler energized together"
        );
        if !service.is_awake() {
            assert!(
                !bench.heater && !bench.cooler,
                "relay left energized while asleep"
            );
        }

        let setpoint = service.context().setpoint;
        assert!(
            (min..=max).contains(&setpoint),
            "setpoint {setpoint} left the range {min}..={max}"
        );
        assert_eq!(
            (setpoint - min) % step,
            0,
            "setpoint {setpoint} fell off the {step}-degree grid"
        );
        if let Some(&stored) = bench.store.get(&addr) {
            assert!(
                (min..=max).contains(&stored) && (stored - min) % step == 0,
                "persisted setpoint {stored} is not a legal value"
            );
        }
    }
});
