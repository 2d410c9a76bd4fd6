//! The tick driver.
//!
//! A [`Looper`] calls [`VM::execute`] once per tick at the interval given
//! by its [`LooperConfig`]. It owns no timer: the host calls
//! [`Looper::tick`] from whatever clock it has and sleeps for
//! [`Looper::clock_cycle`] in between. A trap pauses the looper.

use crate::error::VmTrap;
use crate::machine::VM;
use std::time::Duration;
use tracing::{error, info};

/// Default interval between ticks.
pub const DEFAULT_CLOCK_CYCLE: Duration = Duration::from_millis(25);

/// Driver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LooperConfig {
    /// Interval the host should wait between ticks.
    pub clock_cycle: Duration,
    /// Whether ticking starts enabled.
    pub playing: bool,
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            clock_cycle: DEFAULT_CLOCK_CYCLE,
            playing: true,
        }
    }
}

impl LooperConfig {
    pub fn with_clock_cycle(mut self, clock_cycle: Duration) -> Self {
        self.clock_cycle = clock_cycle;
        self
    }

    /// Start paused.
    pub fn paused(mut self) -> Self {
        self.playing = false;
        self
    }
}

/// Drives a [`VM`] one instruction per tick.
#[derive(Debug, Clone)]
pub struct Looper {
    config: LooperConfig,
    playing: bool,
    last_trap: Option<VmTrap>,
    ticks: u64,
}

impl Default for Looper {
    fn default() -> Self {
        Self::new(LooperConfig::default())
    }
}

impl Looper {
    pub fn new(config: LooperConfig) -> Self {
        Self {
            config,
            playing: config.playing,
            last_trap: None,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &LooperConfig {
        &self.config
    }

    pub fn clock_cycle(&self) -> Duration {
        self.config.clock_cycle
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Resume ticking. Forgets any previous trap.
    pub fn play(&mut self) {
        self.playing = true;
        self.last_trap = None;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// The trap that stopped the looper, if any.
    pub fn last_trap(&self) -> Option<&VmTrap> {
        self.last_trap.as_ref()
    }

    /// Number of ticks that produced a transition.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one instruction if playing.
    ///
    /// Returns whether the machine changed. While paused this is always
    /// `Ok(false)` and the machine is not touched.
    ///
    /// # Errors
    ///
    /// Propagates the trap from [`VM::execute`] after pausing.
    pub fn tick(&mut self, vm: &mut VM) -> Result<bool, VmTrap> {
        if !self.playing {
            return Ok(false);
        }
        match vm.execute() {
            Ok(changed) => {
                if changed {
                    self.ticks += 1;
                }
                Ok(changed)
            }
            Err(trap) => {
                error!(%trap, ticks = self.ticks, "looper stopped on trap");
                self.playing = false;
                self.last_trap = Some(trap.clone());
                Err(trap)
            }
        }
    }

    /// Tick until the machine halts, the looper is paused, or `max_ticks`
    /// transitions have run. Returns the number of transitions.
    ///
    /// # Errors
    ///
    /// Stops at the first trap and returns it.
    pub fn run_until_halt(&mut self, vm: &mut VM, max_ticks: usize) -> Result<usize, VmTrap> {
        let mut steps = 0;
        while steps < max_ticks && self.tick(vm)? {
            steps += 1;
        }
        if vm.is_halted() {
            info!(steps, "machine halted");
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmac_common::{Address, Cell, GridIndex, Operation};

    fn local(row: i64, col: i64) -> Address {
        Address::local(GridIndex::new(row, col))
    }

    #[test]
    fn default_config() {
        let config = LooperConfig::default();
        assert_eq!(config.clock_cycle, Duration::from_millis(25));
        assert!(config.playing);
    }

    #[test]
    fn config_builders() {
        let config = LooperConfig::default()
            .with_clock_cycle(Duration::from_millis(100))
            .paused();
        assert_eq!(config.clock_cycle, Duration::from_millis(100));
        assert!(!config.playing);
        assert!(!Looper::new(config).is_playing());
    }

    #[test]
    fn paused_looper_does_not_step() {
        let mut vm = VM::new();
        vm.write(&local(0, 1), Cell::Data(1.0)).unwrap();
        vm.splice(local(0, 1), local(0, 2), Operation::Move).unwrap();
        let mut looper = Looper::new(LooperConfig::default().paused());
        assert_eq!(looper.tick(&mut vm), Ok(false));
        assert_eq!(vm.read(&local(0, 2)), Ok(None));
        looper.play();
        assert_eq!(looper.tick(&mut vm), Ok(true));
        assert_eq!(vm.read(&local(0, 2)), Ok(Some(Cell::Data(1.0))));
        assert_eq!(looper.ticks(), 1);
    }

    #[test]
    fn halted_machine_reports_no_change() {
        let mut vm = VM::new();
        let mut looper = Looper::default();
        assert_eq!(looper.tick(&mut vm), Ok(false));
        assert_eq!(looper.run_until_halt(&mut vm, 10), Ok(0));
        assert!(looper.is_playing());
    }

    #[test]
    fn trap_pauses_and_is_remembered() {
        let mut vm = VM::new();
        vm.write(&local(0, 1), Cell::Data(1.0)).unwrap();
        vm.write(&local(0, 2), Cell::Data(0.0)).unwrap();
        // dst / src with src = 0
        vm.splice(local(0, 2), local(0, 1), Operation::Divide).unwrap();

        let mut looper = Looper::default();
        let trap = VmTrap::DivisionByZero {
            at: GridIndex::new(0, 2),
        };
        assert_eq!(looper.tick(&mut vm), Err(trap.clone()));
        assert!(!looper.is_playing());
        assert_eq!(looper.last_trap(), Some(&trap));
        assert_eq!(looper.tick(&mut vm), Ok(false));

        looper.play();
        assert_eq!(looper.last_trap(), None);
    }
}
