use crate::device::{RadioDevice, RdsRecord, RDS_RECORD_LEN};
use crate::programs::Programs;
use crate::rds::RdsDecoder;
use crate::tuner::Tuner;
use crate::types::{Error, Event};
use core::fmt::Debug;
use core::time::Duration;

/// How long one multiplexer wait may take before a heartbeat is logged.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(1000);

/// Keyboard tuning step in MHz.
pub const FREQUENCY_STEP_MHZ: f32 = 0.05;

/// What the input multiplexer woke up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxEvent {
    /// RDS data is ready on the radio device
    Rds,
    /// A key was pressed
    Key(u8),
    /// Nothing happened within the timeout
    Timeout,
    /// The input stream was closed
    Closed,
}

/// Source of multiplexed monitor input (RDS readiness and keystrokes).
pub trait EventSource {
    /// Error type of the underlying waiting primitive
    type Error;

    /// Wait for the next event, up to `timeout`.
    fn wait(&mut self, timeout: Duration) -> Result<MuxEvent, Self::Error>;
}

/// The monitoring loop: RDS decoding multiplexed with keyboard commands.
#[derive(Debug)]
pub struct Monitor<D> {
    tuner: Tuner<D>,
    programs: Programs,
    decoder: RdsDecoder,
}

impl<D, E> Monitor<D>
where
    D: RadioDevice<Error = E>,
    E: Debug,
{
    /// Create a monitor around a tuner. Fails with `Error::Unsupported`
    /// when the device does not capture RDS data.
    pub fn new(tuner: Tuner<D>) -> Result<Self, Error<E>> {
        if !tuner.capabilities().rds_capture {
            return Err(Error::Unsupported);
        }
        Ok(Monitor {
            tuner,
            programs: Programs::new(),
            decoder: RdsDecoder::new(),
        })
    }

    /// Destroy the monitor, returning the tuner.
    pub fn destroy(self) -> Tuner<D> {
        self.tuner
    }

    /// The tuner this monitor drives.
    pub fn tuner(&self) -> &Tuner<D> {
        &self.tuner
    }

    /// The table of programs observed so far.
    pub fn programs(&self) -> &Programs {
        &self.programs
    }

    /// The decoder state.
    pub fn decoder(&self) -> &RdsDecoder {
        &self.decoder
    }

    /// Run until the RDS stream or the input stream ends.
    ///
    /// Radio-device failures inside the loop are logged and skipped; they
    /// leave no inconsistent state behind. Only a failing multiplexer ends
    /// the loop with an error.
    pub fn run<S, F>(&mut self, source: &mut S, mut emit: F) -> Result<(), S::Error>
    where
        S: EventSource,
        F: FnMut(Event),
    {
        loop {
            match source.wait(POLL_TIMEOUT)? {
                MuxEvent::Rds => {
                    if !self.read_record(&mut emit) {
                        return Ok(());
                    }
                }
                MuxEvent::Key(key) => self.handle_key(key, &mut emit),
                MuxEvent::Timeout => log::debug!("no RDS data within the last second"),
                MuxEvent::Closed => return Ok(()),
            }
        }
    }

    /// Read and decode one RDS record. Returns `false` at end of stream.
    pub fn read_record(&mut self, emit: &mut impl FnMut(Event)) -> bool {
        let mut bytes = [0; RDS_RECORD_LEN];
        match self.tuner.device_mut().read_rds(&mut bytes) {
            Ok(0) => return false,
            Ok(n) if n < RDS_RECORD_LEN => {
                log::warn!("short RDS read ({} of {} bytes), record dropped", n, RDS_RECORD_LEN);
            }
            Ok(_) => {
                let record = RdsRecord::from_bytes(bytes);
                let tuned = self.tuner.current();
                let min = self.tuner.band().min_mhz;
                self.decoder
                    .feed(record, &mut self.programs, tuned, min, emit);
            }
            Err(e) => log::warn!("RDS read failed: {:?}", e),
        }
        true
    }

    /// Handle one keystroke.
    pub fn handle_key(&mut self, key: u8, emit: &mut impl FnMut(Event)) {
        match key {
            b'n' => self.next_program(emit),
            b'+' => self.step_frequency(true, emit),
            b'-' => self.step_frequency(false, emit),
            _ => emit(Event::Key(key)),
        }
    }

    /// Switch to the next known program.
    fn next_program(&mut self, emit: &mut impl FnMut(Event)) {
        let band = self.tuner.band();
        match self.programs.next_after(self.tuner.current(), band.min_mhz) {
            None => emit(Event::NoOtherPrograms),
            Some(index) => {
                let target = self.programs.at(index);
                let mhz = target.frequency;
                if let Some(name) = target.name() {
                    emit(Event::Switching { name, mhz });
                }
                if let Err(e) = self.tuner.set_frequency(mhz) {
                    log::warn!("switching to {:.2} MHz failed: {:?}", mhz, e);
                }
            }
        }
    }

    /// Step the frequency by one increment, wrapping at the band edges.
    fn step_frequency(&mut self, upward: bool, emit: &mut impl FnMut(Event)) {
        let band = self.tuner.band();
        let mut mhz = if upward {
            self.tuner.current() + FREQUENCY_STEP_MHZ
        } else {
            self.tuner.current() - FREQUENCY_STEP_MHZ
        };
        if mhz > band.max_mhz {
            mhz = band.min_mhz;
        } else if mhz < band.min_mhz {
            mhz = band.max_mhz;
        }
        match self.tuner.set_frequency(mhz) {
            Ok(()) => emit(Event::Tuned(mhz)),
            Err(e) => log::warn!("retuning to {:.2} MHz failed: {:?}", mhz, e),
        }
    }
}
