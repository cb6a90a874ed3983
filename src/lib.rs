//! This is the platform-agnostic core of an FM radio monitor for the
//! Si4702/Si4703 family of FM radio tuners (receivers) exposed through a
//! kernel radio device.
//!
//! Two coupled subsystems make up the crate:
//!
//! - An RDS/RBDS decoder that reassembles the tuner's 3-byte block stream
//!   into groups, dispatches them by type and keeps a persistent model of
//!   the programs heard during the run. See: [`RdsDecoder`] and
//!   [`Monitor`].
//! - A synchronous resampling bridge that feeds sound-card capture to an
//!   audio server on an independent clock, with a PI controller steering
//!   the sample-rate-conversion factor so the capture buffer keeps a
//!   target delay. See: [`AudioBridge`].
//!
//! This crate allows you to:
//! - Read and set the tuned frequency, range checked. See: [`Tuner::set_frequency()`].
//! - Seek with wrap-around. See: [`Tuner::seek()`].
//! - Set volume and mute. See: [`Tuner::set_volume()`].
//! - Decode program-service names, radio-text, clock, traffic messages
//!   and enhanced-other-networks data. See: [`RdsDecoder::feed()`].
//! - Track known programs and hop to the next one. See: [`Programs`].
//! - Run the monitoring loop multiplexed with keyboard commands.
//!   See: [`Monitor::run()`].
//! - Bridge capture audio to a server period callback. See:
//!   [`AudioBridge::process()`].
//!
//! The kernel device, the sound card and the audio server stay behind the
//! [`RadioDevice`], [`CaptureDevice`] and [`EventSource`] seams, so the
//! whole core runs against scripted devices in tests. On Unix,
//! [`InputMux`] implements [`EventSource`] over the radio descriptor and
//! standard input.
//!
//! The RDS decoder is single-threaded and cooperative: one loop
//! multiplexes the tuner with keyboard input through a 1 s poll, and every
//! handler runs to completion before the next cycle. The audio bridge is
//! driven by the server's realtime thread and does not allocate on that
//! path.
//!
//! Further documentation:
//! - [Si4702/Si4703 datasheet](https://www.silabs.com/documents/public/data-sheets/Si4702-03-C19.pdf)
//! - [Using RDS/RBDS with the Si4701/03 (AN243)](https://www.silabs.com/documents/public/application-notes/AN243.pdf)
//! - [RBDS specification (NRSC-4)](https://www.nrscstandards.org/standards-and-guidelines/documents/standards/nrsc-4-b.pdf)

#![deny(unsafe_code, missing_docs)]

mod audio;
mod clock;
mod control;
mod device;
mod monitor;
#[cfg(unix)]
mod mux;
mod programs;
mod pty;
mod radiotext;
mod rds;
mod resample;
mod tuner;
mod types;

pub use crate::audio::{AudioBridge, BridgeConfig, CaptureDevice, CaptureError, ShutdownFlag};
pub use crate::clock::{gregorian_to_mjd, local_time, mjd_to_gregorian, ClockTime};
pub use crate::control::{RateController, MAX_FACTOR, MIN_FACTOR, RING_LEN};
pub use crate::device::{
    Capabilities, Control, ControlRange, RadioDevice, RdsRecord, RDS_RECORD_LEN,
};
pub use crate::monitor::{EventSource, Monitor, MuxEvent, FREQUENCY_STEP_MHZ, POLL_TIMEOUT};
#[cfg(unix)]
pub use crate::mux::InputMux;
pub use crate::programs::{Program, Programs, FREQUENCY_MATCH_TOLERANCE};
pub use crate::pty::program_type_name;
pub use crate::radiotext::{RadioText, RADIO_TEXT_LEN, SEGMENT_LEN};
pub use crate::rds::RdsDecoder;
pub use crate::resample::Resampler;
pub use crate::tuner::{Band, Tuner};
pub use crate::types::{Error, Event};
