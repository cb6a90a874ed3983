use crate::clock::ClockTime;
use core::fmt;

/// Errors in this crate
#[derive(Debug)]
pub enum Error<E> {
    /// Radio device operation error
    Device(E),
    /// Frequency outside the tuner band
    OutOfRange,
    /// Device cannot be used for monitoring (no RDS capture capability)
    Unsupported,
}

/// A decoded observation, rendered as one line of human-readable output.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Completed program-service name
    ProgramName(String),
    /// Completed radio-text message
    RadioText(String),
    /// Clock and date broadcast (group 4A), already in local time
    Clock(ClockTime),
    /// Stereo/mono report change
    Stereo(bool),
    /// Traffic-announcement flag change
    TrafficAnnouncement(bool),
    /// Program-type change
    ProgramType(&'static str),
    /// Switching to another known program
    Switching {
        /// Program-service name of the target
        name: String,
        /// Target frequency in MHz
        mhz: f32,
    },
    /// No other known program to switch to
    NoOtherPrograms,
    /// Frequency retuned from the keyboard
    Tuned(f32),
    /// Single-group traffic message (group 8A)
    TrafficMessage {
        /// Event code (11 bits)
        event: u16,
        /// Location code
        location: u16,
        /// Extent (3 bits)
        extent: u8,
        /// Duration label from the fixed table
        duration: &'static str,
    },
    /// Unassigned key press
    Key(u8),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ProgramName(name) => write!(f, "Program: {}", name),
            Event::RadioText(text) => write!(f, "Text: {}", text),
            Event::Clock(time) => write!(f, "Date: {}", time),
            Event::Stereo(true) => write!(f, "Program is stereo"),
            Event::Stereo(false) => write!(f, "Program is mono"),
            Event::TrafficAnnouncement(on) => {
                write!(f, "Traffic announcement {}", if *on { "on" } else { "off" })
            }
            Event::ProgramType(name) => write!(f, "Program type: {}", name),
            Event::Switching { name, mhz } => {
                write!(f, "Switching to {} ({:.2} MHz)", name, mhz)
            }
            Event::NoOtherPrograms => write!(f, "No other stations known"),
            Event::Tuned(mhz) => write!(f, "Frequency tuned to {:.2} MHz", mhz),
            Event::TrafficMessage {
                event,
                location,
                extent,
                duration,
            } => write!(
                f,
                "TMC: event {}, location {}, extent {}, duration {}",
                event, location, extent, duration
            ),
            Event::Key(key) => write!(f, "Key: {} (0x{:02x})", key, key),
        }
    }
}
