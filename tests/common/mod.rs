#![allow(dead_code)]

use si470x_monitor::{
    Capabilities, CaptureDevice, CaptureError, Control, ControlRange, EventSource, MuxEvent,
    RadioDevice,
};
use std::collections::VecDeque;
use std::time::Duration;

pub const BAND_MIN: f32 = 87.5;

/// Scripted radio device: frequency and control writes are recorded, RDS
/// reads are served from a queue.
#[derive(Debug)]
pub struct MockRadio {
    pub caps: Capabilities,
    pub raw_frequency: u32,
    pub seek_lands_on: u32,
    pub volume_range: ControlRange,
    pub controls: Vec<(Control, i32)>,
    pub seeks: Vec<bool>,
    pub rds: VecDeque<Vec<u8>>,
}

impl MockRadio {
    #[allow(unused)]
    pub fn new(raw_frequency: u32) -> Self {
        MockRadio {
            caps: Capabilities {
                rds_capture: true,
                low_range: false,
            },
            raw_frequency,
            seek_lands_on: raw_frequency,
            volume_range: ControlRange { min: 0, max: 15 },
            controls: Vec::new(),
            seeks: Vec::new(),
            rds: VecDeque::new(),
        }
    }

    /// Queue the four records of one RDS group.
    #[allow(unused)]
    pub fn push_group(&mut self, blocks: [u16; 4]) {
        for (number, word) in blocks.iter().enumerate() {
            self.rds
                .push_back(vec![*word as u8, (word >> 8) as u8, number as u8]);
        }
    }
}

impl RadioDevice for MockRadio {
    type Error = ();

    fn capabilities(&mut self) -> Result<Capabilities, ()> {
        Ok(self.caps)
    }

    fn frequency(&mut self) -> Result<u32, ()> {
        Ok(self.raw_frequency)
    }

    fn set_frequency(&mut self, raw: u32) -> Result<(), ()> {
        self.raw_frequency = raw;
        Ok(())
    }

    fn hw_seek(&mut self, upward: bool, _wrap: bool) -> Result<(), ()> {
        self.seeks.push(upward);
        self.raw_frequency = self.seek_lands_on;
        Ok(())
    }

    fn control_range(&mut self, _control: Control) -> Result<ControlRange, ()> {
        Ok(self.volume_range)
    }

    fn set_control(&mut self, control: Control, value: i32) -> Result<(), ()> {
        self.controls.push((control, value));
        Ok(())
    }

    fn read_rds(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        match self.rds.pop_front() {
            None => Ok(0),
            Some(record) => {
                let n = record.len().min(buf.len());
                buf[..n].copy_from_slice(&record[..n]);
                Ok(n)
            }
        }
    }
}

/// Scripted input multiplexer; reports the stream closed once the script
/// runs out.
#[derive(Debug, Default)]
pub struct Script(pub VecDeque<MuxEvent>);

impl Script {
    #[allow(unused)]
    pub fn of(events: &[MuxEvent]) -> Self {
        Script(events.iter().copied().collect())
    }
}

impl EventSource for Script {
    type Error = ();

    fn wait(&mut self, _timeout: Duration) -> Result<MuxEvent, ()> {
        Ok(self.0.pop_front().unwrap_or(MuxEvent::Closed))
    }
}

/// One scripted capture fault.
#[derive(Debug, Clone, Copy)]
#[allow(unused)]
pub enum Fault {
    Again,
    Xrun,
    Suspended,
}

/// Sound-card capture mock: hands out a constant sample and tracks the
/// stream position.
#[derive(Debug)]
pub struct MockCapture {
    pub channels: usize,
    pub avail: i64,
    pub sample: i16,
    pub frames_read: usize,
    pub frames_rewound: usize,
    pub prepares: usize,
    pub resume_pending: usize,
    pub faults: VecDeque<Fault>,
}

impl MockCapture {
    #[allow(unused)]
    pub fn new(channels: usize, avail: i64) -> Self {
        MockCapture {
            channels,
            avail,
            sample: 16384,
            frames_read: 0,
            frames_rewound: 0,
            prepares: 0,
            resume_pending: 0,
            faults: VecDeque::new(),
        }
    }
}

impl CaptureDevice for MockCapture {
    type Error = ();

    fn avail(&mut self) -> Result<usize, CaptureError<()>> {
        Ok(self.avail.max(0) as usize)
    }

    fn read(&mut self, buf: &mut [i16]) -> nb::Result<usize, CaptureError<()>> {
        match self.faults.pop_front() {
            Some(Fault::Again) => return Err(nb::Error::WouldBlock),
            Some(Fault::Xrun) => return Err(nb::Error::Other(CaptureError::Xrun)),
            Some(Fault::Suspended) => return Err(nb::Error::Other(CaptureError::Suspended)),
            None => {}
        }
        buf.fill(self.sample);
        let frames = buf.len() / self.channels;
        self.avail -= frames as i64;
        self.frames_read += frames;
        Ok(frames)
    }

    fn rewind(&mut self, frames: usize) -> Result<usize, CaptureError<()>> {
        self.avail += frames as i64;
        self.frames_rewound += frames;
        Ok(frames)
    }

    fn prepare(&mut self) -> Result<(), ()> {
        self.prepares += 1;
        Ok(())
    }

    fn resume(&mut self) -> nb::Result<(), ()> {
        if self.resume_pending > 0 {
            self.resume_pending -= 1;
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }
}

#[macro_export]
macro_rules! assert_error {
    ($result:expr, $error:ident::$variant:ident) => {
        match $result {
            Err($error::$variant) => (),
            _ => panic!("Error not returned."),
        }
    };
}
