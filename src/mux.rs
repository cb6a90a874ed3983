use crate::monitor::{EventSource, MuxEvent};
use core::time::Duration;
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};
use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};

const RDS: Token = Token(0);
const INPUT: Token = Token(1);

/// Unix input multiplexer: polls the radio device's RDS stream together
/// with an input stream (normally standard input).
#[derive(Debug)]
pub struct InputMux<I> {
    poll: Poll,
    events: Events,
    input: I,
}

impl<I> InputMux<I>
where
    I: Read + AsRawFd,
{
    /// Register the RDS file descriptor and the input stream for polling.
    pub fn new(rds_fd: RawFd, input: I) -> io::Result<Self> {
        let poll = Poll::new()?;
        poll.registry()
            .register(&mut SourceFd(&rds_fd), RDS, Interest::READABLE)?;
        let input_fd = input.as_raw_fd();
        poll.registry()
            .register(&mut SourceFd(&input_fd), INPUT, Interest::READABLE)?;
        Ok(InputMux {
            poll,
            events: Events::with_capacity(4),
            input,
        })
    }
}

impl<I> EventSource for InputMux<I>
where
    I: Read + AsRawFd,
{
    type Error = io::Error;

    fn wait(&mut self, timeout: Duration) -> Result<MuxEvent, io::Error> {
        self.events.clear();
        self.poll.poll(&mut self.events, Some(timeout))?;
        // Keystrokes are served first: they may retune the device the RDS
        // data is about to be attributed to.
        let mut rds_ready = false;
        for event in self.events.iter() {
            match event.token() {
                INPUT => {
                    let mut key = [0];
                    return match self.input.read(&mut key) {
                        Ok(0) => Ok(MuxEvent::Closed),
                        Ok(_) => Ok(MuxEvent::Key(key[0])),
                        Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                            Ok(MuxEvent::Timeout)
                        }
                        Err(e) => Err(e),
                    };
                }
                RDS => rds_ready = true,
                _ => {}
            }
        }
        if rds_ready {
            Ok(MuxEvent::Rds)
        } else {
            Ok(MuxEvent::Timeout)
        }
    }
}
