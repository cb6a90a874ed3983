use crate::clock::local_time;
use crate::device::RdsRecord;
use crate::programs::{trim_name, Programs};
use crate::pty::program_type_name;
use crate::radiotext::RadioText;
use crate::types::Event;

/// Group selector values: group type (4 bits) and A/B variant (1 bit)
/// taken together from the top of block 1.
struct Group;
impl Group {
    const BASIC_TUNING_0A: u8 = 0;
    const RADIO_TEXT_2A: u8 = 4;
    const CLOCK_4A: u8 = 8;
    const TRAFFIC_MESSAGE_8A: u8 = 16;
    const OTHER_NETWORKS_14A: u8 = 28;
}

/// EON alternate-frequency mapping tolerance in MHz.
const EON_FREQUENCY_TOLERANCE: f32 = 0.04;

/// Duration labels for single-group traffic messages, indexed by the
/// 3-bit duration code.
const TMC_DURATIONS: [&str; 8] = [
    "unknown",
    "15 minutes",
    "30 minutes",
    "1 hour",
    "2 hours",
    "3 hour",
    "4 hour",
    "rest of the day",
];

/// Decode an alternate-frequency code into MHz.
fn af_frequency(code: u8) -> f32 {
    (100 * (i32::from(code) - 1) + 87600) as f32 / 1000.0
}

/// Block-synchronous RDS group decoder.
///
/// Feed it the raw 3-byte records in arrival order; completed groups are
/// dispatched by type, the program table is kept up to date and
/// user-facing observations are pushed through the `emit` callback.
#[derive(Debug)]
pub struct RdsDecoder {
    group: [u8; 8],
    last_group: [u8; 8],
    have_last: bool,
    pi: Option<u16>,
    af_remaining: u8,
    text: RadioText,
    last_name: Option<[u8; 8]>,
    stereo: Option<bool>,
    music: bool,
    decode_errors: u64,
}

impl Default for RdsDecoder {
    fn default() -> Self {
        RdsDecoder {
            group: [0; 8],
            last_group: [0; 8],
            have_last: false,
            pi: None,
            af_remaining: 0,
            text: RadioText::new(),
            last_name: None,
            stereo: None,
            music: false,
            decode_errors: 0,
        }
    }
}

impl RdsDecoder {
    /// Create a decoder with empty state.
    pub fn new() -> Self {
        RdsDecoder::default()
    }

    /// Number of uncorrectable blocks seen so far.
    pub fn decode_errors(&self) -> u64 {
        self.decode_errors
    }

    /// Whether the last seen decoder-identification report was stereo.
    pub fn stereo(&self) -> Option<bool> {
        self.stereo
    }

    /// Whether the last type-0A group carried the music flag.
    pub fn music(&self) -> bool {
        self.music
    }

    /// Process one raw record.
    ///
    /// `tuned_mhz` is the frequency the tuner currently sits on; it is
    /// recorded in the program table when a PI block arrives.
    pub fn feed(
        &mut self,
        record: RdsRecord,
        programs: &mut Programs,
        tuned_mhz: f32,
        band_min_mhz: f32,
        emit: &mut impl FnMut(Event),
    ) {
        if record.is_corrupt() {
            self.decode_errors += 1;
            log::debug!(
                "uncorrectable RDS block dropped ({} so far)",
                self.decode_errors
            );
            return;
        }
        let block = record.block_number();
        if block > 3 {
            log::trace!("record with block number {} ignored", block);
            return;
        }
        let slot = 2 * block as usize;
        self.group[slot] = record.msb;
        self.group[slot + 1] = record.lsb;

        match block {
            0 => {
                let pi = record.word();
                self.pi = Some(pi);
                programs.get_or_create(pi).frequency = tuned_mhz;
            }
            1 => {
                let pty = (record.msb & 0x03) << 3 | record.lsb >> 5;
                self.update_program_type(pty, programs, emit);
            }
            3 => {
                if self.have_last && self.group == self.last_group {
                    log::trace!("duplicate group suppressed");
                } else {
                    self.dispatch(programs, band_min_mhz, emit);
                }
                self.last_group = self.group;
                self.have_last = true;
                self.group = [0; 8];
            }
            _ => {}
        }
    }

    fn update_program_type(
        &mut self,
        pty: u8,
        programs: &mut Programs,
        emit: &mut impl FnMut(Event),
    ) {
        let pi = match self.pi {
            Some(pi) => pi,
            None => return,
        };
        if pty == 0 {
            return;
        }
        let program = programs.get_or_create(pi);
        if program.program_type != pty {
            program.program_type = pty;
            if let Some(name) = program_type_name(pty) {
                emit(Event::ProgramType(name));
            }
        }
    }

    fn dispatch(
        &mut self,
        programs: &mut Programs,
        band_min_mhz: f32,
        emit: &mut impl FnMut(Event),
    ) {
        let selector = self.group[2] >> 3;
        match selector {
            Group::BASIC_TUNING_0A => self.basic_tuning(programs, emit),
            Group::RADIO_TEXT_2A => self.radio_text(emit),
            Group::CLOCK_4A => self.clock(emit),
            Group::TRAFFIC_MESSAGE_8A => self.traffic_message(emit),
            Group::OTHER_NETWORKS_14A => self.other_networks(programs, band_min_mhz, emit),
            _ => log::trace!(
                "group {}{} not handled: {:02X?}",
                selector >> 1,
                if selector & 1 == 0 { 'A' } else { 'B' },
                self.group
            ),
        }
    }

    /// Type 0A: flags, program-service name and alternate frequencies.
    fn basic_tuning(&mut self, programs: &mut Programs, emit: &mut impl FnMut(Event)) {
        let pi = match self.pi {
            Some(pi) => pi,
            None => return,
        };
        let group = self.group;
        let program = programs.get_or_create(pi);

        program.traffic_program = (group[2] & 0x04) != 0;
        let announcement = (group[3] & 0x10) != 0;
        if announcement != program.traffic_announcement {
            program.traffic_announcement = announcement;
            emit(Event::TrafficAnnouncement(announcement));
        }
        self.music = (group[3] & 0x08) != 0;

        let segment = group[3] & 0x03;
        if segment == 3 {
            let stereo = (group[3] & 0x04) != 0;
            if self.stereo != Some(stereo) {
                self.stereo = Some(stereo);
                emit(Event::Stereo(stereo));
            }
        }

        let index = usize::from(segment) << 1;
        program.set_name_fragment(index, [group[6], group[7]]);
        if index == 6 {
            let name = *program.name_bytes();
            if !trim_name(&name).is_empty() && self.last_name != Some(name) {
                self.last_name = Some(name);
                if let Some(name) = program.name() {
                    emit(Event::ProgramName(name));
                }
            }
        }

        if self.af_remaining > 0 {
            let f1 = af_frequency(group[4]);
            let f2 = af_frequency(group[5]);
            log::debug!("alternate frequencies {:.2} and {:.2} MHz", f1, f2);
            self.af_remaining = self.af_remaining.saturating_sub(2);
        } else if (224..=249).contains(&group[4]) {
            self.af_remaining = group[4] - 224;
        }
    }

    /// Type 2A: radio-text segments with the A/B message boundary flag.
    fn radio_text(&mut self, emit: &mut impl FnMut(Event)) {
        let index = usize::from(self.group[3] & 0x0F);
        let flag = (self.group[3] & 0x10) != 0;
        if let Some(message) = self.text.set_flag(flag) {
            emit(Event::RadioText(message));
        }
        let chars = [self.group[4], self.group[5], self.group[6], self.group[7]];
        self.text.write_segment(index, &chars);
    }

    /// Type 4A: clock and date.
    fn clock(&mut self, emit: &mut impl FnMut(Event)) {
        let b = u16::from(self.group[2]) << 8 | u16::from(self.group[3]);
        let c = u16::from(self.group[4]) << 8 | u16::from(self.group[5]);
        let d = u16::from(self.group[6]) << 8 | u16::from(self.group[7]);
        let mjd = u32::from(b & 0x03) << 15 | u32::from(c >> 1);
        let hour = u32::from(c & 0x01) << 4 | u32::from(d >> 12);
        let minute = u32::from(d >> 6 & 0x3F);
        let mut offset = i32::from(d & 0x1F);
        if d & 0x20 != 0 {
            offset = -offset;
        }
        emit(Event::Clock(local_time(mjd, hour, minute, offset)));
    }

    /// Type 8A: traffic message channel; only single-group messages are
    /// decoded.
    fn traffic_message(&mut self, emit: &mut impl FnMut(Event)) {
        let subtype = (self.group[3] & 0x18) >> 3;
        if subtype != 1 {
            log::debug!("traffic message subtype {} ignored", subtype);
            return;
        }
        let c = u16::from(self.group[4]) << 8 | u16::from(self.group[5]);
        let location = u16::from(self.group[6]) << 8 | u16::from(self.group[7]);
        emit(Event::TrafficMessage {
            event: c & 0x7FF,
            location,
            extent: (c >> 11 & 0x07) as u8,
            duration: TMC_DURATIONS[usize::from(self.group[3] & 0x07)],
        });
    }

    /// Type 14A: enhanced-other-networks cross references.
    fn other_networks(
        &mut self,
        programs: &mut Programs,
        band_min_mhz: f32,
        emit: &mut impl FnMut(Event),
    ) {
        let variant = self.group[3] & 0x0F;
        let on_pi = u16::from(self.group[6]) << 8 | u16::from(self.group[7]);
        programs.get_or_create(on_pi);
        match variant {
            0..=3 => {
                let index = usize::from(variant) << 1;
                programs
                    .get_or_create(on_pi)
                    .set_name_fragment(index, [self.group[4], self.group[5]]);
            }
            5 => {
                let f1 = af_frequency(self.group[4]);
                let f2 = af_frequency(self.group[5]);
                let own = self
                    .pi
                    .and_then(|pi| programs.get(pi))
                    .map(|p| p.frequency)
                    .unwrap_or(0.0);
                if own >= band_min_mhz && (f1 - own).abs() <= EON_FREQUENCY_TOLERANCE {
                    programs.get_or_create(on_pi).frequency = f2;
                    log::debug!(
                        "EON: program {:04X} reachable at {:.2} MHz",
                        on_pi,
                        f2
                    );
                } else {
                    log::debug!(
                        "EON: frequency mapping {:.2}/{:.2} MHz for {:04X} not applicable",
                        f1,
                        f2,
                        on_pi
                    );
                }
            }
            0x0D => {
                let tp_on = (self.group[3] & 0x10) != 0;
                let ta_on = (self.group[5] & 0x01) != 0;
                if tp_on && ta_on {
                    let other = programs.get_or_create(on_pi);
                    if !other.traffic_announcement {
                        other.traffic_announcement = true;
                        log::debug!("EON: traffic announcement on {:04X}", on_pi);
                        emit(Event::TrafficAnnouncement(true));
                    }
                }
            }
            _ => log::debug!("EON variant {} for {:04X} ignored", variant, on_pi),
        }
    }
}
