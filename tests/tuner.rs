use si470x_monitor::{Band, Control, Error, Tuner};

mod common;
use self::common::MockRadio;

fn new_tuner(radio: MockRadio) -> Tuner<MockRadio> {
    Tuner::new(radio, Band::default()).unwrap()
}

#[test]
fn frequency_uses_the_standard_divider() {
    let tuner = new_tuner(MockRadio::new(1_576_000));
    assert!((tuner.current() - 98.5).abs() < 1e-3);
}

#[test]
fn frequency_uses_the_low_range_divider() {
    let mut radio = MockRadio::new(0);
    radio.caps.low_range = true;
    radio.raw_frequency = 1576;
    let tuner = new_tuner(radio);
    assert!((tuner.current() - 98.5).abs() < 0.1);
}

#[test]
fn set_frequency_round_trips_within_one_step() {
    let mut tuner = new_tuner(MockRadio::new(0));
    tuner.set_frequency(99.85).unwrap();
    let read_back = tuner.frequency().unwrap();
    assert!((read_back - 99.85).abs() <= 1.0 / 16000.0);
}

#[test]
fn set_frequency_rejects_out_of_band_values() {
    let mut tuner = new_tuner(MockRadio::new(0));
    assert_error!(tuner.set_frequency(87.45), Error::OutOfRange);
    assert_error!(tuner.set_frequency(108.05), Error::OutOfRange);
    assert_error!(tuner.set_frequency(0.0), Error::OutOfRange);
}

#[test]
fn set_frequency_accepts_the_band_edges() {
    let mut tuner = new_tuner(MockRadio::new(0));
    tuner.set_frequency(87.5).unwrap();
    tuner.set_frequency(108.0).unwrap();
}

#[test]
fn seek_reports_the_landing_frequency() {
    let mut radio = MockRadio::new(1_576_000);
    radio.seek_lands_on = 1_633_600;
    let mut tuner = new_tuner(radio);
    let mhz = tuner.seek(true).unwrap();
    assert!((mhz - 102.1).abs() < 1e-3);
    assert_eq!(tuner.destroy().seeks, [true]);
}

#[test]
fn seek_outside_the_band_is_out_of_range() {
    let mut radio = MockRadio::new(1_576_000);
    radio.seek_lands_on = 0;
    let mut tuner = new_tuner(radio);
    assert_error!(tuner.seek(false), Error::OutOfRange);
}

#[test]
fn volume_is_mapped_into_the_control_range() {
    let mut tuner = new_tuner(MockRadio::new(0));
    tuner.set_volume(0).unwrap();
    tuner.set_volume(50).unwrap();
    tuner.set_volume(100).unwrap();
    tuner.set_volume(200).unwrap(); // clamps to 100
    assert_eq!(
        tuner.destroy().controls,
        [
            (Control::Mute, 1),
            (Control::Volume, 0),
            (Control::Mute, 0),
            (Control::Volume, 7),
            (Control::Mute, 0),
            (Control::Volume, 15),
            (Control::Mute, 0),
            (Control::Volume, 15),
        ]
    );
}

#[test]
fn volume_mapping_respects_offset_ranges() {
    let mut radio = MockRadio::new(0);
    radio.volume_range = si470x_monitor::ControlRange {
        min: 1000,
        max: 3000,
    };
    let mut tuner = new_tuner(radio);
    tuner.set_volume(25).unwrap();
    assert_eq!(
        tuner.destroy().controls,
        [(Control::Mute, 0), (Control::Volume, 1500)]
    );
}
