use quickcheck_macros::quickcheck;
use si470x_monitor::{gregorian_to_mjd, local_time, mjd_to_gregorian};

// 1970-01-01 .. 2100-01-01
const MJD_MIN: u32 = 40587;
const MJD_MAX: u32 = 88069;

#[quickcheck]
fn mjd_round_trips_over_the_broadcast_range(seed: u32) -> bool {
    let mjd = MJD_MIN + seed % (MJD_MAX - MJD_MIN + 1);
    let (year, month, day) = mjd_to_gregorian(mjd);
    gregorian_to_mjd(year, month, day) == mjd
}

#[quickcheck]
fn gregorian_components_stay_in_range(seed: u32) -> bool {
    let mjd = MJD_MIN + seed % (MJD_MAX - MJD_MIN + 1);
    let (year, month, day) = mjd_to_gregorian(mjd);
    (1970..=2100).contains(&year) && (1..=12).contains(&month) && (1..=31).contains(&day)
}

#[test]
fn epoch_endpoints() {
    assert_eq!(mjd_to_gregorian(MJD_MIN), (1970, 1, 1));
    assert_eq!(mjd_to_gregorian(MJD_MAX), (2100, 1, 1));
}

#[test]
fn date_line_rendering() {
    assert_eq!(
        local_time(58863, 12, 19, 2).to_string(),
        "2020-01-15 13:19 (+01:00)"
    );
    assert_eq!(
        local_time(58863, 12, 19, 0).to_string(),
        "2020-01-15 12:19 (+00:00)"
    );
    assert_eq!(
        local_time(58863, 12, 19, -11).to_string(),
        "2020-01-15 06:49 (-05:30)"
    );
}
