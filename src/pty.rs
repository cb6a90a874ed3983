/// Program-type names per the RBDS standard, indexed by the 5-bit PTY code.
///
/// Code 0 means "no programme type" and is never reported.
const PROGRAM_TYPES: [&str; 32] = [
    "None",
    "News",
    "Current affairs",
    "Information",
    "Sport",
    "Education",
    "Drama",
    "Culture",
    "Science",
    "Varied",
    "Pop music",
    "Rock music",
    "Easy listening",
    "Light classical",
    "Serious classical",
    "Other music",
    "Weather",
    "Finance",
    "Children's programmes",
    "Social affairs",
    "Religion",
    "Phone-in",
    "Travel",
    "Leisure",
    "Jazz music",
    "Country music",
    "National music",
    "Oldies music",
    "Folk music",
    "Documentary",
    "Alarm test",
    "Alarm",
];

/// Human-readable name for a program-type code. `None` for code 0 and for
/// values outside the 5-bit range.
pub fn program_type_name(pty: u8) -> Option<&'static str> {
    if pty == 0 || pty > 31 {
        None
    } else {
        Some(PROGRAM_TYPES[pty as usize])
    }
}
