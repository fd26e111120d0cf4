#![no_main]

use std::str::FromStr;

use libfuzzer_sys::fuzz_target;
use padnav_core::Direction;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    match Direction::from_str(input) {
        Ok(dir) => {
            // Canonical names always parse back to the same direction.
            assert_eq!(Direction::from_str(dir.as_str()), Ok(dir));
        }
        Err(err) => assert_eq!(err.input(), input),
    }
});
