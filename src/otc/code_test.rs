use super::code::testing::{ManualClock, ScriptedCodes};
use super::code::{Clock, CodeGenerator, RandomCodeGenerator};
use crate::constants::CODE_LENGTH;
use chrono::{Duration, TimeZone, Utc};

#[test]
fn test_random_codes_are_fixed_length_digits() {
    let generator = RandomCodeGenerator;
    for _ in 0..200 {
        let code = generator.generate();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_digit()), "code: {code}");
    }
}

#[test]
fn test_random_codes_vary() {
    let generator = RandomCodeGenerator;
    let codes: std::collections::HashSet<String> =
        (0..100).map(|_| generator.generate()).collect();
    // 100 draws from a 10^4 space collapsing to one value means a broken rng
    assert!(codes.len() > 1);
}

#[test]
fn test_scripted_codes_replay_in_order() {
    let generator = ScriptedCodes::new(&["1111", "2222"]);
    assert_eq!(generator.generate(), "1111");
    assert_eq!(generator.generate(), "2222");
}

#[test]
fn test_manual_clock_advances() {
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);

    clock.advance(Duration::seconds(90));
    assert_eq!(clock.now(), start + Duration::seconds(90));
}
