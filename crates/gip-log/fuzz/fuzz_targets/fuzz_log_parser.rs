#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    for entry in gip_log::parser::parse_output(&text, "fuzz") {
        assert_eq!(entry.repo, "fuzz");
    }
});
