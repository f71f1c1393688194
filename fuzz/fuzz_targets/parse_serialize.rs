#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(dom) = html::parse(input) else {
        return;
    };
    let once = html::serialize(&dom);
    let reparsed = html::parse(&once).expect("serializer output must parse");
    let twice = html::serialize(&reparsed);
    assert_eq!(once, twice, "parse/serialize is not a fixed point");
});
