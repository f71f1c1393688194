#![no_main]

use html::Node;
use libfuzzer_sys::fuzz_target;

const PLACEHOLDER: &str = "\u{1}placeholder\u{1}";

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(dom) = html::parse(input) else {
        return;
    };
    let before = html::serialize(&dom);
    let marker_present = html::locate_by_class(&dom, "CUT").is_some();

    let outcome = paywall::split(dom, "CUT", || Node::raw(PLACEHOLDER))
        .expect("a document root never matches a class");
    let after = html::serialize(&outcome.root);

    match outcome.walled {
        None => {
            assert!(!marker_present);
            assert_eq!(before, after);
        }
        Some(walled) => {
            assert!(marker_present);
            assert!(after.contains(PLACEHOLDER));
            assert!(html::locate_by_class(&outcome.root, "CUT").is_some());
            assert_eq!(after.len() + walled.len(), before.len() + PLACEHOLDER.len());
        }
    }
});
