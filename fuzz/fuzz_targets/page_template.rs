#![no_main]

use libfuzzer_sys::fuzz_target;
use paywall::{PageTemplate, RenderableUnit, ViewerState};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(template) = PageTemplate::compile(source) else {
        return;
    };
    let unit = RenderableUnit::new(
        template,
        Some("<p>walled</p>".to_string()),
        Arc::from("<p>pay</p>"),
        Arc::from("<p>login</p>"),
        None,
    );
    for (logged_in, has_paid) in [(false, false), (true, false), (true, true)] {
        let _ = unit.render_to_string(&ViewerState::new("<fuzz>", logged_in, has_paid));
    }
});
