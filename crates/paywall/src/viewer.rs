/// Who is asking for a page. Supplied per render call and never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewerState {
    pub display_name: String,
    pub logged_in: bool,
    pub has_paid: bool,
}

impl ViewerState {
    pub fn new(display_name: impl Into<String>, logged_in: bool, has_paid: bool) -> Self {
        Self {
            display_name: display_name.into(),
            logged_in,
            has_paid,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}
