//! Which variant of a gated page a viewer gets.
//!
//! | logged in | has paid | variant |
//! |---|---|---|
//! | yes | yes | [`Variant::Walled`] |
//! | yes | no | [`Variant::PayPrompt`] |
//! | no | any | [`Variant::LoginPrompt`] |
//!
//! The same table drives both [`AccessGate::select`] and the placeholder directive that is
//! compiled into gated pages.
use crate::viewer::ViewerState;

pub const FIELD_LOGGED_IN: &str = "LoggedIn";
pub const FIELD_HAS_PAID: &str = "HasPaid";
/// The viewer's display name. Output with `{{Name}}` is HTML-escaped, which protects element
/// text and quoted attribute values but not JavaScript inside `<script>` or `on*` handlers.
pub const FIELD_NAME: &str = "Name";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Walled,
    PayPrompt,
    LoginPrompt,
}

impl Variant {
    /// Evaluation order. The last entry is the fallback and has no condition.
    pub const ALL: [Variant; 3] = [Variant::Walled, Variant::PayPrompt, Variant::LoginPrompt];

    /// Template field the variant's markup is bound to.
    pub fn field(self) -> &'static str {
        match self {
            Variant::Walled => "WalledContent",
            Variant::PayPrompt => "PaywallContent",
            Variant::LoginPrompt => "LoginwallContent",
        }
    }

    /// Template condition guarding the variant.
    fn condition(self) -> Option<&'static str> {
        match self {
            Variant::Walled => Some("(and LoggedIn HasPaid)"),
            Variant::PayPrompt => Some("(and LoggedIn (not HasPaid))"),
            Variant::LoginPrompt => None,
        }
    }

    fn admits(self, viewer: &ViewerState) -> bool {
        match self {
            Variant::Walled => viewer.logged_in && viewer.has_paid,
            Variant::PayPrompt => viewer.logged_in && !viewer.has_paid,
            Variant::LoginPrompt => true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AccessGate;

impl AccessGate {
    pub fn select(viewer: &ViewerState) -> Variant {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.admits(viewer))
            .unwrap_or(Variant::LoginPrompt)
    }

    /// The nested `if / else` directive that stands in for the removed content. Variant markup
    /// is emitted unescaped.
    pub fn placeholder_directive() -> String {
        let mut out = String::new();
        let mut open = 0;
        for variant in Variant::ALL {
            let value = format!("{{{{{{{}}}}}}}", variant.field());
            match variant.condition() {
                Some(condition) => {
                    out.push_str(&format!("{{{{#if {condition}}}}}{value}{{{{else}}}}"));
                    open += 1;
                }
                None => out.push_str(&value),
            }
        }
        out.push_str(&"{{/if}}".repeat(open));
        out
    }
}
