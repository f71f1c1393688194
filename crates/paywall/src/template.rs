//! Page templates compiled with `handlebars`.
//!
//! Each page gets its own strict-mode registry holding the page under [`PAGE`]. Registries are
//! never mutated after compilation, so one template can be rendered from many threads.
use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use std::io::Write;

/// Name of the single template in a page registry.
pub const PAGE: &str = "page";

#[derive(Clone, Debug)]
pub struct PageTemplate {
    registry: Handlebars<'static>,
}

impl PageTemplate {
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(PAGE, source)?;
        log::trace!(target: "paywall.template", "compiled {} bytes", source.len());
        Ok(Self { registry })
    }

    pub fn render<T, W>(&self, data: &T, out: &mut W) -> Result<(), RenderError>
    where
        T: Serialize,
        W: Write + ?Sized,
    {
        self.registry.render_to_write(PAGE, data, out)
    }

    pub fn render_to_string<T: Serialize>(&self, data: &T) -> Result<String, RenderError> {
        self.registry.render(PAGE, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn data(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn conditionals_follow_the_data() {
        let template = PageTemplate::compile("<b>{{#if LoggedIn}}in{{else}}out{{/if}}</b>").unwrap();
        assert_eq!(template.render_to_string(&data(&[("LoggedIn", true)])).unwrap(), "<b>in</b>");
        assert_eq!(template.render_to_string(&data(&[("LoggedIn", false)])).unwrap(), "<b>out</b>");
    }

    #[test]
    fn unclosed_block_does_not_compile() {
        assert!(PageTemplate::compile("<p>{{#if LoggedIn}}</p>").is_err());
    }

    #[test]
    fn strict_mode_rejects_unknown_fields() {
        let template = PageTemplate::compile("{{Price}}").unwrap();
        assert!(template.render_to_string(&data(&[("LoggedIn", true)])).is_err());
    }

    #[test]
    fn renders_into_a_writer() {
        let template = PageTemplate::compile("{{#if HasPaid}}paid{{/if}}").unwrap();
        let mut out = Vec::new();
        template.render(&data(&[("HasPaid", true)]), &mut out).unwrap();
        assert_eq!(out, b"paid");
    }

    #[test]
    fn compiled_template_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PageTemplate>();
    }
}
