//! A compiled page, ready to render for any viewer.
use crate::template::PageTemplate;
use crate::viewer::ViewerState;
use serde::Serialize;
use site::{ConfigRecord, Currency};
use std::io::Write;
use std::sync::Arc;

/// Sale metadata of a configured page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleInfo {
    pub name: String,
    pub id: String,
    pub price_minor: u64,
    pub currency: Currency,
}

impl From<&ConfigRecord> for ArticleInfo {
    fn from(record: &ConfigRecord) -> Self {
        Self {
            name: record.name.clone(),
            id: record.id.clone(),
            price_minor: record.price_minor,
            currency: record.currency,
        }
    }
}

/// Values a page template is rendered against. Serialized field names are the template fields
/// (`LoggedIn`, `HasPaid`, `Name` and the three variant fields).
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PageData<'a> {
    pub logged_in: bool,
    pub has_paid: bool,
    pub name: &'a str,
    pub walled_content: &'a str,
    pub paywall_content: &'a str,
    pub loginwall_content: &'a str,
}

/// Immutable after construction; shared by every render of the page.
#[derive(Clone, Debug)]
pub struct RenderableUnit {
    template: PageTemplate,
    walled: Option<String>,
    pay_prompt: Arc<str>,
    login_prompt: Arc<str>,
    article: Option<ArticleInfo>,
}

impl RenderableUnit {
    pub fn new(
        template: PageTemplate,
        walled: Option<String>,
        pay_prompt: Arc<str>,
        login_prompt: Arc<str>,
        article: Option<ArticleInfo>,
    ) -> Self {
        Self {
            template,
            walled,
            pay_prompt,
            login_prompt,
            article,
        }
    }

    pub fn template(&self) -> &PageTemplate {
        &self.template
    }

    /// Content cut from the page, if the page is gated.
    pub fn walled_content(&self) -> Option<&str> {
        self.walled.as_deref()
    }

    pub fn pay_prompt(&self) -> &str {
        &self.pay_prompt
    }

    pub fn login_prompt(&self) -> &str {
        &self.login_prompt
    }

    pub fn article(&self) -> Option<&ArticleInfo> {
        self.article.as_ref()
    }

    pub fn is_gated(&self) -> bool {
        self.walled.is_some()
    }

    pub fn render<W: Write + ?Sized>(
        &self,
        viewer: &ViewerState,
        out: &mut W,
    ) -> Result<(), handlebars::RenderError> {
        self.template.render(&self.data(viewer), out)
    }

    pub fn render_to_string(
        &self,
        viewer: &ViewerState,
    ) -> Result<String, handlebars::RenderError> {
        self.template.render_to_string(&self.data(viewer))
    }

    fn data<'a>(&'a self, viewer: &'a ViewerState) -> PageData<'a> {
        PageData {
            logged_in: viewer.logged_in,
            has_paid: viewer.has_paid,
            name: &viewer.display_name,
            walled_content: self.walled.as_deref().unwrap_or(""),
            paywall_content: &self.pay_prompt,
            loginwall_content: &self.login_prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{AccessGate, FIELD_HAS_PAID, FIELD_LOGGED_IN, FIELD_NAME, Variant};

    fn unit(source: &str, walled: Option<&str>) -> RenderableUnit {
        RenderableUnit::new(
            PageTemplate::compile(source).unwrap(),
            walled.map(str::to_string),
            Arc::from("<p>pay</p>"),
            Arc::from("<p>login</p>"),
            None,
        )
    }

    #[test]
    fn placeholder_binds_selected_variant() {
        let unit = unit(&AccessGate::placeholder_directive(), Some("<p>secret</p>"));
        let render = |logged_in, has_paid| {
            unit.render_to_string(&ViewerState::new("ann", logged_in, has_paid))
                .unwrap()
        };
        assert_eq!(render(true, true), "<p>secret</p>");
        assert_eq!(render(true, false), "<p>pay</p>");
        assert_eq!(render(false, true), "<p>login</p>");
        assert_eq!(render(false, false), "<p>login</p>");
    }

    #[test]
    fn data_fields_match_template_field_names() {
        let mut source = format!("{{{{{FIELD_LOGGED_IN}}}}}|{{{{{FIELD_HAS_PAID}}}}}|{{{{{FIELD_NAME}}}}}");
        for variant in Variant::ALL {
            source.push_str(&format!("|{{{{{{{}}}}}}}", variant.field()));
        }
        let out = unit(&source, Some("<p>secret</p>"))
            .render_to_string(&ViewerState::new("ann", true, false))
            .unwrap();
        assert_eq!(out, "true|false|ann|<p>secret</p>|<p>pay</p>|<p>login</p>");
    }

    #[test]
    fn name_is_escaped_for_text_and_attributes() {
        let unit = unit(r#"hi {{Name}} <a title="{{Name}}">x</a>"#, None);
        let out = unit
            .render_to_string(&ViewerState::new(r#"<script>" onclick="x"#, true, false))
            .unwrap();
        assert!(!out.contains("<script>"), "{out}");
        assert!(out.contains("&lt;script&gt;"), "{out}");
        assert!(!out.contains(r#"" onclick"#), "{out}");
    }

    #[test]
    fn unknown_field_is_a_render_error() {
        let unit = unit("{{Price}}", None);
        assert!(unit.render_to_string(&ViewerState::anonymous()).is_err());
    }

    #[test]
    fn renders_into_a_writer() {
        let unit = unit("<b>{{#if LoggedIn}}in{{else}}out{{/if}}</b>", None);
        let mut out = Vec::new();
        unit.render(&ViewerState::new("x", true, false), &mut out).unwrap();
        assert_eq!(out, b"<b>in</b>");
    }
}
