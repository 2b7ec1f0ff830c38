//! Markdown to HTML rendering for the public post detail page.

use ammonia::Builder as AmmoniaBuilder;
use comrak::{Options, markdown_to_html};
use once_cell::sync::Lazy;

struct MarkdownRenderer {
    options: Options<'static>,
    sanitizer: AmmoniaBuilder<'static>,
}

static RENDERER: Lazy<MarkdownRenderer> = Lazy::new(|| MarkdownRenderer {
    options: default_options(),
    sanitizer: build_sanitizer(),
});

/// Render post markdown to sanitized HTML.
///
/// Raw HTML inside the markdown is passed through comrak and then cleaned by
/// ammonia, so authored inline markup survives while scripts do not.
pub fn render_markdown(markdown: &str) -> String {
    let html = markdown_to_html(markdown, &RENDERER.options);
    RENDERER.sanitizer.clean(&html).to_string()
}

fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.footnotes = true;

    let render = &mut options.render;
    render.github_pre_lang = true;
    render.r#unsafe = true;

    options
}

fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();
    builder.add_tag_attributes("code", &["class"]);
    builder.add_tag_attributes("pre", &["lang"]);
    builder.add_url_schemes(["http", "https", "mailto"].iter().copied());
    builder
}
