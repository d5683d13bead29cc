use anyhow::Result;

/// The page template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/page.html");

/// Everything a page template gets to see.
#[derive(Debug, Default)]
pub struct Page<'a> {
    pub title: Option<&'a str>,
    pub css: Option<&'a str>,
    pub toc: &'a str,
    pub body: &'a str,
}

/// Render a full HTML page around a converted document with the given
/// template source, or [`DEFAULT_TEMPLATE`].
///
/// The template sees `title`, `css`, `toc` and `body`. The last two are
/// already HTML, so templates should pass them through `safe`.
pub fn render_page(page: &Page, template: Option<&str>) -> Result<String> {
    let mut env = minijinja::Environment::new();
    env.add_template("page.html", template.unwrap_or(DEFAULT_TEMPLATE))?;

    let tmpl = env.get_template("page.html")?;
    let html = tmpl.render(minijinja::context! {
        title => page.title,
        css => page.css,
        toc => page.toc,
        body => page.body,
    })?;
    Ok(html)
}
