use anyhow::{Context, Result};
use argh::FromArgs;
use log::{LevelFilter, debug, info, warn};
use simple_logger::SimpleLogger;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tocmark::config::Config;
use tocmark::markdown::{self, HtmlRenderer, Parser};
use tocmark::page::{self, Page};

/// Render markdown to HTML, with a table of contents for documents that
/// contain a [TOC] marker.
#[derive(FromArgs)]
struct Args {
    /// markdown file to render (default: standard input)
    #[argh(positional)]
    input: Option<PathBuf>,

    /// file to write the HTML to (default: standard output)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// file to write the table of contents to; without it, the table of
    /// contents precedes the body
    #[argh(option)]
    toc_output: Option<PathBuf>,

    /// wrap the output in a full HTML page
    #[argh(switch)]
    page: bool,

    /// page template to use instead of the built-in one (implies --page)
    #[argh(option)]
    template: Option<PathBuf>,

    /// configuration file (default: tocmark.toml, if present)
    #[argh(option)]
    config: Option<PathBuf>,

    /// treat leading lines starting with % as a title block
    #[argh(switch)]
    title_block: bool,

    /// give headings ids derived from their text
    #[argh(switch)]
    auto_ids: bool,

    /// have the renderer emit a complete HTML document
    #[argh(switch)]
    complete_page: bool,

    /// log what's going on
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    let mut config = Config::load(args.config.as_deref())?;
    config.parse.title_block |= args.title_block;
    config.parse.auto_heading_ids |= args.auto_ids;
    config.html.complete_page |= args.complete_page;
    if args.template.is_some() {
        config.template = args.template.clone();
    }
    debug!("configuration: {config:?}");

    let source = read_input(args.input.as_deref())?;
    let parser = Parser::new(config.parse.clone());
    let mut renderer = HtmlRenderer::new(config.html.clone());
    let rendered = markdown::to_html_with(&source, &parser, &mut renderer);

    if let Some(path) = &args.toc_output {
        fs::write(path, &rendered.toc)
            .with_context(|| format!("writing table of contents to {}", path.display()))?;
        info!("wrote table of contents to {}", path.display());
    }

    let html = if args.page || args.template.is_some() {
        if config.html.complete_page {
            warn!("both the renderer and the page template produce a full document");
        }
        let template = match &config.template {
            Some(path) => Some(
                fs::read_to_string(path)
                    .with_context(|| format!("reading template {}", path.display()))?,
            ),
            None => None,
        };
        let toc = match args.toc_output {
            Some(_) => "",
            None => rendered.toc.as_str(),
        };
        page::render_page(
            &Page {
                title: rendered.title.as_deref(),
                css: config.html.css.as_deref(),
                toc,
                body: &rendered.body,
            },
            template.as_deref(),
        )
        .context("rendering page template")?
    } else if args.toc_output.is_none() {
        rendered.toc + &rendered.body
    } else {
        rendered.body
    };

    write_output(args.output.as_deref(), &html)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // Only fails if a logger is already installed, which is fine.
    let _ = SimpleLogger::new().with_level(level).init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path.display()))
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("reading standard input")?;
            Ok(source)
        }
    }
}

fn write_output(path: Option<&Path>, html: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => io::stdout()
            .write_all(html.as_bytes())
            .context("writing to standard output")?,
    }
    Ok(())
}
