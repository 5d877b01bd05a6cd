pub mod behavior;
mod builtin;
mod cli;
pub mod copy;
pub mod env;
pub mod nav;
pub mod page;
mod progress;
pub mod theme;
pub mod verify;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use kuchiki::traits::TendrilSink as _;
use maud::{PreEscaped, html};

pub use behavior::{Behaviors, Host};
pub use cli::{Ambient, Args as CliArgs, ProgressMode};
pub use copy::{CopyBinding, REVERT_DELAY};
pub use env::{
    Clipboard, ColorSchemeProbe, FixedScheme, JsonThemeStore, MemoryThemeStore, ScriptedClipboard,
    SystemClipboard, ThemeStore,
};
pub use nav::NavBinding;
pub use page::Page;
pub use theme::{Theme, ThemeController};

use cli::Args;
use progress::Progress;

/// Bake the page behaviors into rendered documentation pages: resolve and
/// apply the theme, attach copy controls to code blocks, reset the navigation
/// panel to closed, verify, and write the result out.
pub fn run(args: Args) -> anyhow::Result<()> {
    use std::io::IsTerminal as _;

    let progress_enabled = match args.progress {
        ProgressMode::Always => true,
        ProgressMode::Never => false,
        ProgressMode::Auto => std::io::stderr().is_terminal(),
    };
    let progress = Progress::new(progress_enabled);
    progress.set_stage("collecting pages");

    let dir_mode = args.input.is_dir();
    let pages = collect_pages(&args.input)?;
    if pages.is_empty() {
        anyhow::bail!("no .html pages under {}", args.input.display());
    }
    progress.set_pages_total(pages.len());

    let host = host_for(&args);

    progress.set_stage("enhancing pages");
    let res = if dir_mode {
        let out_dir = args.out.clone().unwrap_or_else(|| PathBuf::from("out"));
        enhance_dir(&pages, &args.input, &out_dir, &host, args.builtin_css, &progress)
    } else {
        let out_path = args
            .out
            .clone()
            .unwrap_or_else(|| default_single_out(&args.input));
        enhance_file(&pages[0], &out_path, &host, args.builtin_css, &progress)
    };
    progress.finish();
    res
}

fn enhance_dir(
    pages: &[PathBuf],
    in_dir: &Path,
    out_dir: &Path,
    host: &Host,
    builtin_css: bool,
    progress: &Progress,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    for page_path in pages {
        let rel = page_path.strip_prefix(in_dir).unwrap_or(page_path);
        let out_path = out_dir.join(rel);
        enhance_file(page_path, &out_path, host, builtin_css, progress)?;
    }
    Ok(())
}

fn enhance_file(
    input: &Path,
    out: &Path,
    host: &Host,
    builtin_css: bool,
    progress: &Progress,
) -> anyhow::Result<()> {
    let html =
        std::fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;

    let behaviors = Behaviors::init(Page::parse(&html), host.clone())
        .with_context(|| format!("wire behaviors for {}", input.display()))?;
    let blocks = behaviors.copy_bindings().len();
    let nav_bound = behaviors.nav().is_some();

    let page = behaviors.into_page();
    if builtin_css {
        inject_builtin_css(&page);
    }

    let enhanced = page.to_html()?;
    verify::assert_enhanced(&enhanced).with_context(|| format!("verify {}", input.display()))?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    std::fs::write(out, enhanced).with_context(|| format!("write {}", out.display()))?;

    let name = input.file_name().and_then(|s| s.to_str()).unwrap_or("page");
    progress.page_done(name, blocks, nav_bound);
    tracing::info!(page = %input.display(), blocks, nav = nav_bound, "page enhanced");
    Ok(())
}

fn collect_pages(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut pages = Vec::new();
    for entry in walkdir::WalkDir::new(input).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", input.display()))?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "html")
        {
            pages.push(entry.path().to_path_buf());
        }
    }
    Ok(pages)
}

fn default_single_out(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");
    input.with_file_name(format!("{stem}-enhanced.html"))
}

fn host_for(args: &Args) -> Host {
    let store: Rc<dyn ThemeStore> = match &args.theme_state {
        Some(path) => Rc::new(JsonThemeStore::new(path.clone())),
        None => Rc::new(MemoryThemeStore::default()),
    };
    let scheme: Rc<dyn ColorSchemeProbe> = match args.ambient {
        Ambient::Dark => Rc::new(FixedScheme::dark()),
        Ambient::Light => Rc::new(FixedScheme::light()),
    };
    Host {
        store,
        scheme,
        clipboard: Rc::new(SystemClipboard),
    }
}

fn inject_builtin_css(page: &Page) {
    let Some(head) = page.head() else {
        tracing::warn!("page has no <head>; skipping built-in stylesheet");
        return;
    };
    let markup = html! { style { (PreEscaped(builtin::BUILTIN_CSS)) } }.into_string();
    let doc = kuchiki::parse_html().one(markup.as_str());
    let style = doc.select_first("style").unwrap().as_node().clone();
    head.append(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_default_output_name() {
        assert_eq!(
            default_single_out(Path::new("docs/intro.html")),
            Path::new("docs/intro-enhanced.html")
        );
    }

    #[test]
    fn builtin_css_lands_in_head() {
        let page = Page::parse("<html><head><title>t</title></head><body></body></html>");
        inject_builtin_css(&page);
        let html = page.to_html().unwrap();
        assert!(html.contains("<style>"));
        assert!(html.contains("data-theme=\"dark\"]"));
    }
}
