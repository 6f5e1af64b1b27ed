use once_cell::sync::Lazy;
use scraper::{ElementRef, Node, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector should be valid")
}

pub(crate) static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
pub(crate) static TR: Lazy<Selector> = Lazy::new(|| selector("tr"));
pub(crate) static TH: Lazy<Selector> = Lazy::new(|| selector("th"));
pub(crate) static TD: Lazy<Selector> = Lazy::new(|| selector("td"));
pub(crate) static BODY_ROWS: Lazy<Selector> = Lazy::new(|| selector("tbody > tr"));
pub(crate) static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));
pub(crate) static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));

/// Trimmed text content of an element.
pub(crate) fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Trimmed text content, leaving out every descendant element named in `skip`.
pub(crate) fn text_without(element: ElementRef<'_>, skip: &[&str]) -> String {
    let mut out = String::new();
    push_text(element, skip, &mut out);
    out.trim().to_owned()
}

fn push_text(element: ElementRef<'_>, skip: &[&str], out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if !skip.contains(&child_el.value().name()) {
                push_text(child_el, skip, out);
            }
        } else if let Node::Text(t) = child.value() {
            out.push_str(t);
        }
    }
}
