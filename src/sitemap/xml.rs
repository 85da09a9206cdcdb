use crate::events::model::Event;
use crate::listing::card::detail_url;
use crate::slug::event_slug;
use chrono::NaiveDate;
use std::fmt::Write;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Pages that exist regardless of the listing
pub const STATIC_PATHS: [StaticPage; 4] = [
    StaticPage::new("/", "daily", "1.0"),
    StaticPage::new("/events", "daily", "0.9"),
    StaticPage::new("/favorites", "weekly", "0.5"),
    StaticPage::new("/about", "monthly", "0.3"),
];

const EVENT_CHANGE_FREQUENCY: &str = "weekly";
const EVENT_PRIORITY: &str = "0.8";

#[derive(Debug, Clone, Copy)]
pub struct StaticPage {
    pub path: &'static str,
    pub change_frequency: &'static str,
    pub priority: &'static str,
}

impl StaticPage {
    pub const fn new(
        path: &'static str,
        change_frequency: &'static str,
        priority: &'static str,
    ) -> Self {
        Self {
            path,
            change_frequency,
            priority,
        }
    }
}

/// Sitemap-protocol document with the static pages followed by one entry per event
pub fn render_sitemap(site_url: &str, events: &[Event], today: NaiveDate) -> String {
    let site_url = site_url.trim_end_matches('/');
    let lastmod = today.format("%Y-%m-%d").to_string();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{}\">", SITEMAP_NAMESPACE);

    for page in STATIC_PATHS {
        let location = match page.path {
            "/" => format!("{}/", site_url),
            path => format!("{}{}", site_url, path),
        };

        push_url(&mut xml, &location, &lastmod, page.change_frequency, page.priority);
    }

    for event in events {
        let location = detail_url(site_url, &event_slug(event));

        push_url(&mut xml, &location, &lastmod, EVENT_CHANGE_FREQUENCY, EVENT_PRIORITY);
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, location: &str, lastmod: &str, change_frequency: &str, priority: &str) {
    let _ = write!(
        xml,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
        escape(location),
        lastmod,
        change_frequency,
        priority
    );
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }

    escaped
}
