use chrono::NaiveDateTime;
use sqlx::PgPool;
use std::fmt::Write;
use storage::{
    error::Result,
    repository::{benefit::BenefitRepository, book::BookRepository, category::CategoryRepository},
};
use uuid::Uuid;

const URLSET_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Everything the sitemap links to.
#[derive(Debug, Default)]
pub struct SitemapEntries {
    pub books: Vec<(Uuid, NaiveDateTime)>,
    pub categories: Vec<String>,
    pub benefits: Vec<String>,
}

pub async fn load_entries(pool: &PgPool) -> Result<SitemapEntries> {
    Ok(SitemapEntries {
        books: BookRepository::new(pool).list_published_stamps().await?,
        categories: CategoryRepository::new(pool).list_in_use().await?,
        benefits: BenefitRepository::new(pool).list_in_use().await?,
    })
}

/// Build the `urlset` document. Pages without their own timestamp use `today`.
pub fn render(base_url: &str, entries: &SitemapEntries, today: NaiveDateTime) -> String {
    let base = escape_xml(base_url.trim_end_matches('/'));
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{}\">", URLSET_NS);

    push_url(&mut xml, &base, today, "1.0");

    for (book_id, updated_at) in &entries.books {
        push_url(&mut xml, &format!("{}/book/{}", base, book_id), *updated_at, "0.8");
    }

    for category in &entries.categories {
        let loc = format!("{}/category/{}", base, urlencoding::encode(category));
        push_url(&mut xml, &loc, today, "0.6");
    }

    for benefit in &entries.benefits {
        let loc = format!("{}/benefit/{}", base, urlencoding::encode(benefit));
        push_url(&mut xml, &loc, today, "0.6");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: NaiveDateTime, priority: &str) {
    let _ = write!(
        xml,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <priority>{}</priority>\n  </url>\n",
        loc,
        lastmod.format("%Y-%m-%dT%H:%M:%SZ"),
        priority
    );
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
