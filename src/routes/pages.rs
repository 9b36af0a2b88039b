// src/routes/pages.rs
//
// Dashboard pages. Nothing is fetched server side; each page's script
// calls the JSON API.

use axum::response::Html;

const LAYOUT: &str = include_str!("../../templates/layout.html");

pub struct Page {
    pub path: &'static str,
    pub nav_label: &'static str,
    pub title: &'static str,
    content: &'static str,
    script: &'static str,
}

pub const HOME: Page = Page {
    path: "/",
    nav_label: "Home",
    title: "Home - Commission Dashboard",
    content: include_str!("../../templates/home.html"),
    script: include_str!("../../templates/home.js.html"),
};

pub const TRENDS: Page = Page {
    path: "/trends",
    nav_label: "Trends",
    title: "Trends - Commission Dashboard",
    content: include_str!("../../templates/trends.html"),
    script: include_str!("../../templates/trends.js.html"),
};

pub const GROSS_COMMISSION: Page = Page {
    path: "/gross-commission",
    nav_label: "Gross Commission",
    title: "Gross Commission - Commission Dashboard",
    content: include_str!("../../templates/gross_commission.html"),
    script: include_str!("../../templates/gross_commission.js.html"),
};

pub const NET_COMMISSION: Page = Page {
    path: "/net-commission",
    nav_label: "Net Commission",
    title: "Net Commission - Commission Dashboard",
    content: include_str!("../../templates/net_commission.html"),
    script: include_str!("../../templates/net_commission.js.html"),
};

pub const PAGES: [&Page; 4] = [&HOME, &TRENDS, &GROSS_COMMISSION, &NET_COMMISSION];

fn nav(active: &Page) -> String {
    PAGES
        .iter()
        .map(|p| {
            let class = if p.path == active.path { "nav-link active" } else { "nav-link" };
            format!(r#"        <li class="nav-item"><a class="{class}" href="{}">{}</a></li>"#, p.path, p.nav_label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(page: &Page) -> Html<String> {
    Html(
        LAYOUT
            .replace("{{ title }}", page.title)
            .replace("{{ nav }}", &nav(page))
            .replace("{{ content }}", page.content)
            .replace("{{ script }}", page.script),
    )
}

/// GET /
pub async fn home() -> Html<String> {
    render(&HOME)
}

/// GET /trends
pub async fn trends() -> Html<String> {
    render(&TRENDS)
}

/// GET /gross-commission
pub async fn gross_commission() -> Html<String> {
    render(&GROSS_COMMISSION)
}

/// GET /net-commission
pub async fn net_commission() -> Html<String> {
    render(&NET_COMMISSION)
}
