//! Presentation helpers: the manual page, the shell snippet and the HTML
//! wrapper served to browsers.

use maud::html;

use super::AppUrl;

/// The manual in man page form. `%APP%` stands for the base URL with a
/// trailing slash.
const USAGE: &str = include_str!("../../assets/usage.txt");

/// User-Agent fragments identifying a browser.
const BROWSER_MARKERS: [&str; 3] = ["Mozilla", "Lynx", "w3m"];

/// Renders the manual for this deployment.
pub fn usage_text(app: &AppUrl) -> String {
    USAGE.replace("%APP%", &app.join(""))
}

/// Shell functions wrapping the upload and download commands.
pub fn function_snippet(app: &AppUrl) -> String {
    format!(
        "netcopy() {{ curl -F \"text=<-\" \"{base}\"; }}\nnetpaste() {{ curl \"{base}$1\"; }}\n",
        base = app.join("")
    )
}

/// Crude browser sniffing on the User-Agent header.
pub fn is_browser(user_agent: Option<&str>) -> bool {
    user_agent.is_some_and(|ua| BROWSER_MARKERS.iter().any(|marker| ua.contains(marker)))
}

/// Wraps preformatted text in a minimal HTML body.
pub fn html_page(text: &str) -> String {
    let markup = html! {
        body { pre { samp { (text) } } }
    };
    format!("{}\n", markup.into_string())
}
