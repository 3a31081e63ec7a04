//! Server-rendered HTML pages. All user-supplied text goes through [`escape`].

use std::fmt::Write;

use axum::response::Html;
use bastion_types::models::Website;

use crate::notice::Notice;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, notice: Option<Notice>, body: &str) -> Html<String> {
    let notice = notice
        .map(|n| {
            let class = if n.is_error() { "notice error" } else { "notice" };
            format!("<p class=\"{class}\">{}</p>\n", escape(n.message()))
        })
        .unwrap_or_default();

    Html(format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title} | Bastion</title></head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         {notice}\
         {body}\
         </body>\n\
         </html>\n"
    ))
}

fn credentials_form(action: &str, submit: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">{submit}</button>\n\
         </form>\n"
    )
}

pub fn register(notice: Option<Notice>) -> Html<String> {
    let body = credentials_form("/register", "Register")
        + "<p>Already have an account? <a href=\"/login\">Log in</a></p>\n";
    layout("Register", notice, &body)
}

pub fn login(notice: Option<Notice>) -> Html<String> {
    let body = credentials_form("/login", "Log in")
        + "<p>No account yet? <a href=\"/register\">Register</a></p>\n";
    layout("Login", notice, &body)
}

pub fn dashboard(email: &str, websites: &[Website], notice: Option<Notice>) -> Html<String> {
    let mut body = format!(
        "<p>Signed in as {} | <a href=\"/logout\">Log out</a></p>\n",
        escape(email)
    );

    if websites.is_empty() {
        body.push_str("<p>No protected websites yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Domain</th><th>WAF</th></tr>\n");
        for site in websites {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"/website/{}\">{}</a></td><td>{}</td></tr>",
                site.id,
                escape(&site.domain),
                waf_label(site.waf_enabled),
            );
        }
        body.push_str("</table>\n");
    }

    body.push_str("<p><a href=\"/add-website\">Add website</a></p>\n");
    layout("Dashboard", notice, &body)
}

pub fn add_website(notice: Option<Notice>) -> Html<String> {
    let body = "<form method=\"post\" action=\"/add-website\">\n\
                <label>Domain <input type=\"text\" name=\"domain\" required></label>\n\
                <button type=\"submit\">Add</button>\n\
                </form>\n\
                <p><a href=\"/dashboard\">Back to dashboard</a></p>\n";
    layout("Add website", notice, body)
}

pub fn website_detail(site: &Website, notice: Option<Notice>) -> Html<String> {
    let body = format!(
        "<dl>\n\
         <dt>Domain</dt><dd>{}</dd>\n\
         <dt>WAF</dt><dd>{}</dd>\n\
         <dt>Added</dt><dd>{}</dd>\n\
         </dl>\n\
         <p><a href=\"/dashboard\">Back to dashboard</a></p>\n",
        escape(&site.domain),
        waf_label(site.waf_enabled),
        site.created_at.format("%Y-%m-%d %H:%M UTC"),
    );
    layout("Website", notice, &body)
}

fn waf_label(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
