//! Server-rendered pages.

use axum::response::Html;

use crate::auth::repo_types::User;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, nav: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <nav>{nav}</nav>
  <main>
{body}
  </main>
</body>
</html>
"#
    ))
}

fn nav(signed_in: bool) -> &'static str {
    if signed_in {
        r#"<a href="/">Home</a> <a href="/secrets">Secrets</a> <a href="/logout">Log Out</a>"#
    } else {
        r#"<a href="/">Home</a> <a href="/login">Login</a> <a href="/register">Register</a>"#
    }
}

fn notice(flash: Option<&str>) -> String {
    flash
        .map(|msg| format!(r#"    <p class="flash">{}</p>"#, escape(msg)))
        .unwrap_or_default()
}

pub fn home(user: Option<&User>) -> Html<String> {
    let call_to_action = if user.is_some() {
        r#"    <a href="/secrets">Back to your secrets</a>"#
    } else {
        r#"    <a href="/register">Register</a> or <a href="/login">Login</a>"#
    };
    layout(
        "Secrets",
        nav(user.is_some()),
        &format!("    <h1>Secrets</h1>\n    <p>Don't keep your secrets, share them anonymously!</p>\n{call_to_action}"),
    )
}

pub fn register(flash: Option<&str>) -> Html<String> {
    let body = format!(
        r#"    <h1>Register</h1>
{}
    <form action="/register" method="post">
      <input type="text" name="name" placeholder="Name" required>
      <input type="email" name="email" placeholder="Email" required>
      <input type="password" name="password" placeholder="Password" required>
      <button type="submit">Sign me up.</button>
    </form>"#,
        notice(flash)
    );
    layout("Register", nav(false), &body)
}

pub fn login(flash: Option<&str>) -> Html<String> {
    let body = format!(
        r#"    <h1>Login</h1>
{}
    <form action="/login" method="post">
      <input type="email" name="email" placeholder="Email" required>
      <input type="password" name="password" placeholder="Password" required>
      <button type="submit">Let me in.</button>
    </form>"#,
        notice(flash)
    );
    layout("Login", nav(false), &body)
}

pub fn secrets(user: &User) -> Html<String> {
    let body = format!(
        r#"    <h1>Welcome, {}</h1>
    <p>You've discovered my secret.</p>
    <a href="/download">Download Your File</a>"#,
        escape(&user.name)
    );
    layout("Secrets", nav(true), &body)
}
