use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Plain-text error page; every surfaced failure ends up here.
pub fn error_page(status: u16, message: &str) -> Markup {
    desktop_layout(
        &format!("Error {status}"),
        html! {
            main {
                h1 { "Error " (status) }
                p { (message) }
                p { a href="/" { "← Back to bikes" } }
            }
        },
    )
}
