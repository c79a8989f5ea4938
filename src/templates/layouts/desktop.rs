use maud::{html, Markup, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0 1.5rem 2rem; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 0; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { border: 1px solid #ddd; padding: 0.4rem; vertical-align: top; }
th a { color: inherit; text-decoration: none; }
.tag { padding: 0 0.4rem; border-radius: 4px; }
.tag-green { background: #d1fae5; }
.tag-red { background: #fee2e2; }
.sold { color: #888; }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                header {
                    h3 { "Bike Tracker" }
                    nav {
                        a href="/" { "Bikes" }
                        " · "
                        a href="/state.json" { "JSON" }
                        " · "
                        a href="/export.xlsx" { "Export" }
                    }
                }
                (content)
            }
        }
    }
}
