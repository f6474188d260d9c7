//! Server-side rendering of the single inventory page

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::language::Language;
use crate::session::{InventorySession, Notice};

const STYLE: &str = "
body { font-family: sans-serif; background: #f9fafb; margin: 0; padding: 1rem; }
main { max-width: 48rem; margin: 0 auto; }
header { display: flex; justify-content: space-between; align-items: center; }
section { background: #fff; padding: 1rem; border-radius: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
ul { list-style: none; padding: 0; }
li { padding: .5rem; border: 1px solid #e5e7eb; border-radius: .25rem; margin-bottom: .5rem; }
form.row, div.row { display: flex; gap: .5rem; margin-top: 1rem; }
.row input { flex-grow: 1; padding: .5rem; }
.loading { color: #6b7280; }
";

/// Render the page for a session.
///
/// `notice` is passed separately because it is consumed by the caller
/// (shown once).
pub fn render_page(session: &InventorySession, notice: Option<Notice>) -> Markup {
    let lang = session.language;
    let t = lang.labels();

    html! {
        (DOCTYPE)
        html lang=(lang.code()) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (t.title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                main {
                    header {
                        h1 { (t.title) }
                        (language_selector(lang))
                    }
                    section {
                        h2 { (t.inventory) }
                        @if session.loading {
                            div class="loading" { (t.loading) }
                        } @else {
                            ul id="inventory" {
                                @for item in session.snapshot.iter() {
                                    li { (item.product_name) " — " (t.quantity) ": " (item.quantity) }
                                }
                            }
                        }
                        form class="row" method="post" action="/items" {
                            input type="text" name="name" value=(session.form.new_item) placeholder=(t.placeholder);
                            button type="submit" { (t.add) }
                        }
                        (order_form(session))
                    }
                }
                @if let Some(notice) = notice {
                    script { (alert_script(notice.message(lang))) }
                }
            }
        }
    }
}

/// `alert("...")` with the message as a JSON string literal.
///
/// `<` is escaped so the message can't close the script element.
fn alert_script(message: &str) -> PreEscaped<String> {
    let literal = serde_json::to_string(message)
        .unwrap_or_default()
        .replace('<', "\\u003c");
    PreEscaped(format!("alert({});", literal))
}

fn language_selector(current: Language) -> Markup {
    html! {
        form method="post" action="/language" {
            select name="lang" onchange="this.form.submit()" {
                @for lang in Language::ALL {
                    option value=(lang.code()) selected[lang == current] { (lang.as_str()) }
                }
            }
            noscript { button type="submit" { "OK" } }
        }
    }
}

fn order_form(session: &InventorySession) -> Markup {
    let t = session.language.labels();

    html! {
        div class="order" {
            h3 { (t.order) }
            form method="post" action="/orders" {
                select name="item_id" {
                    option value="" { (t.select_item) }
                    @for item in session.snapshot.iter() {
                        @let id = item.id.to_string();
                        option value=(id) selected[session.form.order_item_id == id] {
                            (item.product_name)
                        }
                    }
                }
                div class="row" {
                    input type="number" name="quantity" value=(session.form.order_quantity) placeholder=(t.order_placeholder);
                    button type="submit" { (t.order) }
                }
            }
        }
    }
}
