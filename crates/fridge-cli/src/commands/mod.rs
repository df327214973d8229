pub mod config;
pub mod recognize;
pub mod session;

use fridge_core::ItemView;

/// One line per item: `Milk-0  Milk  2 days (+1)  3 days old`.
pub fn format_view(view: &ItemView) -> String {
    let mut line = format!("{:<16} {:<20} {}", view.id, view.name, view.display);
    if let Some(badge) = view.adjustment_badge() {
        line.push(' ');
        line.push_str(&badge);
    }
    if let Some(age) = view.age_label() {
        line.push_str("  ");
        line.push_str(&age);
    }
    line
}

pub fn print_views(views: &[ItemView]) {
    if views.is_empty() {
        println!("No items detected");
        return;
    }
    for view in views {
        println!("{}", format_view(view));
    }
}
