use console::Style;
use once_cell::sync::Lazy;
use paydash::model::CustomerStatus;

pub static STATUS_OPEN: Lazy<Style> = Lazy::new(|| Style::new().blue());
pub static STATUS_PAID: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static STATUS_INACTIVE: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
pub static STATUS_DUE: Lazy<Style> = Lazy::new(|| Style::new().red().bold());

pub static HEADER: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());
pub static SELECTED_ROW: Lazy<Style> = Lazy::new(|| Style::new().on_color256(17));
pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().color256(245).italic());

pub fn status_style(status: CustomerStatus) -> &'static Style {
    match status {
        CustomerStatus::Open => &*STATUS_OPEN,
        CustomerStatus::Paid => &*STATUS_PAID,
        CustomerStatus::Inactive => &*STATUS_INACTIVE,
        CustomerStatus::Due => &*STATUS_DUE,
    }
}
