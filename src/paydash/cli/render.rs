//! # Rendering Module
//!
//! Turns the session's view values into terminal text. Every `render_*`
//! function returns a `String` so output can be tested without a terminal;
//! the `print_*` helpers are the only ones that write to stdout.
//!
//! Layout math (widths, truncation, padding) runs on plain text with
//! `unicode-width`; styles are applied to the already padded cells so escape
//! codes never count towards a column.

use super::styles::{status_style, HEADER, MUTED, SELECTED_ROW};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use paydash::form::{CustomerForm, Field, ValidationErrors};
use paydash::model::CustomerId;
use paydash::state::Modal;
use paydash::toast::{Toast, ToastLevel};
use paydash::view::{TableRow, TableView};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CHECK_WIDTH: usize = 4;
const NUMBER_WIDTH: usize = 5;
const NAME_WIDTH: usize = 20;
const CUSTOMER_ID_WIDTH: usize = 12;
const DESCRIPTION_WIDTH: usize = 30;
const STATUS_WIDTH: usize = 10;
const MONEY_WIDTH: usize = 12;

pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    if value < 0.0 {
        format!("-${}", formatted)
    } else {
        format!("${}", formatted)
    }
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

/// Truncates, then pads with spaces to exactly `width` columns.
fn cell(s: &str, width: usize) -> String {
    let text = truncate_to_width(s, width.saturating_sub(1));
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

fn money_cell(value: f64) -> String {
    format!("{:>width$}", format_currency(value), width = MONEY_WIDTH)
}

pub fn render_table(view: &TableView) -> String {
    let mut out = String::new();

    let mut title = format!(
        "Customers  {} total · {} selected",
        view.total_customers, view.selected_count
    );
    if !view.search_query.is_empty() {
        title.push_str(&format!(" · search \"{}\"", view.search_query));
    }
    out.push_str(&format!(
        "{}   [{}]\n\n",
        title.bold(),
        view.header_action.label().cyan()
    ));

    let page_mark = if view.all_on_page_selected {
        "[x]"
    } else if view.some_on_page_selected {
        "[-]"
    } else {
        "[ ]"
    };
    let header = format!(
        "{}{}{}{}{}{}{:>m$}{:>m$}{:>m$}",
        cell(page_mark, CHECK_WIDTH),
        cell("#", NUMBER_WIDTH),
        cell("Name", NAME_WIDTH),
        cell("Customer ID", CUSTOMER_ID_WIDTH),
        cell("Description", DESCRIPTION_WIDTH),
        cell("Status", STATUS_WIDTH),
        "Rate",
        "Balance",
        "Deposit",
        m = MONEY_WIDTH
    );
    out.push_str(&HEADER.apply_to(header).to_string());
    out.push('\n');

    if view.rows.is_empty() {
        out.push_str(&format!("{}\n", MUTED.apply_to("No customers found.")));
    }
    for row in &view.rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }

    let page = &view.page;
    out.push('\n');
    out.push_str(&format!(
        "{}-{} of {}   Page {} of {}   Rows per page: {}\n",
        page.first_item,
        page.last_item,
        page.total_items,
        page.current_page,
        page.total_pages,
        page.rows_per_page
    ));
    if let Some(at) = view.refreshed_at {
        out.push_str(&format!(
            "{}\n",
            MUTED.apply_to(format!("Refreshed {}", refreshed_clock(at)))
        ));
    }
    out
}

fn refreshed_clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn render_row(row: &TableRow) -> String {
    let customer = &row.customer;
    let check = if row.selected { "[x]" } else { "[ ]" };

    let lead = format!(
        "{}{}{}{}{}",
        cell(check, CHECK_WIDTH),
        cell(&row.number.to_string(), NUMBER_WIDTH),
        cell(&customer.name, NAME_WIDTH),
        cell(&customer.customer_id, CUSTOMER_ID_WIDTH),
        cell(&customer.description, DESCRIPTION_WIDTH),
    );
    let lead = if row.selected {
        SELECTED_ROW.apply_to(lead).to_string()
    } else {
        lead
    };

    let status = status_style(customer.status)
        .apply_to(cell(customer.status.as_str(), STATUS_WIDTH))
        .to_string();
    let balance = money_cell(customer.balance);
    let balance = if customer.balance < 0.0 {
        balance.red()
    } else {
        balance.green()
    };

    format!(
        "{}{}{}{}{}",
        lead,
        status,
        money_cell(customer.rate),
        balance,
        money_cell(customer.deposit)
    )
}

pub fn render_form(form: &CustomerForm, modal: &Modal) -> String {
    let title = match modal {
        Modal::Editing(id) => format!("Update Customer ({})", id),
        _ => "Add customer".to_string(),
    };

    let fields = [
        (Field::Name, form.name.clone()),
        (Field::Description, form.description.clone()),
        (Field::Status, form.status.to_string()),
        (Field::Rate, format!("{:.2}", form.rate)),
        (Field::Balance, format!("{:.2}", form.balance)),
        (Field::Deposit, format!("{:.2}", form.deposit)),
    ];

    let mut out = format!("{}\n", title.bold());
    for (field, value) in fields {
        out.push_str(&format!("  {}{}\n", cell(field.label(), 16), value));
    }
    out.push_str(&format!(
        "{}\n",
        MUTED.apply_to("save --name .. --status .. to submit, cancel to close")
    ));
    out
}

pub fn render_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|e| format!("  {} {}\n", format!("{}:", e.field.label()).red(), e.message))
        .collect()
}

pub fn render_toast(toast: &Toast) -> String {
    match toast.level {
        ToastLevel::Info => toast.message.dimmed().to_string(),
        ToastLevel::Success => format!("✓ {}", toast.message).green().to_string(),
        ToastLevel::Error => format!("✗ {}", toast.message).red().to_string(),
    }
}

pub fn print_toasts(toasts: &[Toast]) {
    for toast in toasts {
        println!("{}", render_toast(toast));
    }
}

pub fn print_selected(ids: &[CustomerId]) {
    if ids.is_empty() {
        println!("{}", "Nothing selected".dimmed());
        return;
    }
    let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    println!("{}", format!("Selected: {}", ids.join(", ")).dimmed());
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
