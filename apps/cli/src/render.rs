//! Plain-text breakdown of a [`BillSplit`].
//!
//! ```text
//! Ana
//!   Adobo                                 $100.00
//!   Lumpia (split)                         $30.00
//!   Individual Subtotal:                  $100.00
//!   Shared Subtotal:                       $30.00
//!   Service Charge (proportional):         $13.00
//!   Total:                                $143.00
//!
//! Total Bill (Subtotal):                  $360.00
//! Total Service Charge:                    $36.00
//! Grand Total:                            $396.00
//! ```

use std::fmt::Write;

use kkb_core::{Amount, BillSplit, PersonTotal};

const LABEL_WIDTH: usize = 32;
const AMOUNT_WIDTH: usize = 14;

/// Shown instead of a breakdown when nobody owns an item.
pub const EMPTY_BILL_MESSAGE: &str = "No items to split yet.";

/// Renders the per-person breakdown followed by the bill totals.
pub fn render_split(split: &BillSplit, currency: &str) -> String {
    if split.is_empty() {
        return format!("{}\n", EMPTY_BILL_MESSAGE);
    }

    let mut out = String::new();
    for person in &split.person_totals {
        render_person(&mut out, person, currency);
        out.push('\n');
    }

    line(&mut out, "", "Total Bill (Subtotal):", split.subtotal, currency);
    line(&mut out, "", "Total Service Charge:", split.service_charge, currency);
    line(&mut out, "", "Grand Total:", split.grand_total, currency);
    out
}

fn render_person(out: &mut String, person: &PersonTotal, currency: &str) {
    out.push_str(&person.person);
    out.push('\n');

    for item in &person.items {
        line(out, "  ", &item.name, item.price, currency);
    }
    for shared in &person.shared_items {
        let label = format!("{} (split)", shared.name);
        line(out, "  ", &label, shared.share, currency);
    }

    line(out, "  ", "Individual Subtotal:", person.subtotal, currency);
    if person.shared_subtotal.is_positive() {
        line(out, "  ", "Shared Subtotal:", person.shared_subtotal, currency);
    }
    line(
        out,
        "  ",
        "Service Charge (proportional):",
        person.service_charge,
        currency,
    );
    line(out, "  ", "Total:", person.total, currency);
}

fn line(out: &mut String, indent: &str, label: &str, amount: Amount, currency: &str) {
    let width = LABEL_WIDTH.saturating_sub(indent.chars().count());
    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "{}{:<width$}{:>amount_width$}",
        indent,
        label,
        amount.format_with(currency),
        width = width,
        amount_width = AMOUNT_WIDTH,
    );
}
