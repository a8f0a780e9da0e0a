//! Receipt
//!
//! Terminal rendering of a cart and its order totals.

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartView,
    pricing::PricingError,
    shipping::ShippingPolicy,
    totals::OrderTotals,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error pricing a line or the shipping progress.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Error writing to the output.
    #[error("Failed to write receipt")]
    IO,
}

/// Write the cart lines as a table followed by the order totals.
///
/// # Errors
///
/// Returns an error if a line cannot be priced or the output cannot be written.
pub fn write_to(
    mut out: impl io::Write,
    cart: CartView<'_, '_>,
    totals: &OrderTotals<'_>,
    policy: &ShippingPolicy<'_>,
) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        return writeln!(out, "\n Your cart is empty\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Qty", "Unit price", "Total"]);

    for (index, line) in cart.items().iter().enumerate() {
        builder.push_record([
            format!("{}", index + 1),
            line.name().to_string(),
            line.quantity().to_string(),
            line.unit_price().to_string(),
            line.line_total()?.to_string(),
        ]);
    }

    write_line_table(&mut out, builder)?;
    write_totals(&mut out, totals, policy)
}

fn write_line_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_totals(
    out: &mut impl io::Write,
    totals: &OrderTotals<'_>,
    policy: &ShippingPolicy<'_>,
) -> Result<(), ReceiptError> {
    let shipping = if totals.has_free_shipping() {
        "Free".to_string()
    } else {
        totals.shipping().to_string()
    };

    let rows = [
        (" Items:", totals.item_count().to_string()),
        (" Subtotal:", totals.subtotal().to_string()),
        (" Shipping:", shipping),
        (" Tax:", totals.tax().to_string()),
        (" Total:", totals.total().to_string()),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in &rows {
        writeln!(out, "{label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    let subtotal = totals.subtotal();

    if !policy.qualifies_for_free_shipping(&subtotal)? {
        writeln!(
            out,
            "\n Add {} for free shipping ({}%)",
            policy.remaining_for_free_shipping(&subtotal)?,
            totals.shipping_progress_percent()
        )
        .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}
