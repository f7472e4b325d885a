//! Terminal tables

use tabled::{
    Table,
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use tani::products::Product;
use tani_app::{cart::CartSnapshot, payment::BankAccount};

pub(crate) fn products_table(products: &[Product]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Price", "Availability"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.price.to_string(),
            product.availability.label().to_string(),
        ]);
    }

    let mut table = styled(builder, &[]);
    table.modify(Columns::new(2..3), Alignment::right());

    table.to_string()
}

/// Cart lines followed by a subtotal row.
pub(crate) fn cart_table(snapshot: &CartSnapshot) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Product", "Qty", "Price", "Total"]);

    for line in snapshot.lines.lines() {
        let item = &line.item;

        builder.push_record([
            format!("#{}", item.id),
            item.product.name.clone(),
            item.quantity.get().to_string(),
            item.product.price.to_string(),
            item.line_total().to_string(),
        ]);
    }

    let subtotal_row = snapshot.lines.len() + 1;

    builder.push_record([
        String::new(),
        "Subtotal".to_string(),
        String::new(),
        String::new(),
        snapshot.subtotal().to_string(),
    ]);

    let mut table = styled(builder, &[subtotal_row]);
    table.modify(Columns::new(2..5), Alignment::right());

    table.to_string()
}

pub(crate) fn accounts_table(accounts: &[BankAccount]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Bank", "Account", "Holder"]);

    for account in accounts {
        builder.push_record([account.bank, account.number, account.holder]);
    }

    styled(builder, &[]).to_string()
}

/// Rounded borders with a rule under the header and above each row in
/// `ruled_rows`.
fn styled(builder: Builder, ruled_rows: &[usize]) -> Table {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in ruled_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);

    table
}
