use crate::api::vaultpay::HistoryPage;
use crate::models::{Direction, HistoryRow};
use crate::utils::{Page, Table};

pub const EMPTY_HISTORY: &str = "No transactions yet. Start by sending money!";
const ROWS_PER_PAGE: usize = 10;

/// History entries from the point of view of `viewer_email`, order preserved
pub fn build_rows(page: &HistoryPage, viewer_email: &str) -> Vec<HistoryRow> {
    page.results
        .iter()
        .map(|tx| {
            let is_debit = tx.sender_email == viewer_email;
            HistoryRow {
                reference: tx.reference_id.to_string(),
                direction: if is_debit { Direction::Sent } else { Direction::Received },
                counterparty: if is_debit {
                    tx.receiver_email.clone()
                } else {
                    tx.sender_email.clone()
                },
                amount: tx.amount,
                status: tx.status,
                timestamp: tx.timestamp,
            }
        })
        .collect()
}

/// Renders one page of rows (1-based) as a table with a footer
pub fn render_history(rows: Vec<HistoryRow>, page_number: usize) -> Result<String, String> {
    if rows.is_empty() {
        return Ok(EMPTY_HISTORY.to_string());
    }

    let mut page = Page::new(rows, ROWS_PER_PAGE);
    page.go_to(page_number)?;

    let mut table = Table::new(vec!["Reference", "Type", "Counterparty", "Amount", "Status", "Date"]);
    for row in page.current() {
        let direction = match row.direction {
            Direction::Sent => "Sent",
            Direction::Received => "Received",
        };
        table.add_row(vec![
            row.short_reference(),
            direction.to_string(),
            row.counterparty.clone(),
            row.signed_amount(),
            row.status.to_string(),
            row.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    let mut output = format!(
        "{}Page {}/{} ({} total transactions)",
        table.render(),
        page.page_number(),
        page.total_pages(),
        page.total_items()
    );
    if !page.is_last() {
        output.push_str(&format!(", next: `history {}`", page.page_number() + 1));
    }
    Ok(output)
}
