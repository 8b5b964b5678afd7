//! Table rendering for scan batches.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::record::{DISPLAY_HEADERS, WifiRecord};

/// Render `rows` under `headers` as a boxed grid with a rule between
/// every row.
///
/// Rows are emitted in the order given; no sorting happens here.
pub fn render<H, R, C>(headers: &[H], rows: R) -> String
where
    H: AsRef<str>,
    R: IntoIterator<Item = Vec<C>>,
    C: Into<String>,
{
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.as_ref().to_string()));
    for row in rows {
        let cells: Vec<String> = row.into_iter().map(Into::into).collect();
        builder.push_record(cells);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

/// Render an already ordered batch with the standard scan columns.
pub fn render_batch(records: &[WifiRecord]) -> String {
    render(&DISPLAY_HEADERS, records.iter().map(WifiRecord::cells))
}
