use std::{collections::HashMap, sync::LazyLock};

use scraper::{ElementRef, Html, Node, Selector};

use crate::{
    config::constants::{CELL_SELECTOR, DATE_CELL_SELECTOR, DETAIL_ATTR, ROW_SELECTOR},
    record::{DateEntry, Listing, NO_DATE, NOT_AVAILABLE, PartialRecord},
};

#[allow(clippy::unwrap_used)]
static SEL_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse(ROW_SELECTOR).unwrap());
#[allow(clippy::unwrap_used)]
static SEL_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(CELL_SELECTOR).unwrap());
#[allow(clippy::unwrap_used)]
static SEL_DATE_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DATE_CELL_SELECTOR).unwrap());

/// Rows with fewer cells are not listings.
pub const MIN_CELLS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    /// Rendered text; always yields a value once the cell exists.
    Text,
    /// The detail attribute, if present and non-empty.
    Detail,
}

/// Where a field lives in a row and how to read it.
struct Field {
    cell: usize,
    sources: &'static [Source],
    sentinel: &'static str,
}

const TEXT: &[Source] = &[Source::Text];

/// Elements that start a new line of rendered text.
const LINE_BREAKS: &[&str] = &["br", "div", "p", "li"];

/// Cell text the way a browser shows it: whitespace runs collapse to one
/// space, line-breaking elements split lines, blank lines are dropped.
fn rendered_text(cell: ElementRef) -> String {
    let mut raw = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(elem) if LINE_BREAKS.contains(&elem.name()) => raw.push('\n'),
            _ => {}
        }
    }

    raw.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl Field {
    const fn text(cell: usize) -> Self {
        Self {
            cell,
            sources: TEXT,
            sentinel: "",
        }
    }

    fn read(&self, cells: &[ElementRef]) -> String {
        let Some(cell) = cells.get(self.cell) else {
            return self.sentinel.to_owned();
        };

        self.sources
            .iter()
            .find_map(|source| match source {
                Source::Text => Some(rendered_text(*cell)),
                Source::Detail => cell
                    .attr(DETAIL_ATTR)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned),
            })
            .unwrap_or_else(|| self.sentinel.to_owned())
    }
}

const JOGO: Field = Field::text(1);
const DESCONTO: Field = Field::text(2);
const PRECO: Field = Field::text(3);
const AVALIACAO: Field = Field::text(4);
const LIBERAR: Field = Field::text(5);
const TERMINA: Field = Field {
    cell: 6,
    sources: &[Source::Detail, Source::Text],
    sentinel: "",
};
const INICIADO: Field = Field {
    cell: 7,
    sources: &[Source::Detail],
    sentinel: NOT_AVAILABLE,
};

fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.select(&SEL_CELL).collect()
}

pub fn parse_row(id: u32, row: ElementRef) -> Option<PartialRecord> {
    let cells = cells(row);
    if cells.len() < MIN_CELLS {
        return None;
    }

    Some(PartialRecord {
        id,
        listing: Listing {
            jogo: JOGO.read(&cells),
            desconto: DESCONTO.read(&cells),
            preco: PRECO.read(&cells),
            avaliacao: AVALIACAO.read(&cells),
            liberar: LIBERAR.read(&cells),
            termina: TERMINA.read(&cells),
            iniciado: INICIADO.read(&cells),
        },
    })
}

fn candidate_rows(html: &Html) -> impl Iterator<Item = (u32, ElementRef<'_>)> {
    (1..).zip(html.select(&SEL_ROW))
}

/// One record per candidate row with enough cells, in document order.
pub fn extract_rows(html: &Html) -> Vec<PartialRecord> {
    let mut skipped = 0usize;
    let records = candidate_rows(html)
        .filter_map(|(id, row)| {
            let record = parse_row(id, row);
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .collect::<Vec<_>>();

    if skipped > 0 {
        tracing::debug!(target: "extract", "skipped {skipped} short rows");
    }
    tracing::info!(target: "extract", "extracted {} records", records.len());

    records
}

/// Every cell in the document whose detail attribute mentions UTC, in document order.
pub fn extract_dates(html: &Html) -> Vec<DateEntry> {
    let rows = candidate_rows(html)
        .map(|(id, row)| (row.id(), id))
        .collect::<HashMap<_, _>>();

    let dates = html
        .select(&SEL_DATE_CELL)
        .map(|cell| {
            let value = match cell.attr(DETAIL_ATTR) {
                Some(s) if !s.is_empty() => s.to_owned(),
                _ => NO_DATE.to_owned(),
            };
            let row = cell.ancestors().find_map(|node| rows.get(&node.id()).copied());
            DateEntry { value, row }
        })
        .collect::<Vec<_>>();

    tracing::info!(target: "extract", "collected {} date cells", dates.len());

    dates
}
