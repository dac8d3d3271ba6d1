use core::fmt;

use crate::record::{Column, MergedRecord};

/// Field relabeling applied to the merged record set before output.
pub const RENAME_TABLE: [(&str, &str); 7] = [
    ("Jogo", "ID"),
    ("Desconto", "Jogo"),
    ("Preço", "Desconto"),
    ("Avaliação", "Preço"),
    ("Liberar", "Avaliação"),
    ("Termina", "Liberar"),
    ("Iniciado", "Termina"),
];

pub fn renamed(name: &str) -> &str {
    RENAME_TABLE
        .iter()
        .find_map(|&(from, to)| (from == name).then_some(to))
        .unwrap_or(name)
}

/// A column-labelled table of optional string cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Frame {
    pub fn from_records(records: &[MergedRecord]) -> Self {
        let columns = Column::ALL.iter().map(|c| c.name().to_owned()).collect();
        let rows = records
            .iter()
            .map(|record| {
                Column::ALL
                    .iter()
                    .map(|&c| record.cell(c).map(Into::into))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Relabels every column named in `RENAME_TABLE`.
    #[must_use]
    pub fn rename(mut self) -> Self {
        for column in &mut self.columns {
            if let Some(&(_, to)) = RENAME_TABLE.iter().find(|(from, _)| *from == column.as_str()) {
                *column = to.to_owned();
            }
        }
        self
    }

    /// Keeps only the first column of each name.
    #[must_use]
    pub fn dedup_columns(mut self) -> Self {
        let keep = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| !self.columns[..i].contains(name))
            .collect::<Vec<_>>();
        if keep.iter().all(|&k| k) {
            return self;
        }

        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&true));
        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&true));
        }
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of the first column called `column`.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }
}

const PREVIEW_EDGE: usize = 5;

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.rows.len() > PREVIEW_EDGE * 2 {
            (0..PREVIEW_EDGE)
                .chain(self.rows.len() - PREVIEW_EDGE..self.rows.len())
                .collect::<Vec<_>>()
        } else {
            (0..self.rows.len()).collect()
        };

        let cell = |r: usize, c: usize| self.rows[r][c].as_deref().unwrap_or("NaN");
        let width = |s: &str| s.chars().count();

        let index_width = shown.iter().map(|i| i.to_string().len()).max().unwrap_or(0);
        let widths = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                shown
                    .iter()
                    .map(|&r| width(cell(r, c)))
                    .fold(width(name.as_str()), usize::max)
            })
            .collect::<Vec<_>>();

        write!(f, "{:index_width$}", "")?;
        for (name, &w) in self.columns.iter().zip(&widths) {
            write!(f, "  {name:>w$}")?;
        }
        writeln!(f)?;

        for (n, &r) in shown.iter().enumerate() {
            if n == PREVIEW_EDGE && shown.len() == PREVIEW_EDGE * 2 {
                write!(f, "{:index_width$}", "..")?;
                for &w in &widths {
                    write!(f, "  {:>w$}", "...")?;
                }
                writeln!(f)?;
            }
            write!(f, "{r:<index_width$}")?;
            for (c, &w) in widths.iter().enumerate() {
                write!(f, "  {:>w$}", cell(r, c))?;
            }
            writeln!(f)?;
        }

        write!(f, "\n[{} rows x {} columns]", self.rows.len(), self.columns.len())
    }
}
