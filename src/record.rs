use std::borrow::Cow;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DATE: &str = "NA";

/// Columns in the order they are produced, before any renaming.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Jogo,
    Desconto,
    Preco,
    Avaliacao,
    Liberar,
    Termina,
    Iniciado,
    Datas,
}

impl Column {
    pub const ALL: [Self; 9] = [
        Self::Id,
        Self::Jogo,
        Self::Desconto,
        Self::Preco,
        Self::Avaliacao,
        Self::Liberar,
        Self::Termina,
        Self::Iniciado,
        Self::Datas,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Jogo => "Jogo",
            Self::Desconto => "Desconto",
            Self::Preco => "Preço",
            Self::Avaliacao => "Avaliação",
            Self::Liberar => "Liberar",
            Self::Termina => "Termina",
            Self::Iniciado => "Iniciado",
            Self::Datas => "Datas",
        }
    }
}

/// The cell values read out of one `tr.app` row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    pub jogo: String,
    pub desconto: String,
    pub preco: String,
    pub avaliacao: String,
    pub liberar: String,
    pub termina: String,
    pub iniciado: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialRecord {
    /// 1-based position of the row among all candidate rows, skipped ones included.
    pub id: u32,
    pub listing: Listing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateEntry {
    pub value: String,
    /// `id` of the enclosing candidate row, when the cell sits inside one.
    pub row: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedRecord {
    pub record: PartialRecord,
    pub datas: Option<String>,
}

impl MergedRecord {
    pub fn cell(&self, column: Column) -> Option<Cow<'_, str>> {
        let listing = &self.record.listing;
        let value = match column {
            Column::Id => return Some(Cow::Owned(self.record.id.to_string())),
            Column::Jogo => &listing.jogo,
            Column::Desconto => &listing.desconto,
            Column::Preco => &listing.preco,
            Column::Avaliacao => &listing.avaliacao,
            Column::Liberar => &listing.liberar,
            Column::Termina => &listing.termina,
            Column::Iniciado => &listing.iniciado,
            Column::Datas => return self.datas.as_deref().map(Cow::Borrowed),
        };
        Some(Cow::Borrowed(value))
    }
}
