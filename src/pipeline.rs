use scraper::Html;

use crate::{
    Result,
    config::Options,
    extract::{extract_dates, extract_rows},
    frame::Frame,
    materialize::materialize,
    merge::merge,
    page::Page,
};

/// Turns a materialized document into the final record set.
pub fn normalize(html: &str, options: &Options) -> Frame {
    let html = Html::parse_document(html);

    let records = extract_rows(&html);
    let dates = extract_dates(&html);
    let merged = merge(records, dates, options.merge);

    Frame::from_records(&merged).rename().dedup_columns()
}

/// Opens `url`, expands the table and normalizes it. Nothing partial survives a failure.
pub async fn scrape<P: Page>(page: &P, url: &str, options: &Options) -> Result<Frame> {
    page.open(url).await?;
    materialize(page, &options.materialize).await?;
    let content = page.content().await?;

    Ok(normalize(&content, options))
}
