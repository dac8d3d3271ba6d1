use core::time::Duration;

use tokio::time::{Instant, sleep};

use crate::{
    Error, Result,
    config::{
        MaterializeOptions,
        constants::{CONTROL_NAME, CONTROL_SELECTOR, ROW_SELECTOR, SHOW_ALL},
    },
    page::Page,
};

/// Polls the row count until it has grown past `baseline` and then held still
/// for `stable_polls` polls, or `budget` runs out. A count that never grows
/// uses the whole budget. Returns the last count seen.
async fn settle<P: Page>(
    page: &P,
    budget: Duration,
    baseline: usize,
    opts: &MaterializeOptions,
) -> Result<usize> {
    let deadline = Instant::now() + budget;
    let mut last = page.count(ROW_SELECTOR).await?;
    let mut stable = 0;

    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        sleep(opts.poll_period.min(deadline - now)).await;

        let n = page.count(ROW_SELECTOR).await?;
        if n == last && n > baseline {
            stable += 1;
            if stable >= opts.stable_polls {
                break;
            }
        } else {
            stable = 0;
            last = n;
        }
    }

    Ok(last)
}

/// Expands the sales table until every row is in the DOM. Returns the row count.
pub async fn materialize<P: Page>(page: &P, opts: &MaterializeOptions) -> Result<usize> {
    if !page.wait_for(CONTROL_SELECTOR, opts.control_timeout).await? {
        return Err(Error::ControlNotFound {
            selector: CONTROL_SELECTOR,
            waited: opts.control_timeout,
        });
    }
    tracing::info!(target: "materialize", "page-size control present");

    if !page.select_option(CONTROL_NAME, SHOW_ALL).await? {
        return Err(Error::OptionNotFound {
            control: CONTROL_NAME,
            option: SHOW_ALL,
        });
    }
    tracing::info!(target: "materialize", "selected {SHOW_ALL:?}");

    let mut rows = settle(page, opts.settle, 0, opts).await?;
    tracing::info!(target: "materialize", "{rows} rows after selecting {SHOW_ALL:?}");

    let mut idle = 0;
    for step in 1..=opts.scrolls {
        page.scroll_by(opts.scroll_step).await?;
        let n = settle(page, opts.scroll_pause, rows, opts).await?;
        tracing::debug!(target: "materialize", "scroll {step}/{}: {n} rows", opts.scrolls);

        if n == rows {
            idle += 1;
            if opts.idle_scrolls != 0 && idle >= opts.idle_scrolls {
                tracing::info!(target: "materialize", "no new rows after {idle} scrolls, stopping at {step}");
                break;
            }
        } else {
            idle = 0;
            rows = n;
        }
    }

    tracing::info!(target: "materialize", "table materialized with {rows} rows");
    Ok(rows)
}
