use core::time::Duration;
use std::sync::atomic::{AtomicBool, Ordering};

use sdb::{
    Error,
    config::Options,
    merge::MergeStrategy,
    output::to_csv,
    page::Page,
    pipeline::{normalize, scrape},
};

const SALES: &str = r#"<!DOCTYPE html>
<html><body>
<table id="status"><tr><td title="Updated: 2024-06-01 12:00 UTC">just now</td></tr></table>
<select name="DataTables_Table_0_length"><option>25</option><option>All (slow)</option></select>
<table id="DataTables_Table_0"><tbody>
<tr class="app">
  <td><img></td>
  <td>Game A</td>
  <td>-50%</td>
  <td>$9.99</td>
  <td>9/10</td>
  <td>Jun 1</td>
  <td title="Ends: 2024-06-03 00:00 UTC">2d</td>
  <td></td>
</tr>
<tr class="app"><td></td><td>Broken</td><td>-5%</td><td>$1</td><td>1/10</td></tr>
<tr class="app">
  <td></td>
  <td>Game C</td>
  <td>-75%</td>
  <td>$4.99</td>
  <td>8/10</td>
  <td>2019</td>
  <td title="">in 5 hours</td>
  <td title="Started: 2024-05-28 17:00 UTC">1w</td>
</tr>
<tr class="app">
  <td></td>
  <td>Game D</td>
  <td>-10%</td>
  <td>$19.99</td>
  <td>7/10</td>
  <td>2024</td>
  <td title="Ends: 2024-06-10 17:00 UTC">9d</td>
  <td title="Started: 2024-06-01 17:00 UTC">2d</td>
</tr>
</tbody></table>
</body></html>"#;

/// Serves a fixed, already rendered document.
struct StaticPage {
    html: &'static str,
    control: bool,
    opened: AtomicBool,
}

impl StaticPage {
    const fn new(html: &'static str) -> Self {
        Self {
            html,
            control: true,
            opened: AtomicBool::new(false),
        }
    }
}

impl Page for StaticPage {
    async fn open(&self, _url: &str) -> anyhow::Result<()> {
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn wait_for(&self, _selector: &str, timeout: Duration) -> anyhow::Result<bool> {
        if !self.control {
            tokio::time::sleep(timeout).await;
        }
        Ok(self.control)
    }

    async fn select_option(&self, _control: &str, text: &str) -> anyhow::Result<bool> {
        Ok(text == "All (slow)")
    }

    async fn scroll_by(&self, _dy: i64) -> anyhow::Result<()> {
        Ok(())
    }

    async fn count(&self, _selector: &str) -> anyhow::Result<usize> {
        Ok(self.html.matches(r#"<tr class="app">"#).count())
    }

    async fn content(&self) -> anyhow::Result<String> {
        Ok(self.html.to_owned())
    }
}

#[tokio::test(start_paused = true)]
async fn scrapes_the_sales_table_into_csv() {
    let page = StaticPage::new(SALES);

    let frame = scrape(&page, "https://steamdb.info/sales/", &Options::default())
        .await
        .unwrap();
    let csv = String::from_utf8(to_csv(&frame).unwrap()).unwrap();

    assert!(page.opened.load(Ordering::SeqCst));
    assert_eq!(
        csv,
        "ID,Jogo,Desconto,Preço,Avaliação,Liberar,Termina,Datas\n\
         1,-50%,$9.99,9/10,Jun 1,Ends: 2024-06-03 00:00 UTC,N/A,Updated: 2024-06-01 12:00 UTC\n\
         3,-75%,$4.99,8/10,2019,in 5 hours,Started: 2024-05-28 17:00 UTC,Ends: 2024-06-03 00:00 UTC\n\
         4,-10%,$19.99,7/10,2024,Ends: 2024-06-10 17:00 UTC,Started: 2024-06-01 17:00 UTC,Started: 2024-05-28 17:00 UTC\n"
    );
}

#[test]
fn by_row_merge_keeps_dates_with_their_rows() {
    let options = Options {
        merge: MergeStrategy::ByRow,
        ..Options::default()
    };

    let frame = normalize(SALES, &options);

    assert_eq!(frame.get(0, "Datas"), Some("Ends: 2024-06-03 00:00 UTC"));
    assert_eq!(frame.get(1, "Datas"), Some("Started: 2024-05-28 17:00 UTC"));
    assert_eq!(frame.get(2, "Datas"), Some("Ends: 2024-06-10 17:00 UTC"));
}

#[test]
fn positional_merge_drifts_on_dates_outside_rows() {
    let frame = normalize(SALES, &Options::default());

    assert_eq!(frame.len(), 3);
    assert_eq!(frame.get(0, "Datas"), Some("Updated: 2024-06-01 12:00 UTC"));
    assert_eq!(frame.get(2, "Datas"), Some("Started: 2024-05-28 17:00 UTC"));
}

#[tokio::test(start_paused = true)]
async fn missing_control_aborts_before_extraction() {
    let page = StaticPage {
        control: false,
        ..StaticPage::new(SALES)
    };

    let err = scrape(&page, "https://steamdb.info/sales/", &Options::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ControlNotFound { .. }));
}
