use core::time::Duration;

use crate::merge::MergeStrategy;

pub mod constants {
    use core::time::Duration;

    pub const URL: &str = "https://steamdb.info/sales/";
    pub const OUTPUT: &str = "jogos_descontos_completo.csv";
    /// Second copy of the same table, written alongside [`OUTPUT`].
    pub const SPLIT_OUTPUT: &str = "jogos_descontos_divididos.csv";

    /// `name` of the page-size `<select>` rendered by `DataTables`.
    pub const CONTROL_NAME: &str = "DataTables_Table_0_length";
    pub const CONTROL_SELECTOR: &str = r#"select[name="DataTables_Table_0_length"]"#;
    pub const SHOW_ALL: &str = "All (slow)";

    pub const ROW_SELECTOR: &str = "tr.app";
    pub const CELL_SELECTOR: &str = "td";
    pub const DETAIL_ATTR: &str = "title";
    pub const DATE_CELL_SELECTOR: &str = r#"td[title*="UTC"]"#;

    pub const CONTROL_TIMEOUT: Duration = Duration::from_secs(30);
    pub const SETTLE: Duration = Duration::from_secs(5);
    pub const SCROLLS: u32 = 100;
    pub const SCROLL_STEP: i64 = 1000;
    pub const SCROLL_PAUSE: Duration = Duration::from_secs(4);
    pub const IDLE_SCROLLS: u32 = 3;

    pub const POLL_PERIOD: Duration = Duration::from_millis(1832 / 4);
    pub const STABLE_POLLS: u32 = 2;
}

/// Knobs of the page materializer. `Default` is the original run.
#[derive(Clone, Debug)]
pub struct MaterializeOptions {
    pub control_timeout: Duration,
    pub settle: Duration,
    pub scrolls: u32,
    pub scroll_step: i64,
    pub scroll_pause: Duration,
    /// Consecutive scrolls without new rows before giving up early; `0` never gives up.
    pub idle_scrolls: u32,
    pub poll_period: Duration,
    pub stable_polls: u32,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        use constants::{
            CONTROL_TIMEOUT, IDLE_SCROLLS, POLL_PERIOD, SCROLL_PAUSE, SCROLL_STEP, SCROLLS, SETTLE,
            STABLE_POLLS,
        };

        Self {
            control_timeout: CONTROL_TIMEOUT,
            settle: SETTLE,
            scrolls: SCROLLS,
            scroll_step: SCROLL_STEP,
            scroll_pause: SCROLL_PAUSE,
            idle_scrolls: IDLE_SCROLLS,
            poll_period: POLL_PERIOD,
            stable_polls: STABLE_POLLS,
        }
    }
}

impl MaterializeOptions {
    /// Upper bound on the time spent waiting for the table to render.
    pub fn wait_budget(&self) -> Duration {
        self.settle + self.scroll_pause * self.scrolls
    }
}

#[derive(Clone, Debug, Default)]
pub struct Options {
    pub materialize: MaterializeOptions,
    pub merge: MergeStrategy,
}
