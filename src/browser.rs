use core::time::Duration;
use std::{
    ffi::OsStr,
    sync::{Arc, PoisonError},
};

use headless_chrome::{Browser, LaunchOptions, Tab, browser::tab::NoElementFound};
use serde_json::Value;
use tokio::{
    task::spawn_blocking,
    time::{Instant, sleep},
};

use crate::{config::constants::POLL_PERIOD, page::Page};

const IDLE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

const SELECT_OPTION_JS: &str = "(() => {
    const select = document.getElementsByName($CONTROL)[0];
    if (!(select instanceof HTMLSelectElement)) return false;
    const option = Array.from(select.options).find(o => o.text.trim() === $TEXT);
    if (!option) return false;
    select.value = option.value;
    select.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
})()";

/// A running Chrome with one tab. Call [`Session::close`] when done; dropping
/// an open session closes the tab on the current thread.
pub struct Session {
    tab: Arc<Tab>,
    closed: bool,
    _browser: Browser,
}

impl Session {
    pub fn launch(headless: bool, proxy: Option<&str>) -> anyhow::Result<Self> {
        let browser = Browser::new(LaunchOptions {
            args: vec![OsStr::new("--disable-blink-features=AutomationControlled")],
            headless,
            proxy_server: proxy,
            idle_browser_timeout: IDLE_TIMEOUT,
            ..LaunchOptions::default()
        })?;

        // Chrome starts with a blank tab of its own; keep only ours.
        let tab = browser.new_tab()?;
        let others = {
            let tabs = browser.get_tabs().lock().unwrap_or_else(PoisonError::into_inner);
            others(&tab, &tabs)
        };
        for other in others {
            other.close(true)?;
        }

        tracing::info!(target: "session", "browser launched (headless = {headless})");

        Ok(Self {
            tab,
            closed: false,
            _browser: browser,
        })
    }

    /// Closes the tab off the runtime threads. The browser process goes with `self`.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.closed = true;
        let result = self.blocking(|tab| tab.close(true).map(|_| ())).await;
        log_release(&result);
        result
    }

    async fn blocking<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Tab) -> anyhow::Result<T> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        spawn_blocking(move || f(&tab)).await?
    }

    async fn evaluate(&self, expression: String) -> anyhow::Result<Option<Value>> {
        self.blocking(move |tab| Ok(tab.evaluate(&expression, false)?.value))
            .await
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            log_release(&self.tab.close(true).map(|_| ()));
        }
    }
}

fn log_release(result: &anyhow::Result<()>) {
    match result {
        Ok(()) => tracing::info!(target: "session", "browser session released"),
        Err(e) => tracing::warn!(target: "session", "closing tab failed: {e}"),
    }
}

/// Every tab in `tabs` except `keep`.
fn others<T>(keep: &Arc<T>, tabs: &[Arc<T>]) -> Vec<Arc<T>> {
    tabs.iter().filter(|tab| !Arc::ptr_eq(keep, tab)).cloned().collect()
}

fn js_string(s: &str) -> anyhow::Result<String> {
    Ok(serde_json::to_string(s)?)
}

impl Page for Session {
    async fn open(&self, url: &str) -> anyhow::Result<()> {
        let url = url.to_owned();
        tracing::info!(target: "session", "navigating to {url}");

        self.blocking(move |tab| tab.navigate_to(&url)?.wait_until_navigated().map(|_| ()))
            .await
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> anyhow::Result<bool> {
        let deadline = Instant::now() + timeout;

        loop {
            let selector = selector.to_owned();
            match self.blocking(move |tab| tab.find_element(&selector).map(|_| ())).await {
                Ok(()) => break Ok(true),
                Err(err) => {
                    if !err.is::<NoElementFound>() {
                        break Err(err);
                    }
                }
            }

            let now = Instant::now();
            if now >= deadline {
                break Ok(false);
            }
            sleep(POLL_PERIOD.min(deadline - now)).await;
        }
    }

    async fn select_option(&self, control: &str, text: &str) -> anyhow::Result<bool> {
        let script = SELECT_OPTION_JS
            .replace("$CONTROL", &js_string(control)?)
            .replace("$TEXT", &js_string(text)?);

        match self.evaluate(script).await? {
            Some(Value::Bool(b)) => Ok(b),
            Some(value) => anyhow::bail!("not a boolean: {value}"),
            None => anyhow::bail!("returned nothing"),
        }
    }

    async fn scroll_by(&self, dy: i64) -> anyhow::Result<()> {
        self.evaluate(format!("window.scrollBy(0, {dy});")).await.map(|_| ())
    }

    async fn count(&self, selector: &str) -> anyhow::Result<usize> {
        let script = format!("document.querySelectorAll({}).length", js_string(selector)?);

        match self.evaluate(script).await? {
            Some(Value::Number(n)) => n
                .as_u64()
                .map(|n| n as usize)
                .ok_or_else(|| anyhow::anyhow!("not a count: {n}")),
            Some(value) => anyhow::bail!("not a number: {value}"),
            None => anyhow::bail!("returned nothing"),
        }
    }

    async fn content(&self) -> anyhow::Result<String> {
        self.blocking(|tab| tab.get_content()).await
    }
}
