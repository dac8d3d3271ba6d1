use core::time::Duration;

/// What the materializer needs from a live, script-rendered page.
#[allow(async_fn_in_trait)]
pub trait Page {
    async fn open(&self, url: &str) -> anyhow::Result<()>;

    /// Polls for `selector` until it matches or `timeout` passes; `Ok(false)` on timeout.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> anyhow::Result<bool>;

    /// Picks the option whose visible text is `text` in the `<select>` named `control`
    /// and fires `change`. `Ok(false)` if there is no such control or option.
    async fn select_option(&self, control: &str, text: &str) -> anyhow::Result<bool>;

    async fn scroll_by(&self, dy: i64) -> anyhow::Result<()>;

    async fn count(&self, selector: &str) -> anyhow::Result<usize>;

    /// Serialized DOM of the whole document.
    async fn content(&self) -> anyhow::Result<String>;
}
