use core::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("control {selector:?} did not appear within {waited:?}")]
    ControlNotFound {
        selector: &'static str,
        waited: Duration,
    },
    #[error("control {control:?} has no option {option:?}")]
    OptionNotFound {
        control: &'static str,
        option: &'static str,
    },
    #[error(transparent)]
    Browser(#[from] anyhow::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
