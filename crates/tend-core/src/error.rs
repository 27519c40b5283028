use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Notification gateway error: {0}")]
    Gateway(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid reminder time: {0}")]
    InvalidReminderTime(String),

    #[error("Configuration error")]
    Config(#[from] figment::Error),
}
