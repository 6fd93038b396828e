use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    
    #[error("Invalid breakpoints: susceptible ({susceptible}) must not exceed resistant ({resistant})")]
    InvalidBreakpoints { susceptible: f64, resistant: f64 },
    
    #[error("Configuration validation error: {0}")]
    Validation(String),
}

pub type AmrResult<T> = Result<T, AmrError>;
