use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("short code '{code}' is already taken")]
    DuplicateCode { code: String },

    #[error("no free short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
}
