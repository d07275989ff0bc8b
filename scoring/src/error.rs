use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("{op} rejected: only the authoritative host may change the match")]
    NotAuthoritative {
        op: &'static str,
    },
}
