use thiserror::Error;

#[derive(Error, Debug)]
pub enum TcscopeError {
    #[error("channel capacity must be a non-zero power of two, got {0}")]
    InvalidCapacity(usize),

    #[error("payload prefix length {len} exceeds record capacity {max}")]
    PayloadPrefixTooLong { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, TcscopeError>;
