use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection handle is not connected")]
    NotConnected,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store operation failed: {0}")]
    StoreOperationFailed(String),

    #[error("BSON encode: {0}")]
    BsonEncode(#[from] bson::ser::Error),

    #[error("BSON decode: {0}")]
    BsonDecode(#[from] bson::de::Error),
}
