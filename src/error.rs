use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("row {row}, entry {entry}: spacing directive carries no recognized field (x, y or w)")]
    EmptySpacing { row: usize, entry: usize },

    #[error("duplicate key index {index} at logical row {row}, column {col}")]
    DuplicateKeyIndex { index: usize, row: usize, col: usize },

    #[error("footprint \"{reference}\" not found on the board")]
    FootprintNotFound { reference: String },

    #[error("pad \"{pad}\" not found on footprint \"{reference}\"")]
    PadNotFound { reference: String, pad: String },

    #[error(
        "net mismatch: {a_ref} pad {a_pad} is on net {a_net} but {b_ref} pad {b_pad} is on net {b_net}"
    )]
    NetMismatch {
        a_ref: String,
        a_pad: String,
        a_net: i32,
        b_ref: String,
        b_pad: String,
        b_net: i32,
    },

    #[error("board already carries tracks or vias; routing is additive and needs an unrouted board")]
    AlreadyRouted,

    #[error("failed to parse layout JSON: {0}")]
    LayoutJson(#[from] serde_json::Error),
}
